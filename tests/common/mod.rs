#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

/// Fresh per-test output directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("hydrogen_density_tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs().max(f64::MIN_POSITIVE)
}

/// Valid (n, l, m) triples up to `max_n`
pub fn valid_states(max_n: i64) -> Vec<(i64, i64, i64)> {
    let mut states = Vec::new();
    for n in 1..=max_n {
        for l in 0..n {
            for m in -l..=l {
                states.push((n, l, m));
            }
        }
    }
    states
}
