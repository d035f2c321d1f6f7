//! Locates a TrueType/OpenType file for plot annotations and registers it
//! with the plotting backend under the style's font family.

use crate::error::{DensityError, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use plotters::style::{register_font, FontStyle};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const FONT_ENV: &str = "HYDROGEN_DENSITY_FONT";

const PREFERRED: &[&str] = &[
    "STIXTwoText-Regular.ttf",
    "STIXGeneral.ttf",
    "DejaVuSerif.ttf",
    "LiberationSerif-Regular.ttf",
    "NotoSerif-Regular.ttf",
    "FreeSerif.ttf",
    "Times New Roman.ttf",
    "times.ttf",
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "NotoSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];

const MAX_DEPTH: usize = 4;

// (family, explicit path) -> registered successfully
static REGISTERED: Lazy<Mutex<HashMap<(String, Option<PathBuf>), bool>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from(r"C:\Windows\Fonts"),
    ];
    if let Some(home) = env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join(".fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_DEPTH {
                collect_font_files(&path, depth + 1, out);
            }
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("ttf") | Some("otf")
    )
}

/// Explicit path first, then `HYDROGEN_DENSITY_FONT`, then the system font directories.
pub fn resolve_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env::var_os(FONT_ENV) {
        return Some(PathBuf::from(path));
    }

    let mut files = Vec::new();
    for dir in font_dirs() {
        collect_font_files(&dir, 0, &mut files);
    }
    debug!("found {} candidate font files", files.len());

    PREFERRED
        .iter()
        .find_map(|name| {
            files
                .iter()
                .find(|path| path.file_name().and_then(|f| f.to_str()) == Some(*name))
                .cloned()
        })
        .or_else(|| {
            files.sort();
            files.into_iter().next()
        })
}

fn register_file(family: &str, path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    // the backend keeps registered fonts for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(family, FontStyle::Normal, bytes).map_err(|_| DensityError::InvalidFont {
        path: path.to_path_buf(),
    })
}

/// Registers a font for `family` once per process. Returns whether text can be drawn.
pub fn ensure_font(family: &str, explicit: Option<&Path>) -> bool {
    let mut registered = match REGISTERED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let key = (family.to_string(), explicit.map(Path::to_path_buf));
    if let Some(&ok) = registered.get(&key) {
        return ok;
    }

    let ok = match resolve_font(explicit) {
        Some(path) => match register_file(family, &path) {
            Ok(()) => {
                info!("using font {} for annotations", path.display());
                true
            }
            Err(e) => {
                warn!("{e}; annotations will be skipped");
                false
            }
        },
        None => {
            warn!("no usable font found (set {FONT_ENV}); annotations will be skipped");
            false
        }
    };
    registered.insert(key, ok);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_extension_filter() {
        assert!(is_font_file(Path::new("/x/DejaVuSerif.ttf")));
        assert!(is_font_file(Path::new("/x/STIX.OTF")));
        assert!(!is_font_file(Path::new("/x/fonts.dir")));
        assert!(!is_font_file(Path::new("/x/noext")));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/nonexistent/custom.ttf");
        assert_eq!(resolve_font(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_unreadable_font_disables_text() {
        assert!(!ensure_font(
            "test-missing-family",
            Some(Path::new("/nonexistent/custom.ttf"))
        ));
    }
}
