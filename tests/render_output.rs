mod common;

use hydrogen_density::colormap::{list_colormaps, to_hex, Colormap};
use hydrogen_density::render::{compose_image, render_to_dir};
use hydrogen_density::style::{Style, Theme, BACKGROUND_SAMPLES};
use hydrogen_density::{DensityError, QuantumNumbers, RenderRequest};
use ndarray::Array2;
use image::GenericImageView;

fn request(n: i64, l: i64, m: i64, a0: f64, dark_theme: bool, colormap: &str) -> RenderRequest {
    RenderRequest {
        n,
        l,
        m,
        a0_scale_factor: a0,
        dark_theme,
        colormap: colormap.to_string(),
    }
}

#[test]
fn ground_state_light_theme_file() {
    let dir = common::scratch_dir("ground_state");
    let valid = request(1, 0, 0, 1.0, false, "rocket").validate().unwrap();
    let style = valid.default_style();
    let path = render_to_dir(&valid, &style, &dir).unwrap();

    assert_eq!(path.file_name().unwrap(), "(1,0,0)[lt].png");
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let img = image::open(&path).unwrap();
    assert_eq!(img.dimensions(), (style.width, style.height));
    let corner = img.get_pixel(style.width - 1, style.height - 1);
    assert_eq!(&corner.0[..3], &[255, 255, 255]);
}

#[test]
fn dark_theme_background_comes_from_colormap() {
    let dir = common::scratch_dir("dark_theme");
    let valid = request(2, 1, 0, 1.0, true, "rocket").validate().unwrap();
    let style = valid.default_style();
    let path = render_to_dir(&valid, &style, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "(2,1,0)[dt].png");

    let img = image::open(&path).unwrap();
    let corner = img.get_pixel(style.width - 1, style.height - 1);
    let expected = Colormap::from_name("rocket")
        .unwrap()
        .darkest(BACKGROUND_SAMPLES);
    assert_eq!(
        to_hex(colorous::Color {
            r: corner.0[0],
            g: corner.0[1],
            b: corner.0[2]
        }),
        to_hex(expected)
    );
}

#[test]
fn scaled_d_state_and_unknown_colormap() {
    let dir = common::scratch_dir("d_state");
    let valid = request(3, 2, 1, 0.5, false, "rocket").validate().unwrap();
    let path = render_to_dir(&valid, &valid.default_style(), &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "(3,2,1)[lt].png");

    let rejected = request(3, 2, 1, 0.5, false, "not_a_real_colormap").validate();
    assert!(matches!(rejected, Err(DensityError::UnknownColormap(_))));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn invalid_quantum_numbers_are_rejected() {
    for l in -1..=1 {
        for m in -1..=1 {
            let error = request(0, l, m, 1.0, false, "rocket").validate().err().unwrap();
            assert!(matches!(error, DensityError::InvalidPrincipal { n: 0 }));
            assert!(error.is_validation());
        }
    }
    assert!(matches!(
        request(2, 2, 0, 1.0, false, "rocket").validate(),
        Err(DensityError::InvalidAzimuthal { .. })
    ));
    assert!(matches!(
        request(3, 1, -2, 1.0, false, "rocket").validate(),
        Err(DensityError::InvalidMagnetic { .. })
    ));
}

#[test]
fn every_listed_colormap_renders_in_both_themes() {
    let qn = QuantumNumbers::new(2, 1, 1).unwrap();
    let density = Array2::from_shape_fn((24, 24), |(i, j)| ((i * j) % 7) as f64);
    for name in list_colormaps() {
        let colormap = Colormap::from_name(name).unwrap();
        for theme in [Theme::Light, Theme::Dark] {
            let style = Style {
                width: 120,
                height: 126,
                ..Style::for_theme(theme, &colormap)
            };
            let img = compose_image(&density, qn, &colormap, &style)
                .unwrap_or_else(|e| panic!("{name} ({theme:?}): {e}"));
            assert_eq!(img.dimensions(), (120, 126), "{name}");
        }
    }
}
