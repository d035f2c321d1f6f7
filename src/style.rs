//! Explicit plot styling, passed into every render call.

use crate::colormap::{parse_hex, to_hex, Colormap};
use crate::error::Result;
use colorous::Color;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Palette size searched for the dark-theme background
pub const BACKGROUND_SAMPLES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_flag(dark_theme: bool) -> Self {
        if dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Tag used in output file names
    pub fn suffix(self) -> &'static str {
        match self {
            Theme::Dark => "dt",
            Theme::Light => "lt",
        }
    }
}

/// Sizes are in pixels, colours are `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub font_path: Option<PathBuf>,
    pub tick_width: u32,
    pub tick_size: u32,
    pub tick_label_size: f64,
    pub axes_linewidth: u32,
    pub title_size: f64,
    pub formula_size: f64,
    pub state_size: f64,
    pub label_size: f64,
    pub caption_size: f64,
    pub glyph_size: f64,
    pub background: String,
    pub text_color: String,
    pub tick_color: String,
    pub spine_color: String,
    pub state_color: String,
    pub colorbar_outline: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            width: 1600,
            height: 1650,
            font_family: "serif".to_string(),
            font_path: None,
            tick_width: 4,
            tick_size: 15,
            tick_label_size: 30.0,
            axes_linewidth: 4,
            title_size: 44.0,
            formula_size: 36.0,
            state_size: 42.0,
            label_size: 30.0,
            caption_size: 24.0,
            glyph_size: 34.0,
            background: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            tick_color: "#000000".to_string(),
            spine_color: "#000000".to_string(),
            state_color: "#dfdfdf".to_string(),
            colorbar_outline: true,
        }
    }
}

/// Style colours parsed once per render
#[derive(Debug, Clone, Copy)]
pub struct StyleColors {
    pub background: Color,
    pub text: Color,
    pub tick: Color,
    pub spine: Color,
    pub state: Color,
}

impl Style {
    pub fn for_theme(theme: Theme, colormap: &Colormap) -> Self {
        match theme {
            Theme::Light => Style::default(),
            Theme::Dark => {
                let background = colormap.darkest(BACKGROUND_SAMPLES);
                debug!("dark background for {}: {}", colormap.name(), to_hex(background));
                Style {
                    background: to_hex(background),
                    text_color: "#dfdfdf".to_string(),
                    tick_color: "#c4c4c4".to_string(),
                    spine_color: "#c4c4c4".to_string(),
                    colorbar_outline: false,
                    ..Style::default()
                }
            }
        }
    }

    /// Apply a partial JSON object on top of this style; absent keys keep their value.
    pub fn with_overrides(self, overrides: &serde_json::Value) -> Result<Self> {
        let mut merged = serde_json::to_value(&self)?;
        if let (Some(base), Some(patch)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in patch {
                base.insert(key.clone(), value.clone());
            }
        }
        let style: Style = serde_json::from_value(merged)?;
        style.colors()?;
        Ok(style)
    }

    pub fn colors(&self) -> Result<StyleColors> {
        Ok(StyleColors {
            background: parse_hex(&self.background)?,
            text: parse_hex(&self.text_color)?,
            tick: parse_hex(&self.tick_color)?,
            spine: parse_hex(&self.spine_color)?,
            state: parse_hex(&self.state_color)?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn load_overrides(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DensityError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_theme_suffix() {
        assert_eq!(Theme::from_flag(true).suffix(), "dt");
        assert_eq!(Theme::from_flag(false).suffix(), "lt");
    }

    #[test]
    fn test_light_theme_defaults() {
        let rocket = Colormap::from_name("rocket").unwrap();
        let style = Style::for_theme(Theme::Light, &rocket);
        assert_eq!(style.background, "#ffffff");
        assert_eq!(style.text_color, "#000000");
        assert!(style.colorbar_outline);
    }

    #[test]
    fn test_dark_theme_uses_darkest_palette_entry() {
        let rocket = Colormap::from_name("rocket").unwrap();
        let style = Style::for_theme(Theme::Dark, &rocket);
        assert_eq!(style.background, to_hex(rocket.darkest(BACKGROUND_SAMPLES)));
        assert_eq!(style.text_color, "#dfdfdf");
        assert_eq!(style.tick_color, "#c4c4c4");
        assert_eq!(style.spine_color, "#c4c4c4");
        assert!(!style.colorbar_outline);
    }

    #[test]
    fn test_overrides_merge_onto_theme() {
        let rocket = Colormap::from_name("rocket").unwrap();
        let dark = Style::for_theme(Theme::Dark, &rocket);
        let merged = dark
            .clone()
            .with_overrides(&json!({ "title_size": 50.0, "tick_color": "#ff0000" }))
            .unwrap();

        assert_eq!(merged.title_size, 50.0);
        assert_eq!(merged.tick_color, "#ff0000");
        assert_eq!(merged.background, dark.background);
        assert_eq!(merged.text_color, dark.text_color);
    }

    #[test]
    fn test_overrides_reject_bad_color() {
        let result = Style::default().with_overrides(&json!({ "background": "navy" }));
        assert!(matches!(result, Err(DensityError::InvalidColor(_))));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let style = Style::default();
        let parsed: Style = serde_json::from_str(&style.to_json().unwrap()).unwrap();
        assert_eq!(parsed, style);
    }
}
