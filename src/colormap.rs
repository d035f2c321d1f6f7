//! Named colormaps: seaborn's perceptual, qualitative and circular palettes,
//! matplotlib's segment maps, the d3 catalogue from `colorous`, `_r`
//! reversal and `light:` / `dark:` / `blend:` builders.

use crate::error::{DensityError, Result};
use colorous::{Color, Gradient};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const DEFAULT_COLORMAP: &str = "rocket";

/// Per-channel (position, value) anchors, matplotlib's segment-data layout
type Channels = [&'static [(f64, f64)]; 3];

#[derive(Clone, Copy)]
enum BaseMap {
    Gradient(Gradient),
    Stops(&'static [&'static str]),
    Listed(&'static [&'static str]),
    Categorical(&'static [Color]),
    Segments(&'static Channels),
    Generated(fn(f64) -> Color),
}

// Seaborn maps as evenly spaced stops (ends plus the 6-colour palette)
const ROCKET: &[&str] = &[
    "#03051a", "#35193e", "#701f57", "#ad1759", "#e13342", "#f37651", "#f6b48f", "#faebdd",
];
const MAKO: &[&str] = &[
    "#0b0405", "#2e1e3b", "#413d7b", "#37659e", "#348fa7", "#40b7ad", "#8bdab2", "#def5e5",
];
const FLARE: &[&str] = &[
    "#edb081", "#e98d6b", "#e3685c", "#d14a61", "#b13c6c", "#8f3371", "#6c2b6d", "#4b2362",
];
const CREST: &[&str] = &[
    "#a5cd90", "#7dba91", "#59a590", "#40908e", "#287a8c", "#1c6488", "#254b7f", "#2c3172",
];

const ICEFIRE: &[&str] = &[
    "#bde7db", "#6dbad3", "#3f87c8", "#3f4e95", "#232130", "#582538", "#a3303b", "#e0613b",
    "#f6a75f", "#ffeab4",
];
const VLAG: &[&str] = &[
    "#2369bd", "#6b8fc7", "#a9b6d6", "#e2e1ea", "#ebd3ce", "#d6928a", "#bd5b57", "#a9373b",
];
const COOLWARM: &[&str] = &[
    "#3b4cc0", "#5977e3", "#7b9ff9", "#9ebeff", "#c0d4f5", "#dddcdc", "#f2cbb7", "#f7ac8e",
    "#ee8468", "#d65244", "#b40426",
];
const TWILIGHT: &[&str] = &[
    "#e2d9e2", "#a6bccb", "#6f93c0", "#5e63b3", "#4f3b8c", "#2f1436", "#6b2356", "#9e3f58",
    "#bf6b5d", "#d3a48d", "#e2d9e2",
];

// seaborn's qualitative palettes
const DEEP: &[&str] = &[
    "#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860", "#da8bc3", "#8c8c8c",
    "#ccb974", "#64b5cd",
];
const MUTED: &[&str] = &[
    "#4878d0", "#ee854a", "#6acc64", "#d65f5f", "#956cb4", "#8c613c", "#dc7ec0", "#797979",
    "#d5bb67", "#82c6e2",
];
const PASTEL: &[&str] = &[
    "#a1c9f4", "#ffb482", "#8de5a1", "#ff9f9b", "#d0bbff", "#debb9b", "#fab0e4", "#cfcfcf",
    "#fffea3", "#b9f2f0",
];
const BRIGHT: &[&str] = &[
    "#023eff", "#ff7c00", "#1ac938", "#e8000b", "#8b2be2", "#9f4800", "#f14cc1", "#a3a3a3",
    "#ffc400", "#00d7ff",
];
const DARK: &[&str] = &[
    "#001c7f", "#b1400d", "#12711c", "#8c0800", "#591e71", "#592f0d", "#a23582", "#3c3c3c",
    "#b8850a", "#006374",
];
const COLORBLIND: &[&str] = &[
    "#0173b2", "#de8f05", "#029e73", "#d55e00", "#cc78bc", "#ca9161", "#fbafe4", "#949494",
    "#ece133", "#56b4e9",
];

const LINEAR: &[(f64, f64)] = &[(0.0, 0.0), (1.0, 1.0)];
const GRAY: Channels = [LINEAR, LINEAR, LINEAR];
const HOT: Channels = [
    &[(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)],
    &[(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)],
];
const BONE: Channels = [
    &[(0.0, 0.0), (0.746032, 0.652778), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.319444), (0.746032, 0.777778), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.444444), (1.0, 1.0)],
];
const JET: Channels = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

const LIGHT_START: &str = "#f2f2f2";
const DARK_START: &str = "#262626";

static REGISTRY: Lazy<HashMap<&'static str, BaseMap>> = Lazy::new(|| {
    use colorous::*;
    let gradients: [(&'static str, Gradient); 38] = [
        ("viridis", VIRIDIS),
        ("magma", MAGMA),
        ("inferno", INFERNO),
        ("plasma", PLASMA),
        ("cividis", CIVIDIS),
        ("turbo", TURBO),
        ("cubehelix", CUBEHELIX),
        ("cool", COOL),
        ("warm", WARM),
        ("rainbow", RAINBOW),
        ("sinebow", SINEBOW),
        ("Blues", BLUES),
        ("Greens", GREENS),
        ("Greys", GREYS),
        ("Oranges", ORANGES),
        ("Purples", PURPLES),
        ("Reds", REDS),
        ("BuGn", BLUE_GREEN),
        ("BuPu", BLUE_PURPLE),
        ("GnBu", GREEN_BLUE),
        ("OrRd", ORANGE_RED),
        ("PuBu", PURPLE_BLUE),
        ("PuBuGn", PURPLE_BLUE_GREEN),
        ("PuRd", PURPLE_RED),
        ("RdPu", RED_PURPLE),
        ("YlGn", YELLOW_GREEN),
        ("YlGnBu", YELLOW_GREEN_BLUE),
        ("YlOrBr", YELLOW_ORANGE_BROWN),
        ("YlOrRd", YELLOW_ORANGE_RED),
        ("BrBG", BROWN_GREEN),
        ("PRGn", PURPLE_GREEN),
        ("PiYG", PINK_GREEN),
        ("PuOr", PURPLE_ORANGE),
        ("RdBu", RED_BLUE),
        ("RdGy", RED_GREY),
        ("RdYlBu", RED_YELLOW_BLUE),
        ("RdYlGn", RED_YELLOW_GREEN),
        ("Spectral", SPECTRAL),
    ];

    let mut map: HashMap<&'static str, BaseMap> = gradients
        .into_iter()
        .map(|(name, gradient)| (name, BaseMap::Gradient(gradient)))
        .collect();
    map.extend([
        ("rocket", BaseMap::Stops(ROCKET)),
        ("mako", BaseMap::Stops(MAKO)),
        ("flare", BaseMap::Stops(FLARE)),
        ("crest", BaseMap::Stops(CREST)),
        ("icefire", BaseMap::Stops(ICEFIRE)),
        ("vlag", BaseMap::Stops(VLAG)),
        ("coolwarm", BaseMap::Stops(COOLWARM)),
        ("twilight", BaseMap::Stops(TWILIGHT)),
        ("gray", BaseMap::Segments(&GRAY)),
        ("hot", BaseMap::Segments(&HOT)),
        ("bone", BaseMap::Segments(&BONE)),
        ("jet", BaseMap::Segments(&JET)),
        ("deep", BaseMap::Listed(DEEP)),
        ("muted", BaseMap::Listed(MUTED)),
        ("pastel", BaseMap::Listed(PASTEL)),
        ("bright", BaseMap::Listed(BRIGHT)),
        ("dark", BaseMap::Listed(DARK)),
        ("colorblind", BaseMap::Listed(COLORBLIND)),
        ("Set1", BaseMap::Categorical(&SET1)),
        ("Set2", BaseMap::Categorical(&SET2)),
        ("Set3", BaseMap::Categorical(&SET3)),
        ("Pastel1", BaseMap::Categorical(&PASTEL1)),
        ("Pastel2", BaseMap::Categorical(&PASTEL2)),
        ("Dark2", BaseMap::Categorical(&DARK2)),
        ("Accent", BaseMap::Categorical(&ACCENT)),
        ("Paired", BaseMap::Categorical(&PAIRED)),
        ("tab10", BaseMap::Categorical(&CATEGORY10)),
        ("hls", BaseMap::Generated(hls_ramp)),
        ("husl", BaseMap::Generated(husl_ramp)),
    ]);
    map
});

static NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>[A-Za-z][A-Za-z0-9]*)(?P<rev>_r)?$").expect("static regex")
});
static BUILT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<kind>light|dark|blend):(?P<body>[#0-9A-Fa-f,\s]+?)(?P<rev>_r)?$")
        .expect("static regex")
});
static HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?(?P<digits>[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("static regex"));

#[derive(Clone)]
enum Ramp {
    Gradient(Gradient),
    Stops(Vec<Color>),
    Discrete(Vec<Color>),
    Segments(&'static Channels),
    Generated(fn(f64) -> Color),
}

/// A resolved colormap, evaluated on t ∈ [0, 1].
#[derive(Clone)]
pub struct Colormap {
    name: String,
    ramp: Ramp,
    reversed: bool,
}

impl Colormap {
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        let unknown = || DensityError::UnknownColormap(name.to_string());

        if let Some(caps) = NAMED.captures(name) {
            let base = REGISTRY.get(&caps["base"]).ok_or_else(unknown)?;
            let parse_all = |hexes: &[&str]| {
                hexes.iter().map(|hex| parse_hex(hex)).collect::<Result<Vec<_>>>()
            };
            let ramp = match *base {
                BaseMap::Gradient(gradient) => Ramp::Gradient(gradient),
                BaseMap::Stops(stops) => Ramp::Stops(parse_all(stops)?),
                BaseMap::Listed(colors) => Ramp::Discrete(parse_all(colors)?),
                BaseMap::Categorical(colors) => Ramp::Discrete(colors.to_vec()),
                BaseMap::Segments(channels) => Ramp::Segments(channels),
                BaseMap::Generated(ramp) => Ramp::Generated(ramp),
            };
            return Ok(Colormap {
                name: name.to_string(),
                ramp,
                reversed: caps.name("rev").is_some(),
            });
        }

        if let Some(caps) = BUILT.captures(name) {
            let colors = caps["body"]
                .split(',')
                .map(|part| parse_hex(part.trim()))
                .collect::<Result<Vec<_>>>()
                .map_err(|_| unknown())?;
            let stops = match (&caps["kind"], colors.as_slice()) {
                ("light", [color]) => vec![parse_hex(LIGHT_START)?, *color],
                ("dark", [color]) => vec![parse_hex(DARK_START)?, *color],
                ("blend", colors) if colors.len() >= 2 => colors.to_vec(),
                _ => return Err(unknown()),
            };
            return Ok(Colormap {
                name: name.to_string(),
                ramp: Ramp::Stops(stops),
                reversed: caps.name("rev").is_some(),
            });
        }

        Err(unknown())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        match &self.ramp {
            Ramp::Gradient(gradient) => gradient.eval_continuous(t),
            Ramp::Stops(stops) => interpolate(stops, t),
            Ramp::Discrete(colors) => pick(colors, t),
            Ramp::Segments(channels) => Color {
                r: channel_byte(channels[0], t),
                g: channel_byte(channels[1], t),
                b: channel_byte(channels[2], t),
            },
            Ramp::Generated(ramp) => ramp(t),
        }
    }

    /// `n` colours sampled at the interior points of linspace(0, 1, n + 2)
    pub fn palette(&self, n: usize) -> Vec<Color> {
        (1..=n)
            .map(|i| self.eval(i as f64 / (n + 1) as f64))
            .collect()
    }

    /// Darkest entry of `palette(n)`; the first one wins on ties
    pub fn darkest(&self, n: usize) -> Color {
        self.palette(n)
            .into_iter()
            .fold(None, |best: Option<Color>, c| match best {
                Some(b) if luminance(b) <= luminance(c) => Some(b),
                _ => Some(c),
            })
            .unwrap_or_else(|| self.eval(0.0))
    }
}

fn interpolate(stops: &[Color], t: f64) -> Color {
    match stops {
        [] => Color { r: 0, g: 0, b: 0 },
        [only] => *only,
        _ => {
            let scaled = t * (stops.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            let frac = scaled - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            Color {
                r: mix(a.r, b.r),
                g: mix(a.g, b.g),
                b: mix(a.b, b.b),
            }
        }
    }
}

/// Listed colormap lookup: `t` selects one of `colors.len()` equal bins
fn pick(colors: &[Color], t: f64) -> Color {
    match colors.len() {
        0 => Color { r: 0, g: 0, b: 0 },
        len => colors[((t * len as f64) as usize).min(len - 1)],
    }
}

fn channel_byte(anchors: &[(f64, f64)], t: f64) -> u8 {
    let value = match anchors.windows(2).find(|w| t <= w[1].0) {
        Some(&[(x0, y0), (x1, y1)]) if x1 > x0 => y0 + (y1 - y0) * (t - x0) / (x1 - x0),
        Some(w) => w[1].1,
        None => anchors.last().map_or(0.0, |&(_, y)| y),
    };
    unit_byte(value)
}

fn unit_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn unit_color([r, g, b]: [f64; 3]) -> Color {
    Color {
        r: unit_byte(r),
        g: unit_byte(g),
        b: unit_byte(b),
    }
}

/// Hue in [0, 1) for a circular palette: 256 listed hues starting at 0.01
fn circular_hue(t: f64) -> f64 {
    (0.01 + t * 255.0 / 256.0).rem_euclid(1.0)
}

fn hls_ramp(t: f64) -> Color {
    unit_color(hls_to_rgb(circular_hue(t), 0.6, 0.65))
}

fn husl_ramp(t: f64) -> Color {
    unit_color(husl_to_rgb(circular_hue(t) * 359.0, 0.9 * 99.0, 0.65 * 99.0))
}

pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> [f64; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let channel = |hue: f64| {
        let hue = hue.rem_euclid(1.0);
        if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

// HUSL (CIE LCh(uv) with chroma scaled to the sRGB gamut), D65 white point
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2406, -1.5372, -0.4986],
    [-0.9689, 1.8758, 0.0415],
    [0.0557, -0.2040, 1.0570],
];
const REF_U: f64 = 0.19784;
const REF_V: f64 = 0.46834;
const KAPPA: f64 = 903.3;
const EPSILON: f64 = 0.008856;

fn max_chroma(l: f64, h: f64) -> f64 {
    let (sin_h, cos_h) = h.to_radians().sin_cos();
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    let mut result = f64::INFINITY;
    for [m1, m2, m3] in XYZ_TO_RGB {
        let top = (0.99915 * m1 + 1.05122 * m2 + 1.14460 * m3) * sub2;
        let right = 0.86330 * m3 - 0.17266 * m2;
        let left = 0.12949 * m3 - 0.38848 * m1;
        let bottom = (right * sin_h + left * cos_h) * sub2;
        for t in [0.0, 1.0] {
            let c = l * (top - 1.05122 * t) / (bottom + 0.17266 * sin_h * t);
            if c > 0.0 && c < result {
                result = c;
            }
        }
    }
    result
}

fn to_gamma(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// HUSL (h in degrees, s and l in 0..100) to sRGB, channels in 0..1 (unclamped)
pub fn husl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    if l > 99.9999 {
        return [1.0, 1.0, 1.0];
    }
    if l < 0.00001 {
        return [0.0, 0.0, 0.0];
    }

    let chroma = max_chroma(l, h) / 100.0 * s;
    let (sin_h, cos_h) = h.to_radians().sin_cos();
    let (u, v) = (cos_h * chroma, sin_h * chroma);

    let f = (l + 16.0) / 116.0;
    let y = if f.powi(3) > EPSILON { f.powi(3) } else { l / KAPPA };
    let var_u = u / (13.0 * l) + REF_U;
    let var_v = v / (13.0 * l) + REF_V;
    let x = -(9.0 * y * var_u) / ((var_u - 4.0) * var_v - var_u * var_v);
    let z = (9.0 * y - 15.0 * var_v * y - var_v * x) / (3.0 * var_v);

    XYZ_TO_RGB.map(|[a, b, c]| to_gamma(a * x + b * y + c * z))
}

/// Weighted channel sum used to rank palette entries by brightness
pub fn luminance(c: Color) -> f64 {
    (0.2126 * c.r as f64 + 0.7152 * c.g as f64 + 0.0722 * c.b as f64) / 255.0
}

pub fn parse_hex(text: &str) -> Result<Color> {
    let caps = HEX
        .captures(text)
        .ok_or_else(|| DensityError::InvalidColor(text.to_string()))?;
    let digits = &caps["digits"];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let value = u32::from_str_radix(&expanded, 16)
        .map_err(|_| DensityError::InvalidColor(text.to_string()))?;
    Ok(Color {
        r: (value >> 16) as u8,
        g: (value >> 8) as u8,
        b: value as u8,
    })
}

pub fn to_hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

pub fn list_colormaps() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable_by_key(|name| name.to_lowercase());
    names
}
