//! Command-line parsing: `n l m a0_scale_factor [--dark_theme] [--colormap NAME]`.

use crate::colormap::DEFAULT_COLORMAP;
use crate::render::RenderRequest;
use std::path::PathBuf;

pub const USAGE: &str = "\
Hydrogen Atom - Wavefunction and Electron Density Visualization for specific quantum states (n, l, m).

Usage: hydrogen_density [n l m a0_scale_factor] [options]

Positional arguments (prompted for interactively when omitted):
  n                    principal quantum number (int, 1 <= n <= 85)
  l                    azimuthal quantum number (int, 0 <= l < n)
  m                    magnetic quantum number (int, -l <= m <= l)
  a0_scale_factor      Bohr radius scale factor (float, > 0)

Options:
  --dark_theme         use a dark background taken from the colormap
  --colormap NAME      colormap name (default: rocket)
  --style FILE         JSON file with style overrides
  --dump_style         print the resolved style as JSON and exit
  --list_colormaps     print the registered colormap names and exit
  -h, --help           show this message

Set RUST_LOG to change log verbosity and HYDROGEN_DENSITY_FONT to pick the annotation font.";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CliError {
    #[error("unknown option {0}")]
    UnknownOption(String),
    #[error("option {0} expects a value")]
    MissingValue(String),
    #[error("argument {name}: invalid {kind} value {value:?}")]
    InvalidNumber {
        name: &'static str,
        kind: &'static str,
        value: String,
    },
    #[error("unexpected extra argument {0:?}")]
    UnexpectedArgument(String),
    #[error("n, l, m and a0_scale_factor must be given together")]
    MissingPositionals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub n: Option<i64>,
    pub l: Option<i64>,
    pub m: Option<i64>,
    pub a0_scale_factor: Option<f64>,
    pub dark_theme: bool,
    pub colormap: String,
    pub style_path: Option<PathBuf>,
    pub dump_style: bool,
    pub list_colormaps: bool,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        CliArgs {
            n: None,
            l: None,
            m: None,
            a0_scale_factor: None,
            dark_theme: false,
            colormap: DEFAULT_COLORMAP.to_string(),
            style_path: None,
            dump_style: false,
            list_colormaps: false,
            help: false,
        }
    }
}

impl CliArgs {
    /// `None` when `n` is absent and the prompt should take over.
    pub fn request(&self) -> Result<Option<RenderRequest>, CliError> {
        let Some(n) = self.n else {
            return Ok(None);
        };
        match (self.l, self.m, self.a0_scale_factor) {
            (Some(l), Some(m), Some(a0_scale_factor)) => Ok(Some(RenderRequest {
                n,
                l,
                m,
                a0_scale_factor,
                dark_theme: self.dark_theme,
                colormap: self.colormap.clone(),
            })),
            _ => Err(CliError::MissingPositionals),
        }
    }
}

// "-1" is a negative number, not an option
fn looks_like_option(arg: &str) -> bool {
    arg.starts_with('-') && arg.parse::<f64>().is_err()
}

fn parse_int(name: &'static str, value: &str) -> Result<i64, CliError> {
    value.parse().map_err(|_| CliError::InvalidNumber {
        name,
        kind: "int",
        value: value.to_string(),
    })
}

pub fn parse_args<I, S>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = CliArgs::default();
    let mut positionals = Vec::new();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        if !looks_like_option(&arg) {
            positionals.push(arg);
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let mut value_for = |flag: &str| {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| CliError::MissingValue(flag.to_string()))
        };

        match flag.as_str() {
            "--dark_theme" => parsed.dark_theme = true,
            "--colormap" => parsed.colormap = value_for("--colormap")?,
            "--style" => parsed.style_path = Some(PathBuf::from(value_for("--style")?)),
            "--dump_style" => parsed.dump_style = true,
            "--list_colormaps" => parsed.list_colormaps = true,
            "-h" | "--help" => parsed.help = true,
            _ => return Err(CliError::UnknownOption(arg)),
        }
    }

    let mut positionals = positionals.into_iter();
    if let Some(value) = positionals.next() {
        parsed.n = Some(parse_int("n", &value)?);
    }
    if let Some(value) = positionals.next() {
        parsed.l = Some(parse_int("l", &value)?);
    }
    if let Some(value) = positionals.next() {
        parsed.m = Some(parse_int("m", &value)?);
    }
    if let Some(value) = positionals.next() {
        parsed.a0_scale_factor = Some(value.parse().map_err(|_| CliError::InvalidNumber {
            name: "a0_scale_factor",
            kind: "float",
            value: value.clone(),
        })?);
    }
    if let Some(extra) = positionals.next() {
        return Err(CliError::UnexpectedArgument(extra));
    }

    Ok(parsed)
}
