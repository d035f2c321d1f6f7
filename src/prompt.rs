//! Interactive fallback when no quantum numbers are given on the command line.

use crate::colormap::{Colormap, DEFAULT_COLORMAP};
use crate::error::{DensityError, Result};
use crate::physics::{validate_l, validate_m, validate_n, validate_scale};
use crate::render::RenderRequest;
use std::io::{BufRead, Write};

pub const SEPARATOR: &str = "--- --- --- --- --- --- --- --- ---";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DensityError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Re-asks until `accept` returns a value; rejections are printed, never fatal.
    fn ask_until<T>(
        &mut self,
        question: &str,
        mut accept: impl FnMut(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(question)?;
            match accept(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "(!) {message}")?,
            }
        }
    }

    pub fn request(&mut self) -> Result<RenderRequest> {
        writeln!(self.output, "{SEPARATOR}")?;
        writeln!(
            self.output,
            "Hydrogen Atom - Wavefunction and Electron Density Visualizer"
        )?;
        writeln!(self.output, "\nRequired parameters /")?;

        let n = self.ask_until("Principal quantum number (n): ", |text| {
            let n = parse_integer(text)?;
            validate_n(n).map(|_| n).map_err(|e| e.to_string())
        })?;
        let l = self.ask_until("Azimuthal quantum number (l): ", |text| {
            let l = parse_integer(text)?;
            validate_l(n, l).map(|_| l).map_err(|e| e.to_string())
        })?;
        let m = self.ask_until("Magnetic quantum number (m): ", |text| {
            let m = parse_integer(text)?;
            validate_m(l, m).map(|_| m).map_err(|e| e.to_string())
        })?;
        let a0_scale_factor = self.ask_until("Bohr radius scale factor: ", |text| {
            let value: f64 = text
                .parse()
                .map_err(|_| format!("enter a valid number greater than 0, got {text:?}"))?;
            validate_scale(value).map_err(|e| e.to_string())
        })?;

        writeln!(self.output, "\nOptional parameters /")?;
        let dark_choice =
            self.ask("[Press ENTER to skip] Use the dark theme? [yes/y] (default is no): ")?;
        let dark_theme = parse_yes(&dark_choice);

        let colormap = self.ask_until(
            &format!("[Press ENTER to skip] Colormap (default is \"{DEFAULT_COLORMAP}\"): "),
            |text| {
                if text.is_empty() {
                    return Ok(DEFAULT_COLORMAP.to_string());
                }
                Colormap::from_name(text)
                    .map(|_| text.to_string())
                    .map_err(|e| e.to_string())
            },
        )?;
        writeln!(self.output, "\n{SEPARATOR}")?;

        Ok(RenderRequest {
            n,
            l,
            m,
            a0_scale_factor,
            dark_theme,
            colormap,
        })
    }
}

fn parse_integer(text: &str) -> std::result::Result<i64, String> {
    text.parse()
        .map_err(|_| format!("expected an integer, got {text:?}"))
}

/// `yes` / `y` in any case; everything else is no
pub fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn run(script: &str) -> (Result<RenderRequest>, String) {
        let mut prompter = Prompter::new(Cursor::new(script.to_string()), Vec::new());
        let result = prompter.request();
        let output = String::from_utf8(prompter.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn test_valid_answers_with_defaults() {
        let (result, _) = run("2\n1\n-1\n1.5\n\n\n");
        assert_eq!(
            result.unwrap(),
            RenderRequest {
                n: 2,
                l: 1,
                m: -1,
                a0_scale_factor: 1.5,
                dark_theme: false,
                colormap: "rocket".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_answers_are_reasked() {
        let script = "zero\n0\n3\n3\n2\n5\n-2\n-1\nabc\n0.8\nY\nnope\nmako\n";
        let (result, output) = run(script);
        let request = result.unwrap();

        assert_eq!((request.n, request.l, request.m), (3, 2, -2));
        assert_eq!(request.a0_scale_factor, 0.8);
        assert!(request.dark_theme);
        assert_eq!(request.colormap, "mako");

        assert!(output.contains("expected an integer, got \"zero\""));
        assert!(output.contains("n must be an integer satisfying 1 <= n <= 85"));
        assert!(output.contains("l must be an integer satisfying 0 <= l < n"));
        assert!(output.contains("m must be an integer satisfying -l <= m <= l"));
        assert!(output.contains("a0 scale factor must be a finite number greater than 0"));
        assert!(output.contains("nope is not a recognized colormap"));
    }

    #[test]
    fn test_closed_input_is_reported() {
        let (result, _) = run("1\n");
        assert!(matches!(result, Err(DensityError::InputClosed)));
    }

    #[test]
    fn test_parse_yes() {
        assert!(parse_yes("yes"));
        assert!(parse_yes("Y"));
        assert!(parse_yes(" YES "));
        assert!(!parse_yes(""));
        assert!(!parse_yes("no"));
        assert!(!parse_yes("yeah"));
    }
}
