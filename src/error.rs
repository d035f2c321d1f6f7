use std::path::PathBuf;

/// Everything that can stop a density render.
#[derive(Debug, thiserror::Error)]
pub enum DensityError {
    #[error(
        "n must be an integer satisfying 1 <= n <= {max} (got {n})",
        max = crate::physics::MAX_PRINCIPAL
    )]
    InvalidPrincipal { n: i64 },
    #[error("l must be an integer satisfying 0 <= l < n (got l={l}, n={n})")]
    InvalidAzimuthal { n: i64, l: i64 },
    #[error("m must be an integer satisfying -l <= m <= l (got m={m}, l={l})")]
    InvalidMagnetic { l: i64, m: i64 },
    #[error("a0 scale factor must be a finite number greater than 0 (got {0})")]
    InvalidScale(f64),
    #[error("{0} is not a recognized colormap")]
    UnknownColormap(String),
    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    InvalidColor(String),
    #[error("font {path:?} could not be loaded")]
    InvalidFont { path: PathBuf },
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("input closed before all parameters were entered")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("style: {0}")]
    Style(#[from] serde_json::Error),
}

impl DensityError {
    /// True for the parameter-validation failures (as opposed to I/O or drawing).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DensityError::InvalidPrincipal { .. }
                | DensityError::InvalidAzimuthal { .. }
                | DensityError::InvalidMagnetic { .. }
                | DensityError::InvalidScale(_)
                | DensityError::UnknownColormap(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DensityError>;
