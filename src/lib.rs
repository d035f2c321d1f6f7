//! Hydrogen atom wavefunction electron density, rendered as a heatmap of a
//! plane through the nucleus for a quantum state (n, l, m).

pub mod cli;
pub mod colormap;
pub mod error;
pub mod fonts;
pub mod physics;
pub mod prompt;
pub mod render;
pub mod style;
pub mod wavefunction;

pub use error::{DensityError, Result};
pub use physics::QuantumNumbers;
pub use render::{plot_wf_probability_density, RenderRequest, ValidatedRequest};
pub use style::{Style, Theme};
