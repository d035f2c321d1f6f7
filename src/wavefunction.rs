//! Grid evaluation of Ψ_nlm on the x-z plane through the nucleus.

use crate::physics::{scaled_bohr_radius, AngularPart, QuantumNumbers, RadialPart};
use log::debug;
use ndarray::{Array1, Array2, Zip};

/// Half-width of the sampled plane, in picometers
pub const GRID_EXTENT: f64 = 480.0;
/// Samples per axis
pub const GRID_RESOLUTION: usize = 680;

/// Cartesian sample positions on the cutting plane.
///
/// `x[[i, j]] = axis[i]` and `z[[i, j]] = axis[j]`, so rows walk along x and
/// columns walk along z.
pub struct CoordinateGrid {
    pub axis: Array1<f64>,
    pub x: Array2<f64>,
    pub z: Array2<f64>,
}

impl CoordinateGrid {
    pub fn new(extent: f64, resolution: usize) -> Self {
        let mut axis = Array1::linspace(-extent, extent, resolution);
        // the last sample is the stop value exactly, not start + (n - 1) * step
        if resolution > 1 {
            axis[resolution - 1] = extent;
        }
        let (x, z) = meshgrid(&axis);
        CoordinateGrid { axis, x, z }
    }

    pub fn standard() -> Self {
        Self::new(GRID_EXTENT, GRID_RESOLUTION)
    }

    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Polar radius sqrt(x² + z²)
    pub fn radius(&self) -> Array2<f64> {
        Zip::from(&self.x)
            .and(&self.z)
            .map_collect(|&x, &z| (x * x + z * z).sqrt())
    }

    /// Polar angle atan(x / (z + ε)); ε keeps the z = 0 column finite
    pub fn polar_angle(&self) -> Array2<f64> {
        let eps = f64::EPSILON;
        Zip::from(&self.x)
            .and(&self.z)
            .map_collect(|&x, &z| (x / (z + eps)).atan())
    }
}

/// Square meshgrid over one axis: `x[[i, j]] = axis[i]`, `z[[i, j]] = axis[j]`.
/// Both outputs are built from the shape, so there is no shape-mismatch path.
fn meshgrid(axis: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (axis.len(), axis.len());
    (
        Array2::from_shape_fn(shape, |(i, _)| axis[i]),
        Array2::from_shape_fn(shape, |(_, j)| axis[j]),
    )
}

/// R_nl evaluated elementwise over `r`
pub fn radial_field(n: u32, l: u32, r: &Array2<f64>, a0: f64) -> Array2<f64> {
    let radial = RadialPart::new(n, l, a0);
    r.mapv(|r| radial.eval(r))
}

/// Real angular part evaluated elementwise over `theta` at a fixed azimuth
pub fn angular_field(m: i32, l: u32, theta: &Array2<f64>, phi: f64) -> Array2<f64> {
    let angular = AngularPart::new(m, l);
    theta.mapv(|theta| angular.eval(theta, phi))
}

/// Ψ_nlm = R_nl(r) · Y_l^m(θ, 0) on the standard grid.
pub fn compute_wavefunction(qn: QuantumNumbers, a0_scale_factor: f64) -> Array2<f64> {
    compute_wavefunction_on(&CoordinateGrid::standard(), qn, a0_scale_factor)
}

pub fn compute_wavefunction_on(
    grid: &CoordinateGrid,
    qn: QuantumNumbers,
    a0_scale_factor: f64,
) -> Array2<f64> {
    let a0 = scaled_bohr_radius(a0_scale_factor);
    debug!(
        "evaluating psi({}, {}, {}) on {:?} grid, a0 = {:.3} pm",
        qn.n,
        qn.l,
        qn.m_l,
        grid.dim(),
        a0
    );

    let radial = radial_field(qn.n, qn.l, &grid.radius(), a0);
    let angular = angular_field(qn.m_l, qn.l, &grid.polar_angle(), 0.0);
    radial * angular
}

/// |Ψ|²
pub fn probability_density(psi: &Array2<f64>) -> Array2<f64> {
    psi.mapv(|v| v.abs().powi(2))
}
