//! Hydrogen atom quantum physics calculations
//! Based on the closed-form solution of the Schrödinger equation for hydrogen

use crate::error::{DensityError, Result};
use std::f64::consts::PI;

/// Bohr radius in meters (CODATA 2018)
pub const BOHR_RADIUS_M: f64 = 5.291_772_109_03e-11;

/// Meters to picometers
pub const PICOMETERS_PER_METER: f64 = 1e12;

/// Largest accepted principal quantum number; keeps (n + l)! below the f64 limit of 170!
pub const MAX_PRINCIPAL: i64 = 85;

/// Represents quantum numbers (n, l, m_l)
/// n: Principal quantum number (1 to MAX_PRINCIPAL)
/// l: Azimuthal quantum number (0 to n-1)
/// m_l: Magnetic quantum number (-l to l)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantumNumbers {
    pub n: u32,
    pub l: u32,
    pub m_l: i32,
}

impl QuantumNumbers {
    pub fn new(n: i64, l: i64, m_l: i64) -> Result<Self> {
        let n = validate_n(n)?;
        let l = validate_l(n as i64, l)?;
        let m_l = validate_m(l as i64, m_l)?;
        Ok(QuantumNumbers { n, l, m_l })
    }
}

pub fn validate_n(n: i64) -> Result<u32> {
    if !(1..=MAX_PRINCIPAL).contains(&n) {
        return Err(DensityError::InvalidPrincipal { n });
    }
    Ok(n as u32)
}

pub fn validate_l(n: i64, l: i64) -> Result<u32> {
    if !(0..n).contains(&l) {
        return Err(DensityError::InvalidAzimuthal { n, l });
    }
    Ok(l as u32)
}

pub fn validate_m(l: i64, m: i64) -> Result<i32> {
    if !(-l..=l).contains(&m) {
        return Err(DensityError::InvalidMagnetic { l, m });
    }
    Ok(m as i32)
}

pub fn validate_scale(a0_scale_factor: f64) -> Result<f64> {
    if !a0_scale_factor.is_finite() || a0_scale_factor <= 0.0 {
        return Err(DensityError::InvalidScale(a0_scale_factor));
    }
    Ok(a0_scale_factor)
}

/// Scaled Bohr radius in picometers, the length unit of the sampling grid
pub fn scaled_bohr_radius(a0_scale_factor: f64) -> f64 {
    a0_scale_factor * BOHR_RADIUS_M * PICOMETERS_PER_METER
}

/// Radial part R_nl(r) with its normalization resolved once for (n, l, a0).
///
/// The normalization groups the length scale as `(2 / n) * a0`, not
/// `2 / (n * a0)`; rendered images depend on that exact constant.
#[derive(Debug, Clone, Copy)]
pub struct RadialPart {
    n: f64,
    l: f64,
    degree: u64,
    alpha: f64,
    a0: f64,
    norm: f64,
}

impl RadialPart {
    pub fn new(n: u32, l: u32, a0: f64) -> Self {
        let (n_int, l_int) = (u64::from(n), u64::from(l));
        let degree = n_int.saturating_sub(l_int + 1);
        let n = n as f64;
        let norm = ((2.0 / n * a0).powi(3) * factorial(degree)
            / (2.0 * n * factorial(n_int + l_int)))
        .sqrt();

        RadialPart {
            n,
            l: l as f64,
            degree,
            alpha: (2 * l_int + 1) as f64,
            a0,
            norm,
        }
    }

    pub fn eval(&self, r: f64) -> f64 {
        let p = 2.0 * r / (self.n * self.a0);
        let laguerre = laguerre_polynomial(p, self.degree, self.alpha);
        self.norm * (-p / 2.0).exp() * p.powf(self.l) * laguerre
    }
}

/// Real projection of Y_l^m(theta, phi), normalization resolved once for (l, m).
///
/// Uses P_l^|m| so that m and -m differ at most by sign.
#[derive(Debug, Clone, Copy)]
pub struct AngularPart {
    m: f64,
    degree: u64,
    order: u64,
    norm: f64,
}

impl AngularPart {
    pub fn new(m: i32, l: u32) -> Self {
        let degree = u64::from(l);
        let order = u64::from(m.unsigned_abs());
        let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
        let norm = sign
            * ((2 * degree + 1) as f64 * factorial(degree.saturating_sub(order))
                / (4.0 * PI * factorial(degree + order)))
            .sqrt();

        AngularPart {
            m: m as f64,
            degree,
            order,
            norm,
        }
    }

    pub fn eval(&self, theta: f64, phi: f64) -> f64 {
        self.norm * associated_legendre(theta.cos(), self.degree, self.order) * (self.m * phi).cos()
    }
}

pub fn radial_function(n: u32, l: u32, r: f64, a0: f64) -> f64 {
    RadialPart::new(n, l, a0).eval(r)
}

pub fn angular_function(m: i32, l: u32, theta: f64, phi: f64) -> f64 {
    AngularPart::new(m, l).eval(theta, phi)
}

/// n! as f64; exact up to 22!, infinite past 170!
pub fn factorial(n: u64) -> f64 {
    (2..=n).map(|k| k as f64).product()
}

/// n!! = n (n - 2) (n - 4) ... down to 1 or 2
pub fn double_factorial(n: u64) -> f64 {
    (1..=n).rev().step_by(2).map(|k| k as f64).product()
}

/// Associated Legendre function P_degree^order(x), Condon-Shortley phase included
pub fn associated_legendre(x: f64, degree: u64, order: u64) -> f64 {
    if order > degree {
        return 0.0;
    }

    // P_m^m = (-1)^m (2m - 1)!! (1 - x^2)^(m/2)
    let seed = if order == 0 {
        1.0
    } else {
        let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
        sign * double_factorial(2 * order - 1) * (1.0 - x * x).max(0.0).powf(order as f64 / 2.0)
    };

    // (k - m) P_k = (2k - 1) x P_(k-1) - (k + m - 1) P_(k-2)
    let m = order as f64;
    let (_, value) = ((order + 1)..=degree).fold((0.0, seed), |(prev, current), k| {
        let k = k as f64;
        let next = ((2.0 * k - 1.0) * x * current - (k + m - 1.0) * prev) / (k - m);
        (current, next)
    });
    value
}

/// Generalized Laguerre polynomial L_degree^alpha(x)
pub fn laguerre_polynomial(x: f64, degree: u64, alpha: f64) -> f64 {
    // (k + 1) L_(k+1) = (2k + 1 + alpha - x) L_k - (k + alpha) L_(k-1)
    let (_, value) = (0..degree).fold((0.0, 1.0), |(prev, current), k| {
        let k = k as f64;
        let next = ((2.0 * k + 1.0 + alpha - x) * current - (k + alpha) * prev) / (k + 1.0);
        (current, next)
    });
    value
}
