use anyhow::{bail, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::Serialize;

/// Classification of the discrete update by spectral radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrowthClass {
    /// Spectral radius > 1: every mode's amplitude grows each step.
    Growing,
    /// Spectral radius = 1: amplitudes are preserved.
    Neutral,
    /// Spectral radius < 1: amplitudes decay.
    Decaying,
}

/// Eigenvalue analysis of the Euler update matrix for one (w, h) pair.
#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub omega: f64,
    pub step_size: f64,
    pub eigenvalues: Vec<Complex64>,
    pub spectral_radius: f64,
    pub class: GrowthClass,
}

/// The 2x2 matrix advancing the Euler-discretized harmonic oscillator by
/// one step:
///
///   [ x_{k+1} ]   [ 1       h ] [ x_k ]
///   [ y_{k+1} ] = [ -h w^2  1 ] [ y_k ]
pub fn amplification_matrix(omega: f64, h: f64) -> DMatrix<f64> {
    DMatrix::from_row_slice(2, 2, &[1.0, h, -h * omega * omega, 1.0])
}

/// Computes the eigenvalues of the amplification matrix numerically and
/// classifies the update.
///
/// The eigenvalues are 1 +/- i h w, so the spectral radius is
/// sqrt(1 + h^2 w^2): strictly above 1 whenever h > 0 and w != 0. The
/// discretization turns a neutrally stable oscillation into exponential
/// growth at every step size, which is the lesson this crate exists to
/// demonstrate.
pub fn analyze(omega: f64, h: f64) -> Result<StabilityReport> {
    if !omega.is_finite() {
        bail!("Frequency omega must be finite.");
    }
    if !h.is_finite() {
        bail!("Step size h must be finite.");
    }

    let matrix = amplification_matrix(omega, h);
    let eigenvalues: Vec<Complex64> = matrix.complex_eigenvalues().iter().copied().collect();
    let spectral_radius = eigenvalues
        .iter()
        .map(|lambda| lambda.norm())
        .fold(0.0, f64::max);

    // Tolerance absorbs eigenvalue-solver noise around the neutral circle.
    let class = if spectral_radius > 1.0 + 1e-12 {
        GrowthClass::Growing
    } else if spectral_radius < 1.0 - 1e-12 {
        GrowthClass::Decaying
    } else {
        GrowthClass::Neutral
    };

    Ok(StabilityReport {
        omega,
        step_size: h,
        eigenvalues,
        spectral_radius,
        class,
    })
}
