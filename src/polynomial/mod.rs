//! Power series evaluation for Besselian element tables
//!
//! Published Besselian elements give each quantity (x, y, d, l1, l2, μ) as a
//! short polynomial in `t - t0`, measured in hours. This module evaluates
//! those polynomials and their first derivative, which the path solver needs
//! for the velocity of the shadow axis.

use serde::{Deserialize, Serialize};

/// A polynomial in one variable with real coefficients
///
/// Coefficients are ordered from lowest to highest degree:
/// [c₀, c₁, c₂, ..., cₙ] where the polynomial is
/// f(t) = c₀ + c₁·t + c₂·t² + ... + cₙ·tⁿ
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    /// Coefficients of the polynomial, lowest order first
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Create a new polynomial with the given coefficients
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Evaluate the polynomial at `t` using Horner's scheme
    ///
    /// An empty coefficient list evaluates to zero.
    pub fn evaluate(&self, t: f64) -> f64 {
        evaluate(&self.coefficients, t)
    }

    /// Evaluate the first derivative of the polynomial at `t`
    ///
    /// The derivative series is c₁ + 2·c₂·t + ... + n·cₙ·tⁿ⁻¹, evaluated
    /// with the same Horner recurrence.
    pub fn derivative(&self, t: f64) -> f64 {
        evaluate_derivative(&self.coefficients, t)
    }

    /// Get the degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Get a reference to the coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of tⁱ, zero when the series is shorter
    pub fn coefficient(&self, i: usize) -> f64 {
        self.coefficients.get(i).copied().unwrap_or(0.0)
    }

    /// True when there are no coefficients at all
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(coefficients: Vec<f64>) -> Self {
        Self::new(coefficients)
    }
}

/// Evaluate Σ cᵢ·tⁱ for a bare coefficient slice
pub fn evaluate(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Evaluate the derivative Σ i·cᵢ·tⁱ⁻¹ for a bare coefficient slice
pub fn evaluate_derivative(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (i, &c)| acc * t + i as f64 * c)
}
