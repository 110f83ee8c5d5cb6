//! # Strain-Compatibility Equilibrium Solver
//!
//! Finds the neutral-axis depth `c` at which concrete compression balances
//! the net steel force:
//!
//! ```text
//! R(c) = Cc(β1·c) - Σ fs(εi(c))·Aps_i        (compression positive)
//! ```
//!
//! `R` increases with `c`: a deeper neutral axis compresses more concrete and
//! strains the steel less. A positive residual therefore means the neutral
//! axis is too deep and the upper bound drops to the trial; a negative one
//! raises the lower bound to it.
//!
//! ## Why bisection
//!
//! The compression area is piecewise in `a` with kinks at flange bottoms,
//! sandwich gaps and void edges, and the steel law has a sharp knee, so
//! derivatives are unreliable exactly where the root tends to sit. Bisection
//! needs only the sign of `R` and the monotonicity above, and the bracket
//! `[0.01, h]` halves every step, so it always terminates. Do not replace it
//! with Newton iteration.
//!
//! The solver is optimistic: it returns the last trial even when the
//! iteration cap is hit. The evaluator performs the global force-balance
//! check and rejects unbalanced states.

use serde::{Deserialize, Serialize};

use super::layer::{LayerResult, SteelLayer};
use crate::sections::{compression_zone, Section, STRESS_BLOCK_FACTOR};

/// Shallowest neutral-axis depth searched (in)
pub const C_MIN_IN: f64 = 0.01;

/// Default iteration cap for the bisection
pub const MAX_ITERATIONS: usize = 500;

/// Default stopping tolerance on |R| (kips)
pub const FORCE_TOLERANCE_KIPS: f64 = 1e-6;

/// Stress block depth factor β1 (ACI 318-19 Table 22.2.2.4.3), `fc` in ksi.
///
/// 0.85 up to 4 ksi, dropping 0.05 per ksi to a floor of 0.65 at 8 ksi.
pub fn beta1(fc_ksi: f64) -> f64 {
    if fc_ksi <= 4.0 {
        0.85
    } else if fc_ksi >= 8.0 {
        0.65
    } else {
        0.85 - 0.05 * (fc_ksi - 4.0)
    }
}

/// Converged (or last trial) state of the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumState {
    /// Neutral-axis depth (in)
    pub c_in: f64,
    /// Stress block depth a = β1·c (in)
    pub a_in: f64,
    pub beta1: f64,
    /// Concrete compression resultant (kips)
    pub cc_kips: f64,
    /// Depth of Cc below the top fiber (in)
    pub cc_centroid_in: f64,
    pub layers: Vec<LayerResult>,
    /// Bisection steps taken
    pub iterations: usize,
}

impl EquilibriumState {
    /// Σ layer forces (kips, tension positive)
    pub fn total_steel_force_kips(&self) -> f64 {
        self.layers.iter().map(|l| l.force_kips).sum()
    }

    /// Cc - Σ F (kips)
    pub fn residual_kips(&self) -> f64 {
        self.cc_kips - self.total_steel_force_kips()
    }
}

/// Solve with the default iteration cap and tolerance.
pub fn solve(section: &Section, layers: &[SteelLayer]) -> EquilibriumState {
    solve_with(section, layers, MAX_ITERATIONS, FORCE_TOLERANCE_KIPS)
}

/// Bisect on `c` over `[C_MIN_IN, h]`.
///
/// Stops when |R| < `tolerance_kips` or after `max_iterations` trials.
/// Trials work on borrowed layers; per-layer results are built once for the
/// returned neutral axis.
pub fn solve_with(
    section: &Section,
    layers: &[SteelLayer],
    max_iterations: usize,
    tolerance_kips: f64,
) -> EquilibriumState {
    let b1 = beta1(section.fc_ksi);
    let mut lo = C_MIN_IN;
    let mut hi = section.total_depth();

    let mut last = Trial::at(section, layers, b1, 0.5 * (lo + hi));
    let mut iterations = 0;

    for iteration in 1..=max_iterations {
        let c = 0.5 * (lo + hi);
        last = Trial::at(section, layers, b1, c);
        iterations = iteration;

        let residual = last.residual_kips();
        log::trace!("bisection {}: c = {:.6} in, R = {:.6e} kips", iteration, c, residual);

        if residual.abs() < tolerance_kips {
            break;
        }
        if residual > 0.0 {
            hi = c;
        } else {
            lo = c;
        }
    }

    let state = EquilibriumState {
        c_in: last.c_in,
        a_in: last.a_in,
        beta1: b1,
        cc_kips: last.cc_kips,
        cc_centroid_in: last.cc_centroid_in,
        layers: layers.iter().map(|l| LayerResult::at_neutral_axis(l, last.c_in)).collect(),
        iterations,
    };

    log::debug!(
        "neutral axis c = {:.4} in after {} iterations (R = {:.3e} kips)",
        state.c_in,
        state.iterations,
        state.residual_kips()
    );
    state
}

/// Forces for one trial neutral axis
#[derive(Debug, Clone, Copy)]
struct Trial {
    c_in: f64,
    a_in: f64,
    cc_kips: f64,
    cc_centroid_in: f64,
    steel_force_kips: f64,
}

impl Trial {
    fn at(section: &Section, layers: &[SteelLayer], b1: f64, c: f64) -> Self {
        let a = b1 * c;
        let zone = compression_zone(a, &section.geometry);
        Trial {
            c_in: c,
            a_in: a,
            cc_kips: STRESS_BLOCK_FACTOR * section.fc_ksi * zone.area_in2,
            cc_centroid_in: zone.centroid_in,
            steel_force_kips: layers.iter().map(|l| l.force_at(c)).sum(),
        }
    }

    fn residual_kips(&self) -> f64 {
        self.cc_kips - self.steel_force_kips
    }
}
