//! # Flexural Calculations
//!
//! Strain-compatibility analysis of concrete sections. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, ...) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Modules
//!
//! - [`layer`] - Steel layers and strain compatibility
//! - [`solver`] - Neutral-axis bisection
//! - [`flexure`] - Mn, φ and ductility
//! - [`cracking`] - Cracking moment and the 1.2·Mcr check

pub mod cracking;
pub mod flexure;
pub mod layer;
pub mod solver;

use serde::{Deserialize, Serialize};

pub use cracking::{cracking_check, modulus_of_rupture, CrackingResult};
pub use flexure::{
    analyze, analyze_with, calculate, strength_reduction_factor, AnalysisResult, Ductility, FlexureInput,
};
pub use layer::{LayerInput, LayerResult, SteelLayer};
pub use solver::{beta1, solve, solve_with, EquilibriumState};

/// Enum wrapper for all calculation types stored in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Section flexural strength
    Flexure(FlexureInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Flexure(f) => &f.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Flexure(_) => "Flexure",
        }
    }
}
