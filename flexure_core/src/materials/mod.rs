//! # Steel Materials
//!
//! Constitutive model and catalog for the bonded steel in a section.
//!
//! - [`steel`] - `SteelType`, the power-formula stress function and curve sampling
//! - [`catalog`] - Built-in presets and JSON-loaded catalogs
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::materials::{SteelCatalog, STRAND_270_ID};
//!
//! let strand = SteelCatalog::builtin().get(STRAND_270_ID).unwrap();
//! let curve = strand.curve(50);
//! assert_eq!(curve.len(), 50);
//! assert!(curve.iter().all(|p| p.stress_ksi <= strand.stress_cap_ksi));
//! ```

pub mod catalog;
pub mod steel;

pub use catalog::{
    SteelCatalog, BAR_150_ID, GRADE_40_ID, GRADE_60_ID, GRADE_75_ID, GRADE_80_ID, STRAND_250_ID,
    STRAND_270_ID,
};
pub use steel::{curve, stress, CurvePoint, SteelCategory, SteelType};
