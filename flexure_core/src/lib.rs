//! # flexure_core - Concrete Flexural Strength Engine
//!
//! `flexure_core` computes the nominal and design moment strength of
//! reinforced and prestressed concrete sections by strain compatibility,
//! following ACI 318-19. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use flexure_core::{analyze, Section, SectionGeometry, SteelCatalog, SteelLayer};
//!
//! let strand = SteelCatalog::builtin().get("strand270").unwrap();
//! let section = Section::new(
//!     5.0,
//!     SectionGeometry::TBeam { bf_in: 48.0, bw_in: 12.0, hf_in: 4.0, h_in: 30.0 },
//! );
//! let layers = vec![SteelLayer::new(strand, 1.836, 27.0, 165.0)];
//!
//! let result = analyze(&section, &layers).unwrap();
//! println!("φMn = {:.1} kip-ft ({})", result.phi_mn_kip_ft, result.ductility);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Steel stress-strain model and the steel catalog
//! - [`sections`] - Section shapes, compression zones, gross properties
//! - [`calculations`] - Neutral-axis solver, Mn/φMn, cracking check
//! - [`project`] - Project container, metadata, and analysis settings
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod project;
pub mod sections;
pub mod units;

pub use calculations::{
    analyze, analyze_with, calculate, AnalysisResult, CalculationItem, CrackingResult, Ductility, FlexureInput,
    LayerInput, LayerResult, SteelLayer,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use materials::{SteelCatalog, SteelCategory, SteelType};
pub use project::{AnalysisSettings, CrackingCheck, Project, ProjectMetadata};
pub use sections::{gross_properties, GrossProperties, Section, SectionGeometry};
