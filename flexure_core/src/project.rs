//! # Project Data Structures
//!
//! The `Project` struct is the root container for a set of section analyses.
//! Projects serialize to `.flx` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: AnalysisSettings (code, solver limits, checks)
//! └── items: HashMap<Uuid, CalculationItem> (all calculations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Precast");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("ACI 318-19"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::solver::{FORCE_TOLERANCE_KIPS, MAX_ITERATIONS};
use crate::calculations::{calculate, AnalysisResult, CalculationItem};
use crate::errors::{CalcError, CalcResult};
use crate::materials::SteelCatalog;

/// Current schema version for .flx files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default global force-balance tolerance (kips)
pub const EQUILIBRIUM_CHECK_KIPS: f64 = 0.1;

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Analysis settings shared by every item
    #[serde(default)]
    pub settings: AnalysisSettings,

    /// All calculation items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flexure_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item, returning its new UUID.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access marks the project as modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Run one item with the project settings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flexure_core::project::Project;
    /// use flexure_core::calculations::{CalculationItem, FlexureInput, LayerInput};
    /// use flexure_core::materials::{SteelCatalog, GRADE_60_ID};
    /// use flexure_core::sections::{Section, SectionGeometry};
    ///
    /// let mut project = Project::new("Engineer", "25-001", "Client");
    /// let beam = FlexureInput::new(
    ///     "B-1",
    ///     Section::new(5.0, SectionGeometry::Rectangular { bw_in: 14.0, h_in: 28.0 }),
    /// )
    /// .with_layer(LayerInput::new(GRADE_60_ID, 3.16, 25.5));
    ///
    /// let id = project.add_item(CalculationItem::Flexure(beam));
    /// let result = project.analyze_item(&id, SteelCatalog::builtin()).unwrap();
    /// assert!(result.mn_kip_ft > 0.0);
    /// ```
    pub fn analyze_item(&self, id: &Uuid, catalog: &SteelCatalog) -> CalcResult<AnalysisResult> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| CalcError::invalid_input("item", id.to_string(), "No calculation with this id"))?;
        match item {
            CalculationItem::Flexure(input) => calculate(input, catalog, &self.settings),
        }
    }

    /// Run every item, sorted by label for stable output.
    pub fn analyze_all(&self, catalog: &SteelCatalog) -> Vec<(Uuid, String, CalcResult<AnalysisResult>)> {
        let mut ids: Vec<(&Uuid, &CalculationItem)> = self.items.iter().collect();
        ids.sort_by(|a, b| a.1.label().cmp(b.1.label()).then(a.0.cmp(b.0)));
        ids.into_iter()
            .map(|(id, item)| (*id, item.label().to_string(), self.analyze_item(id, catalog)))
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// When to run the cracking moment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrackingCheck {
    /// Only when some layer carries effective prestress (ACI 318-19 §9.6.2.1)
    #[default]
    PrestressedOnly,
    Always,
    Never,
}

/// Solver limits and code checks applied to every analysis.
///
/// Fields missing from a project file take their defaults.
///
/// ## JSON Example
///
/// ```json
/// {
///   "code": "ACI 318-19",
///   "max_iterations": 500,
///   "force_tolerance_kips": 1e-6,
///   "equilibrium_check_kips": 0.1,
///   "cracking_check": "prestressed_only",
///   "curve_points": 100
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Design code label
    pub code: String,

    /// Bisection iteration cap
    pub max_iterations: usize,

    /// Bisection stops when |Cc - ΣF| falls below this (kips)
    pub force_tolerance_kips: f64,

    /// Results with |Cc - ΣF| above this are rejected (kips)
    pub equilibrium_check_kips: f64,

    pub cracking_check: CrackingCheck,

    /// Points per sampled stress-strain curve
    pub curve_points: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            code: "ACI 318-19".to_string(),
            max_iterations: MAX_ITERATIONS,
            force_tolerance_kips: FORCE_TOLERANCE_KIPS,
            equilibrium_check_kips: EQUILIBRIUM_CHECK_KIPS,
            cracking_check: CrackingCheck::default(),
            curve_points: 100,
        }
    }
}
