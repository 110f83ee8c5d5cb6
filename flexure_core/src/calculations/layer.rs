//! Steel Layers
//!
//! A layer is a group of bars or strands at one depth, treated as a single
//! area with one strain. Strain is compatible with a linear strain profile
//! through the neutral axis, plus any locked-in prestrain:
//!
//! ```text
//! ε = 0.003·(d/c - 1) + fse/Es
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{SteelCatalog, SteelType};

/// Concrete strain at the extreme compression fiber at nominal strength (ACI 318-19 §22.2.2.1)
pub const ULTIMATE_CONCRETE_STRAIN: f64 = 0.003;

/// Resolved steel layer, ready for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelLayer {
    /// Steel area (in²)
    pub area_in2: f64,

    /// Depth from the extreme compression fiber (in)
    pub depth_in: f64,

    /// Effective prestress after losses (ksi); zero for mild steel
    pub fse_ksi: f64,

    /// Steel properties
    pub steel: SteelType,
}

impl SteelLayer {
    pub fn new(steel: &SteelType, area_in2: f64, depth_in: f64, fse_ksi: f64) -> Self {
        SteelLayer {
            area_in2,
            depth_in,
            fse_ksi,
            steel: steel.clone(),
        }
    }

    /// Mild steel layer with no prestress
    pub fn mild(steel: &SteelType, area_in2: f64, depth_in: f64) -> Self {
        Self::new(steel, area_in2, depth_in, 0.0)
    }

    /// A layer with effective prestress is a prestressing layer
    pub fn is_prestressed(&self) -> bool {
        self.fse_ksi > 0.0
    }

    /// Effective prestress force fse·Aps (kips)
    pub fn prestress_force_kips(&self) -> f64 {
        self.fse_ksi * self.area_in2
    }

    /// Locked-in strain from effective prestress
    pub fn prestrain(&self) -> f64 {
        self.fse_ksi / self.steel.es_ksi
    }

    /// Total strain for a neutral axis at depth `c` (tension positive)
    pub fn strain_at(&self, c_in: f64) -> f64 {
        ULTIMATE_CONCRETE_STRAIN * (self.depth_in / c_in - 1.0) + self.prestrain()
    }

    /// Force (kips, tension positive) for a neutral axis at depth `c`
    pub fn force_at(&self, c_in: f64) -> f64 {
        self.steel.stress(self.strain_at(c_in)) * self.area_in2
    }

    /// Check the layer against a section of overall depth `h_in`.
    ///
    /// `index` only labels the error.
    pub fn validate(&self, index: usize, h_in: f64) -> CalcResult<()> {
        let field = |name: &str| format!("layers[{}].{}", index, name);

        if !(self.area_in2.is_finite() && self.area_in2 > 0.0) {
            return Err(CalcError::invalid_input(
                field("area_in2"),
                self.area_in2.to_string(),
                "Steel area must be positive",
            ));
        }
        if !(self.depth_in > 0.0 && self.depth_in <= h_in) {
            return Err(CalcError::invalid_input(
                field("depth_in"),
                self.depth_in.to_string(),
                format!("Layer depth must satisfy 0 < d <= h = {} in", h_in),
            ));
        }
        if !(self.fse_ksi.is_finite() && self.fse_ksi >= 0.0) {
            return Err(CalcError::invalid_input(
                field("fse_ksi"),
                self.fse_ksi.to_string(),
                "Effective prestress cannot be negative",
            ));
        }
        if self.fse_ksi > 0.0 && !self.steel.is_prestressing() {
            return Err(CalcError::invalid_input(
                field("fse_ksi"),
                self.fse_ksi.to_string(),
                format!("{} is mild steel and cannot carry prestress", self.steel.id),
            ));
        }
        if self.fse_ksi >= self.steel.stress_cap_ksi {
            return Err(CalcError::invalid_input(
                field("fse_ksi"),
                self.fse_ksi.to_string(),
                "Effective prestress must be below the steel strength",
            ));
        }
        Ok(())
    }
}

/// Layer state at the converged neutral axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    #[serde(flatten)]
    pub layer: SteelLayer,

    /// Total strain (tension positive)
    pub strain: f64,

    /// Stress (ksi, tension positive)
    pub stress_ksi: f64,

    /// Force = stress × area (kips, tension positive)
    pub force_kips: f64,
}

impl LayerResult {
    /// Evaluate a layer for a neutral axis at depth `c`
    ///
    /// Agrees bit for bit with [`SteelLayer::force_at`].
    pub fn at_neutral_axis(layer: &SteelLayer, c_in: f64) -> Self {
        let strain = layer.strain_at(c_in);
        let stress_ksi = layer.steel.stress(strain);
        LayerResult {
            layer: layer.clone(),
            strain,
            stress_ksi,
            force_kips: stress_ksi * layer.area_in2,
        }
    }
}

/// Layer as entered by a user: steel referenced by catalog id.
///
/// ## JSON Example
///
/// ```json
/// { "steel_id": "strand270", "area_in2": 1.53, "depth_in": 20.0, "fse_ksi": 170.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInput {
    /// Catalog id of the steel type
    pub steel_id: String,

    /// Steel area (in²)
    pub area_in2: f64,

    /// Depth from the top fiber (in)
    pub depth_in: f64,

    /// Effective prestress (ksi); defaults to the steel's catalog value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fse_ksi: Option<f64>,
}

impl LayerInput {
    pub fn new(steel_id: impl Into<String>, area_in2: f64, depth_in: f64) -> Self {
        LayerInput {
            steel_id: steel_id.into(),
            area_in2,
            depth_in,
            fse_ksi: None,
        }
    }

    pub fn with_fse(mut self, fse_ksi: f64) -> Self {
        self.fse_ksi = Some(fse_ksi);
        self
    }

    /// Look up the steel type and apply the default prestress.
    pub fn resolve(&self, catalog: &SteelCatalog) -> CalcResult<SteelLayer> {
        let steel = catalog.get(&self.steel_id)?;
        let fse = self.fse_ksi.unwrap_or(steel.default_fse_ksi);
        Ok(SteelLayer::new(steel, self.area_in2, self.depth_in, fse))
    }
}
