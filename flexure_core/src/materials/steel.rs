//! Reinforcing and Prestressing Steel
//!
//! Stress-strain behavior of bonded steel per the Devalapura-Tadros / PCI
//! "power formula":
//!
//! ```text
//! fs = Es·ε · [ Q + (1 - Q) / (1 + (Es·ε / (K·fpy))^R)^(1/R) ]  ≤ stress_cap
//! ```
//!
//! - `Q` is the slope of the strain-hardening branch relative to `Es`
//!   (zero for mild steel, which gives an elastic-perfectly-plastic curve)
//! - `R` controls how sharply the curve turns at yield
//! - `K` shifts the knee so that the 0.2% offset yield lands on `fpy`
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::materials::{SteelCatalog, GRADE_60_ID};
//!
//! let grade60 = SteelCatalog::builtin().get(GRADE_60_ID).unwrap();
//! assert_eq!(grade60.stress(0.0), 0.0);
//! assert!((grade60.stress(0.01) - 60.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Strains smaller than this are treated as exactly zero.
pub const ZERO_STRAIN: f64 = 1e-12;

/// Steel family. Decides whether a layer may carry effective prestress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteelCategory {
    /// Deformed reinforcing bar (no prestress)
    Mild,
    /// Strand, wire or bar intended for prestressing
    Prestressing,
}

impl SteelCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelCategory::Mild => "Mild reinforcement",
            SteelCategory::Prestressing => "Prestressing steel",
        }
    }
}

impl std::fmt::Display for SteelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Catalog entry describing one steel product.
///
/// Immutable once loaded; layers reference it for the duration of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelType {
    /// Catalog key (e.g., "grade60", "strand270")
    pub id: String,

    /// Display name (e.g., "ASTM A416 Grade 270 strand")
    pub name: String,

    /// Mild or prestressing
    pub category: SteelCategory,

    /// Modulus of elasticity Es (ksi)
    pub es_ksi: f64,

    /// Specified tensile strength fpu (ksi)
    pub fpu_ksi: f64,

    /// Yield strength fpy (ksi)
    pub fpy_ksi: f64,

    /// Upper bound on computed stress (ksi): fpy for mild steel, fpu for prestressing
    pub stress_cap_ksi: f64,

    /// Power formula parameter Q (0 for mild steel)
    pub q: f64,

    /// Power formula parameter R (curve sharpness)
    pub r: f64,

    /// Power formula parameter K (yield knee offset)
    pub k: f64,

    /// Default effective prestress after losses (ksi), 0 for mild steel
    #[serde(default)]
    pub default_fse_ksi: f64,
}

impl SteelType {
    /// Check the invariants the power formula relies on.
    ///
    /// Run once when a catalog is loaded, not per stress evaluation.
    pub fn validate(&self) -> CalcResult<()> {
        let field = |name: &str| format!("{}.{}", self.id, name);

        if !(self.es_ksi > 0.0) {
            return Err(CalcError::invalid_input(field("es_ksi"), self.es_ksi.to_string(), "Es must be positive"));
        }
        if !(self.r > 0.0) {
            return Err(CalcError::invalid_input(field("r"), self.r.to_string(), "R must be positive"));
        }
        if !(self.q >= 0.0 && self.q < 1.0) {
            return Err(CalcError::invalid_input(field("q"), self.q.to_string(), "Q must satisfy 0 <= Q < 1"));
        }
        if !(self.k > 0.0) {
            return Err(CalcError::invalid_input(field("k"), self.k.to_string(), "K must be positive"));
        }
        if !(self.stress_cap_ksi > 0.0) {
            return Err(CalcError::invalid_input(
                field("stress_cap_ksi"),
                self.stress_cap_ksi.to_string(),
                "Stress cap must be positive",
            ));
        }
        if !(self.fpy_ksi > 0.0 && self.fpy_ksi <= self.fpu_ksi) {
            return Err(CalcError::invalid_input(
                field("fpy_ksi"),
                self.fpy_ksi.to_string(),
                "Yield strength must be positive and not exceed fpu",
            ));
        }
        if self.default_fse_ksi < 0.0 {
            return Err(CalcError::invalid_input(
                field("default_fse_ksi"),
                self.default_fse_ksi.to_string(),
                "Effective prestress cannot be negative",
            ));
        }
        if self.category == SteelCategory::Mild && (self.q != 0.0 || self.default_fse_ksi != 0.0) {
            return Err(CalcError::invalid_input(
                field("category"),
                "mild",
                "Mild steel requires Q = 0 and no default prestress",
            ));
        }
        Ok(())
    }

    /// Whether this steel can carry effective prestress
    pub fn is_prestressing(&self) -> bool {
        self.category == SteelCategory::Prestressing
    }

    /// Yield strain εty = fpy / Es
    pub fn yield_strain(&self) -> f64 {
        self.fpy_ksi / self.es_ksi
    }

    /// Stress (ksi) at a given strain using the power formula.
    ///
    /// Sign follows the strain (tension positive). The magnitude never
    /// exceeds `stress_cap_ksi` and is non-decreasing in `|strain|`.
    pub fn stress(&self, strain: f64) -> f64 {
        stress(strain, self)
    }

    /// Sample the stress-strain curve, see [`curve`].
    pub fn curve(&self, num_points: usize) -> Vec<CurvePoint> {
        curve(self, num_points)
    }
}

impl std::fmt::Display for SteelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (fpu={:.0} ksi, fpy={:.0} ksi, Es={:.0} ksi)",
            self.name, self.fpu_ksi, self.fpy_ksi, self.es_ksi
        )
    }
}

/// Power formula stress (ksi) for `strain` in `steel`.
pub fn stress(strain: f64, steel: &SteelType) -> f64 {
    if strain.abs() < ZERO_STRAIN {
        return 0.0;
    }

    let abs_strain = strain.abs();
    let elastic = steel.es_ksi * abs_strain;
    let ratio = elastic / (steel.k * steel.fpy_ksi);
    // (1 + ratio^R)^(1/R), factored past the knee so ratio^R cannot overflow
    let bracket = if ratio > 1.0 {
        ratio * (1.0 + ratio.powf(-steel.r)).powf(1.0 / steel.r)
    } else {
        (1.0 + ratio.powf(steel.r)).powf(1.0 / steel.r)
    };
    let fs = elastic * (steel.q + (1.0 - steel.q) / bracket);
    let capped = fs.min(steel.stress_cap_ksi);

    if strain >= 0.0 {
        capped
    } else {
        -capped
    }
}

/// One sample of a stress-strain curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub strain: f64,
    pub stress_ksi: f64,
}

/// Sample the stress-strain curve from zero strain to `3·fpu/Es`.
///
/// Strain is spaced linearly and both end points are included. A request for
/// a single point yields only the origin; zero points yields an empty curve.
pub fn curve(steel: &SteelType, num_points: usize) -> Vec<CurvePoint> {
    let max_strain = 3.0 * steel.fpu_ksi / steel.es_ksi;
    let steps = num_points.saturating_sub(1).max(1) as f64;

    (0..num_points)
        .map(|i| {
            let strain = max_strain * i as f64 / steps;
            CurvePoint {
                strain,
                stress_ksi: stress(strain, steel),
            }
        })
        .collect()
}
