//! # Cracking Moment and Minimum Strength
//!
//! ACI 318-19 §9.6.2.1 requires a flexural member with bonded prestressed
//! reinforcement to develop φMn ≥ 1.2·Mcr, where Mcr is the moment that
//! cracks the bottom fiber of the uncracked gross section:
//!
//! ```text
//! Mcr = Sb · (fr + P/A + P·e/Sb)
//! fr  = 7.5·√f'c            (psi, normalweight concrete, §19.2.3.1)
//! ```
//!
//! `P` is the total effective prestress force and `e` the eccentricity of its
//! resultant below the gross centroid.

use serde::{Deserialize, Serialize};

use super::layer::SteelLayer;
use crate::sections::{gross_properties, GrossProperties, Section};
use crate::units::{KipFt, KipIn, Ksi, Psi};

/// Factor on Mcr for the minimum strength requirement
pub const MIN_STRENGTH_FACTOR: f64 = 1.2;

/// Results of the cracking moment check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gross": { "area_in2": 288.0, "y_cg_in": 12.0, "ig_in4": 13824.0, "yb_in": 12.0, "sb_in3": 1152.0 },
///   "p_kips": 260.1,
///   "yps_in": 20.0,
///   "e_in": 8.0,
///   "fpc_ksi": 0.903,
///   "fr_ksi": 0.581,
///   "mcr_kip_in": 3790.4,
///   "mcr_kip_ft": 315.9,
///   "min_strength_kip_in": 4548.5,
///   "passes_min_strength": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingResult {
    /// Uncracked gross section properties
    pub gross: GrossProperties,

    /// Total effective prestress force P = Σ fse·Aps (kips)
    pub p_kips: f64,

    /// Depth of the prestress resultant below the top fiber (in)
    pub yps_in: f64,

    /// Eccentricity of P below the gross centroid (in)
    pub e_in: f64,

    /// Average precompression P/A (ksi)
    pub fpc_ksi: f64,

    /// Modulus of rupture (ksi)
    pub fr_ksi: f64,

    /// Cracking moment (kip-in)
    pub mcr_kip_in: f64,

    /// Cracking moment (kip-ft)
    pub mcr_kip_ft: f64,

    /// Required design strength 1.2·Mcr (kip-in)
    pub min_strength_kip_in: f64,

    /// φMn ≥ 1.2·Mcr
    pub passes_min_strength: bool,
}

/// Modulus of rupture fr = 7.5·√f'c with f'c in psi, returned in ksi.
pub fn modulus_of_rupture(fc_ksi: f64) -> f64 {
    let fc: Psi = Ksi(fc_ksi).into();
    let fr: Ksi = Psi(7.5 * fc.0.sqrt()).into();
    fr.0
}

/// Compute Mcr for the section and compare 1.2·Mcr with `phi_mn_kip_in`.
pub fn cracking_check(section: &Section, layers: &[SteelLayer], phi_mn_kip_in: f64) -> CrackingResult {
    let gross = gross_properties(&section.geometry);

    let (p, p_moment) = layers
        .iter()
        .filter(|l| l.is_prestressed())
        .fold((0.0, 0.0), |(p, m), l| {
            let force = l.prestress_force_kips();
            (p + force, m + force * l.depth_in)
        });

    let yps = if p > 0.0 { p_moment / p } else { gross.y_cg_in };
    let e = yps - gross.y_cg_in;
    let fpc = p / gross.area_in2;
    let fr = modulus_of_rupture(section.fc_ksi);

    let mcr = gross.sb_in3 * (fr + fpc + p * e / gross.sb_in3);
    let min_strength = MIN_STRENGTH_FACTOR * mcr;
    let mcr_kip_ft: KipFt = KipIn(mcr).into();

    log::debug!(
        "cracking check: P = {:.2} kips, e = {:.3} in, Mcr = {:.1} kip-in, φMn = {:.1} kip-in",
        p,
        e,
        mcr,
        phi_mn_kip_in
    );

    CrackingResult {
        gross,
        p_kips: p,
        yps_in: yps,
        e_in: e,
        fpc_ksi: fpc,
        fr_ksi: fr,
        mcr_kip_in: mcr,
        mcr_kip_ft: mcr_kip_ft.0,
        min_strength_kip_in: min_strength,
        passes_min_strength: phi_mn_kip_in >= min_strength,
    }
}
