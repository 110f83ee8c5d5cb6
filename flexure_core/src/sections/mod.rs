//! # Concrete Cross-Sections
//!
//! Closed set of supported section shapes. Every geometry operation is a
//! `match` over [`SectionGeometry`], so adding a shape forces each call site
//! to handle it.
//!
//! ```text
//!  rectangular     tbeam          sandwich       doubletee         hollowcore
//!  ┌──────┐     ┌──────────┐     ┌────────┐    ┌────────────┐   ┌────────────┐
//!  │      │     └──┐    ┌──┘     └────────┘    └─┐ ┌────┐ ┌─┘   │ ○  ○  ○  ○ │
//!  │      │        │    │          (gap)         │ │    │ │     └────────────┘
//!  └──────┘        └────┘        ┌──────┐        └─┘    └─┘
//!                                └──────┘
//! ```
//!
//! All dimensions are inches measured from the extreme compression (top)
//! fiber; concrete strength is in ksi.
//!
//! - [`compression`] - Concrete compression force and centroid for a stress block depth
//! - [`properties`] - Uncracked gross section properties

pub mod compression;
pub mod properties;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

pub use compression::{
    compression_centroid, compression_zone, concrete_compression, CompressionZone, STRESS_BLOCK_FACTOR,
};
pub use properties::{gross_properties, GrossProperties};

/// Concrete section: compressive strength plus shape.
///
/// ## JSON Example
///
/// ```json
/// { "fc_ksi": 6.0, "type": "tbeam", "bf_in": 48.0, "bw_in": 12.0, "hf_in": 4.0, "h_in": 30.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Specified concrete compressive strength f'c (ksi)
    pub fc_ksi: f64,

    /// Shape and dimensions
    #[serde(flatten)]
    pub geometry: SectionGeometry,
}

/// Section shape and dimensions (inches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SectionGeometry {
    /// Solid rectangle
    #[serde(rename = "rectangular")]
    Rectangular { bw_in: f64, h_in: f64 },

    /// Flange on top of a single web
    #[serde(rename = "tbeam")]
    TBeam {
        bf_in: f64,
        bw_in: f64,
        hf_in: f64,
        h_in: f64,
    },

    /// Two solid wythes separated by a void gap (double wall)
    #[serde(rename = "sandwich")]
    Sandwich {
        bt_in: f64,
        ht_in: f64,
        hg_in: f64,
        bb_in: f64,
        hb_in: f64,
    },

    /// Flange on top of `num_stems` identical rectangular stems
    #[serde(rename = "doubletee")]
    DoubleTee {
        bf_in: f64,
        hf_in: f64,
        num_stems: u32,
        stem_width_in: f64,
        h_in: f64,
    },

    /// Solid slab with a row of circular voids at one depth
    #[serde(rename = "hollowcore")]
    HollowCore {
        bf_in: f64,
        h_in: f64,
        num_voids: u32,
        void_diameter_in: f64,
        void_center_depth_in: f64,
    },
}

impl SectionGeometry {
    /// Overall depth h (in). For a sandwich this is ht + hg + hb.
    pub fn total_depth(&self) -> f64 {
        match *self {
            SectionGeometry::Rectangular { h_in, .. }
            | SectionGeometry::TBeam { h_in, .. }
            | SectionGeometry::DoubleTee { h_in, .. }
            | SectionGeometry::HollowCore { h_in, .. } => h_in,
            SectionGeometry::Sandwich { ht_in, hg_in, hb_in, .. } => ht_in + hg_in + hb_in,
        }
    }

    /// Short type tag, matching the serialized `type`
    pub fn kind(&self) -> &'static str {
        match self {
            SectionGeometry::Rectangular { .. } => "rectangular",
            SectionGeometry::TBeam { .. } => "tbeam",
            SectionGeometry::Sandwich { .. } => "sandwich",
            SectionGeometry::DoubleTee { .. } => "doubletee",
            SectionGeometry::HollowCore { .. } => "hollowcore",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionGeometry::Rectangular { .. } => "Rectangular",
            SectionGeometry::TBeam { .. } => "T-Beam",
            SectionGeometry::Sandwich { .. } => "Sandwich Wall",
            SectionGeometry::DoubleTee { .. } => "Double Tee",
            SectionGeometry::HollowCore { .. } => "Hollow Core",
        }
    }

    /// Check dimensions are positive and internally consistent.
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            SectionGeometry::Rectangular { bw_in, h_in } => {
                positive("bw_in", bw_in)?;
                positive("h_in", h_in)?;
            }
            SectionGeometry::TBeam { bf_in, bw_in, hf_in, h_in } => {
                positive("bf_in", bf_in)?;
                positive("bw_in", bw_in)?;
                positive("hf_in", hf_in)?;
                positive("h_in", h_in)?;
                if hf_in > h_in {
                    return Err(CalcError::invalid_input(
                        "hf_in",
                        hf_in.to_string(),
                        "Flange depth cannot exceed total depth",
                    ));
                }
            }
            SectionGeometry::Sandwich { bt_in, ht_in, hg_in, bb_in, hb_in } => {
                positive("bt_in", bt_in)?;
                positive("ht_in", ht_in)?;
                positive("hg_in", hg_in)?;
                positive("bb_in", bb_in)?;
                positive("hb_in", hb_in)?;
            }
            SectionGeometry::DoubleTee { bf_in, hf_in, num_stems, stem_width_in, h_in } => {
                positive("bf_in", bf_in)?;
                positive("hf_in", hf_in)?;
                positive("stem_width_in", stem_width_in)?;
                positive("h_in", h_in)?;
                if num_stems == 0 {
                    return Err(CalcError::invalid_input("num_stems", "0", "At least one stem is required"));
                }
                if hf_in > h_in {
                    return Err(CalcError::invalid_input(
                        "hf_in",
                        hf_in.to_string(),
                        "Flange thickness cannot exceed total depth",
                    ));
                }
                if f64::from(num_stems) * stem_width_in > bf_in {
                    return Err(CalcError::invalid_input(
                        "stem_width_in",
                        stem_width_in.to_string(),
                        "Combined stem width exceeds flange width",
                    ));
                }
            }
            SectionGeometry::HollowCore {
                bf_in,
                h_in,
                num_voids,
                void_diameter_in,
                void_center_depth_in,
            } => {
                positive("bf_in", bf_in)?;
                positive("h_in", h_in)?;
                if num_voids > 0 {
                    positive("void_diameter_in", void_diameter_in)?;
                    positive("void_center_depth_in", void_center_depth_in)?;
                    let r = void_diameter_in / 2.0;
                    if void_center_depth_in - r < 0.0 || void_center_depth_in + r > h_in {
                        return Err(CalcError::invalid_input(
                            "void_center_depth_in",
                            void_center_depth_in.to_string(),
                            "Voids must lie within the section depth",
                        ));
                    }
                    if f64::from(num_voids) * void_diameter_in > bf_in {
                        return Err(CalcError::invalid_input(
                            "num_voids",
                            num_voids.to_string(),
                            "Voids side by side exceed the section width",
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Section {
    pub fn new(fc_ksi: f64, geometry: SectionGeometry) -> Self {
        Section { fc_ksi, geometry }
    }

    /// Overall depth h (in)
    pub fn total_depth(&self) -> f64 {
        self.geometry.total_depth()
    }

    /// Validate concrete strength and geometry.
    pub fn validate(&self) -> CalcResult<()> {
        positive("fc_ksi", self.fc_ksi)?;
        self.geometry.validate()
    }
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"))
    }
}
