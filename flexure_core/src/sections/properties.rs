//! Gross Section Properties
//!
//! Uncracked, untransformed properties of the concrete section, used only by
//! the cracking moment check. Each shape is decomposed into rectangles and
//! circles and combined with the parallel-axis theorem:
//!
//! ```text
//! A    = Σ Ai
//! y_cg = Σ Ai·yi / A                    (depth below top fiber)
//! Ig   = Σ [ Ii + Ai·(yi - y_cg)² ]
//! yb   = h - y_cg                        (centroid to bottom fiber)
//! Sb   = Ig / yb
//! ```
//!
//! Voids enter as negative parts.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::SectionGeometry;

/// Gross (uncracked) section properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrossProperties {
    /// Gross area Ag (in²)
    pub area_in2: f64,

    /// Centroid depth below the top fiber (in)
    pub y_cg_in: f64,

    /// Moment of inertia about the centroidal axis (in⁴)
    pub ig_in4: f64,

    /// Distance from centroid to the extreme tension (bottom) fiber (in)
    pub yb_in: f64,

    /// Section modulus for the bottom fiber Sb = Ig / yb (in³)
    pub sb_in3: f64,
}

/// One piece of a composite section
#[derive(Debug, Clone, Copy)]
struct Part {
    area: f64,
    centroid: f64,
    own_inertia: f64,
}

impl Part {
    fn rectangle(width: f64, top: f64, height: f64) -> Self {
        Part {
            area: width * height,
            centroid: top + height / 2.0,
            own_inertia: width * height.powi(3) / 12.0,
        }
    }

    fn circle(diameter: f64, center: f64) -> Self {
        let r = diameter / 2.0;
        Part {
            area: PI * r * r,
            centroid: center,
            own_inertia: PI * r.powi(4) / 4.0,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Part {
            area: self.area * factor,
            centroid: self.centroid,
            own_inertia: self.own_inertia * factor,
        }
    }
}

/// Compute gross properties for any section shape.
///
/// Total over all inputs: a hollow core whose voids consume the whole
/// section falls back to the solid rectangle instead of returning a zero or
/// negative area.
pub fn gross_properties(geometry: &SectionGeometry) -> GrossProperties {
    let h = geometry.total_depth();

    let parts: Vec<Part> = match *geometry {
        SectionGeometry::Rectangular { bw_in, h_in } => flanged_parts(bw_in, bw_in, h_in, h_in),
        SectionGeometry::TBeam { bf_in, bw_in, hf_in, h_in } => flanged_parts(bf_in, bw_in, hf_in, h_in),
        SectionGeometry::DoubleTee {
            bf_in,
            hf_in,
            num_stems,
            stem_width_in,
            h_in,
        } => flanged_parts(bf_in, f64::from(num_stems) * stem_width_in, hf_in, h_in),
        SectionGeometry::Sandwich { bt_in, ht_in, hg_in, bb_in, hb_in } => vec![
            Part::rectangle(bt_in, 0.0, ht_in),
            Part::rectangle(bb_in, ht_in + hg_in, hb_in),
        ],
        SectionGeometry::HollowCore {
            bf_in,
            h_in,
            num_voids,
            void_diameter_in,
            void_center_depth_in,
        } => {
            let solid = Part::rectangle(bf_in, 0.0, h_in);
            if num_voids == 0 || void_diameter_in <= 0.0 {
                vec![solid]
            } else {
                let voids = Part::circle(void_diameter_in, void_center_depth_in).scaled(-f64::from(num_voids));
                if solid.area + voids.area <= 0.0 {
                    log::warn!(
                        "hollow-core voids ({:.2} in²) consume the gross area ({:.2} in²); using solid section",
                        -voids.area,
                        solid.area
                    );
                    vec![solid]
                } else {
                    vec![solid, voids]
                }
            }
        }
    };

    combine(&parts, h)
}

/// Flange `bf × hf` over a web `bw × (h - hf)`; the web vanishes when hf = h.
fn flanged_parts(bf: f64, bw: f64, hf: f64, h: f64) -> Vec<Part> {
    let mut parts = vec![Part::rectangle(bf, 0.0, hf)];
    if h > hf {
        parts.push(Part::rectangle(bw, hf, h - hf));
    }
    parts
}

fn combine(parts: &[Part], h: f64) -> GrossProperties {
    let area: f64 = parts.iter().map(|p| p.area).sum();
    let y_cg = parts.iter().map(|p| p.area * p.centroid).sum::<f64>() / area;
    let ig: f64 = parts
        .iter()
        .map(|p| p.own_inertia + p.area * (p.centroid - y_cg).powi(2))
        .sum();
    let yb = h - y_cg;

    GrossProperties {
        area_in2: area,
        y_cg_in: y_cg,
        ig_in4: ig,
        yb_in: yb,
        sb_in3: ig / yb,
    }
}
