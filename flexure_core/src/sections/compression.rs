//! Concrete Compression Zone
//!
//! Whitney stress block: uniform stress 0.85·f'c over the solid part of the
//! section between the top fiber and depth `a`. Each shape differs only in
//! how the compressed area and its centroid accumulate as `a` passes the
//! shape's internal transition depths (flange bottom, gap, voids).
//!
//! A depth sitting exactly on a transition uses the shallower branch.
//!
//! Callers keep `a <= h`; the neutral-axis search range guarantees it.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{Section, SectionGeometry};

/// Stress block intensity factor (ACI 318-19 §22.2.2.4.1)
pub const STRESS_BLOCK_FACTOR: f64 = 0.85;

/// Compressed concrete area and the depth of its centroid below the top fiber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionZone {
    pub area_in2: f64,
    pub centroid_in: f64,
}

impl CompressionZone {
    fn rectangle(width: f64, top: f64, depth: f64) -> Self {
        CompressionZone {
            area_in2: width * depth,
            centroid_in: top + depth / 2.0,
        }
    }

    /// Area-weighted combination of two disjoint pieces
    fn combine(self, other: CompressionZone) -> Self {
        let area = self.area_in2 + other.area_in2;
        let centroid = if area > 0.0 {
            (self.area_in2 * self.centroid_in + other.area_in2 * other.centroid_in) / area
        } else {
            self.centroid_in
        };
        CompressionZone {
            area_in2: area,
            centroid_in: centroid,
        }
    }
}

/// Concrete compression force Cc (kips) for stress block depth `a`.
pub fn concrete_compression(fc_ksi: f64, a: f64, section: &Section) -> f64 {
    STRESS_BLOCK_FACTOR * fc_ksi * compression_zone(a, &section.geometry).area_in2
}

/// Depth (in) of the compression resultant below the top fiber.
pub fn compression_centroid(a: f64, section: &Section) -> f64 {
    compression_zone(a, &section.geometry).centroid_in
}

/// Compressed area and centroid for stress block depth `a`.
pub fn compression_zone(a: f64, geometry: &SectionGeometry) -> CompressionZone {
    let a = a.max(0.0);
    match *geometry {
        // Rectangle is a T-beam whose flange spans the full depth
        SectionGeometry::Rectangular { bw_in, h_in } => flanged(a, bw_in, bw_in, h_in),
        SectionGeometry::TBeam { bf_in, bw_in, hf_in, .. } => flanged(a, bf_in, bw_in, hf_in),
        SectionGeometry::DoubleTee {
            bf_in,
            hf_in,
            num_stems,
            stem_width_in,
            ..
        } => flanged(a, bf_in, f64::from(num_stems) * stem_width_in, hf_in),
        SectionGeometry::Sandwich { bt_in, ht_in, hg_in, bb_in, hb_in } => {
            if a <= ht_in {
                CompressionZone::rectangle(bt_in, 0.0, a)
            } else if a <= ht_in + hg_in {
                // The gap is void: area stays frozen at the full top wythe
                CompressionZone::rectangle(bt_in, 0.0, ht_in)
            } else {
                let bottom_top = ht_in + hg_in;
                let bottom_depth = (a - bottom_top).min(hb_in);
                CompressionZone::rectangle(bt_in, 0.0, ht_in)
                    .combine(CompressionZone::rectangle(bb_in, bottom_top, bottom_depth))
            }
        }
        SectionGeometry::HollowCore {
            bf_in,
            num_voids,
            void_diameter_in,
            void_center_depth_in,
            ..
        } => hollow_core(a, bf_in, num_voids, void_diameter_in, void_center_depth_in),
    }
}

/// Flange of width `bf` and depth `hf` over a web of width `bw`.
fn flanged(a: f64, bf: f64, bw: f64, hf: f64) -> CompressionZone {
    if a <= hf {
        CompressionZone::rectangle(bf, 0.0, a)
    } else {
        CompressionZone::rectangle(bf, 0.0, hf).combine(CompressionZone::rectangle(bw, hf, a - hf))
    }
}

fn hollow_core(a: f64, bf: f64, num_voids: u32, diameter: f64, center: f64) -> CompressionZone {
    let gross = CompressionZone::rectangle(bf, 0.0, a);
    if num_voids == 0 || diameter <= 0.0 {
        return gross;
    }

    let void = void_cap(a, diameter / 2.0, center);
    let n = f64::from(num_voids);
    let net_area = gross.area_in2 - n * void.area_in2;

    if net_area <= 0.0 {
        log::warn!(
            "hollow-core compression zone has no net area at a = {:.3} in; using gross centroid",
            a
        );
        return CompressionZone {
            area_in2: 0.0,
            centroid_in: gross.centroid_in,
        };
    }

    let net_moment = gross.area_in2 * gross.centroid_in - n * void.area_in2 * void.centroid_in;
    CompressionZone {
        area_in2: net_area,
        centroid_in: net_moment / net_area,
    }
}

/// Part of one circular void lying above depth `a`.
///
/// Zero above the void, the full circle once `a` reaches its bottom, and a
/// circular segment (cap) in between.
fn void_cap(a: f64, r: f64, center: f64) -> CompressionZone {
    let top = center - r;
    let bottom = center + r;

    if a <= top {
        return CompressionZone {
            area_in2: 0.0,
            centroid_in: top,
        };
    }
    if a >= bottom {
        return CompressionZone {
            area_in2: PI * r * r,
            centroid_in: center,
        };
    }

    let cap_height = a - top;
    let theta = 2.0 * ((r - cap_height) / r).clamp(-1.0, 1.0).acos();
    let sweep = theta - theta.sin();
    let area = r * r / 2.0 * sweep;
    // Distance from the circle center up to the segment centroid
    let y_bar = if sweep > 0.0 {
        4.0 * r * (theta / 2.0).sin().powi(3) / (3.0 * sweep)
    } else {
        r
    };

    CompressionZone {
        area_in2: area,
        centroid_in: center - y_bar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rect() -> Section {
        Section::new(6.0, SectionGeometry::Rectangular { bw_in: 12.0, h_in: 24.0 })
    }

    fn tbeam() -> Section {
        Section::new(
            5.0,
            SectionGeometry::TBeam { bf_in: 48.0, bw_in: 12.0, hf_in: 4.0, h_in: 30.0 },
        )
    }

    #[test]
    fn test_rectangular_block() {
        let s = rect();
        // Cc = 0.85 × 6 × 12 × 3 = 183.6 kips
        assert_abs_diff_eq!(concrete_compression(6.0, 3.0, &s), 183.6, epsilon = 1e-9);
        assert_abs_diff_eq!(compression_centroid(3.0, &s), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_tbeam_within_flange() {
        let s = tbeam();
        let z = compression_zone(4.0, &s.geometry);
        assert_abs_diff_eq!(z.area_in2, 192.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.centroid_in, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tbeam_into_web() {
        let s = tbeam();
        let z = compression_zone(6.0, &s.geometry);
        // flange 48×4 = 192 at 2.0, web 12×2 = 24 at 5.0
        assert_abs_diff_eq!(z.area_in2, 216.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.centroid_in, (192.0 * 2.0 + 24.0 * 5.0) / 216.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tbeam_reduces_to_rectangle() {
        let r = rect();
        let t = Section::new(6.0, SectionGeometry::TBeam { bf_in: 12.0, bw_in: 12.0, hf_in: 24.0, h_in: 24.0 });
        for &a in &[0.0, 0.5, 3.3, 12.0, 24.0] {
            assert_eq!(concrete_compression(6.0, a, &r), concrete_compression(6.0, a, &t));
            assert_eq!(compression_centroid(a, &r), compression_centroid(a, &t));
        }
    }

    #[test]
    fn test_sandwich_zones() {
        let g = SectionGeometry::Sandwich {
            bt_in: 12.0,
            ht_in: 3.0,
            hg_in: 2.0,
            bb_in: 10.0,
            hb_in: 4.0,
        };
        let top = compression_zone(2.0, &g);
        assert_abs_diff_eq!(top.area_in2, 24.0, epsilon = 1e-12);

        // Inside the gap the area is frozen
        let gap_a = compression_zone(3.0, &g);
        let gap_b = compression_zone(4.9, &g);
        assert_abs_diff_eq!(gap_a.area_in2, 36.0, epsilon = 1e-12);
        assert_eq!(gap_a, gap_b);

        let past = compression_zone(6.0, &g);
        // top 36 at 1.5, bottom 10×1 at 5.5
        assert_abs_diff_eq!(past.area_in2, 46.0, epsilon = 1e-12);
        assert_abs_diff_eq!(past.centroid_in, (36.0 * 1.5 + 10.0 * 5.5) / 46.0, epsilon = 1e-12);
    }

    #[test]
    fn test_doubletee_adds_stems() {
        let g = SectionGeometry::DoubleTee {
            bf_in: 96.0,
            hf_in: 2.0,
            num_stems: 2,
            stem_width_in: 5.0,
            h_in: 24.0,
        };
        assert_abs_diff_eq!(compression_zone(1.5, &g).area_in2, 144.0, epsilon = 1e-12);
        let z = compression_zone(3.0, &g);
        assert_abs_diff_eq!(z.area_in2, 192.0 + 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.centroid_in, (192.0 * 1.0 + 10.0 * 2.5) / 202.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hollowcore_above_voids_is_solid() {
        let g = SectionGeometry::HollowCore {
            bf_in: 48.0,
            h_in: 8.0,
            num_voids: 6,
            void_diameter_in: 5.0,
            void_center_depth_in: 4.0,
        };
        let z = compression_zone(1.5, &g);
        assert_abs_diff_eq!(z.area_in2, 72.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.centroid_in, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_hollowcore_half_void() {
        let g = SectionGeometry::HollowCore {
            bf_in: 48.0,
            h_in: 8.0,
            num_voids: 1,
            void_diameter_in: 4.0,
            void_center_depth_in: 4.0,
        };
        // a at the void center removes exactly a half circle
        let z = compression_zone(4.0, &g);
        let half = PI * 4.0 / 2.0;
        assert_abs_diff_eq!(z.area_in2, 192.0 - half, epsilon = 1e-9);
        // half-disk centroid sits 4r/(3π) above the center
        let half_centroid = 4.0 - 4.0 * 2.0 / (3.0 * PI);
        let expected = (192.0 * 2.0 - half * half_centroid) / (192.0 - half);
        assert_abs_diff_eq!(z.centroid_in, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_hollowcore_full_void() {
        let g = SectionGeometry::HollowCore {
            bf_in: 48.0,
            h_in: 8.0,
            num_voids: 2,
            void_diameter_in: 4.0,
            void_center_depth_in: 4.0,
        };
        let z = compression_zone(7.0, &g);
        assert_abs_diff_eq!(z.area_in2, 48.0 * 7.0 - 2.0 * PI * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_void_cap_is_continuous() {
        let r = 2.0;
        let c = 4.0;
        let below_top = void_cap(2.0 + 1e-9, r, c);
        assert!(below_top.area_in2 < 1e-9);
        let near_bottom = void_cap(6.0 - 1e-9, r, c);
        assert_abs_diff_eq!(near_bottom.area_in2, PI * r * r, epsilon = 1e-6);
        assert_abs_diff_eq!(near_bottom.centroid_in, c, epsilon = 1e-4);
    }

    #[test]
    fn test_hollowcore_degenerate_falls_back_to_gross_centroid() {
        // Overlapping voids remove more than the gross strip
        let g = SectionGeometry::HollowCore {
            bf_in: 4.0,
            h_in: 8.0,
            num_voids: 5,
            void_diameter_in: 6.0,
            void_center_depth_in: 4.0,
        };
        let z = compression_zone(7.0, &g);
        assert_eq!(z.area_in2, 0.0);
        assert_abs_diff_eq!(z.centroid_in, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_monotone_area() {
        let g = SectionGeometry::HollowCore {
            bf_in: 48.0,
            h_in: 8.0,
            num_voids: 6,
            void_diameter_in: 5.5,
            void_center_depth_in: 4.0,
        };
        let mut prev = 0.0;
        for i in 0..=80 {
            let a = i as f64 * 0.1;
            let area = compression_zone(a, &g).area_in2;
            assert!(area >= prev - 1e-9);
            prev = area;
        }
    }
}
