//! # Unit Types
//!
//! Thin newtype wrappers for the handful of unit conversions the engine
//! performs. Computation runs on raw `f64` in a single consistent system:
//!
//! - Length: inches (in)
//! - Force: kips (k)
//! - Stress: kips per square inch (ksi)
//! - Moment: kip-inches (k-in), reported also in kip-feet (k-ft)
//!
//! Empirical ACI expressions such as the modulus of rupture are written in
//! psi, so stress converts through [`Psi`] at those boundaries.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::units::{KipFt, KipIn, Ksi, Psi};
//!
//! let mn: KipFt = KipIn(1200.0).into();
//! assert_eq!(mn.0, 100.0);
//!
//! let fc: Psi = Ksi(6.0).into();
//! assert_eq!(fc.0, 6000.0);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

impl From<Psi> for Ksi {
    fn from(psi: Psi) -> Self {
        Ksi(psi.0 / 1000.0)
    }
}

impl From<Ksi> for Psi {
    fn from(ksi: Ksi) -> Self {
        Psi(ksi.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kip-feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipFt(pub f64);

/// Moment in kip-inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipIn(pub f64);

impl From<KipFt> for KipIn {
    fn from(kipft: KipFt) -> Self {
        KipIn(kipft.0 * 12.0)
    }
}

impl From<KipIn> for KipFt {
    fn from(kipin: KipIn) -> Self {
        KipFt(kipin.0 / 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kip_in_to_kip_ft() {
        let m = KipIn(2400.0);
        let ft: KipFt = m.into();
        assert_eq!(ft.0, 200.0);
        let back: KipIn = ft.into();
        assert_eq!(back.0, 2400.0);
    }

    #[test]
    fn test_ksi_psi() {
        let psi: Psi = Ksi(0.58).into();
        assert!((psi.0 - 580.0).abs() < 1e-9);
        let ksi: Ksi = Psi(7500.0).into();
        assert_eq!(ksi.0, 7.5);
    }

    #[test]
    fn test_serialization() {
        let m = KipFt(120.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "120.5");

        let roundtrip: KipFt = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
