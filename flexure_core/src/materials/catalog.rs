//! Steel Catalog
//!
//! Ordered list of named steel presets. The engine treats the catalog as
//! read-only input data: it never computes entries, it only looks them up.
//!
//! A built-in catalog covering common ASTM reinforcing bars and prestressing
//! strand is available process-wide through [`SteelCatalog::builtin`]. Project
//! specific catalogs load from JSON with [`SteelCatalog::from_json`], which
//! validates every entry once so per-call stress evaluation needs no checks.
//!
//! ## JSON Format
//!
//! ```json
//! [
//!   {
//!     "id": "strand270",
//!     "name": "ASTM A416 Grade 270 low-relaxation strand",
//!     "category": "prestressing",
//!     "es_ksi": 28800.0,
//!     "fpu_ksi": 270.0,
//!     "fpy_ksi": 243.0,
//!     "stress_cap_ksi": 270.0,
//!     "q": 0.031,
//!     "r": 7.36,
//!     "k": 1.043,
//!     "default_fse_ksi": 170.0
//!   }
//! ]
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::steel::{SteelCategory, SteelType};
use crate::errors::{CalcError, CalcResult};

pub const GRADE_40_ID: &str = "grade40";
pub const GRADE_60_ID: &str = "grade60";
pub const GRADE_75_ID: &str = "grade75";
pub const GRADE_80_ID: &str = "grade80";
pub const STRAND_250_ID: &str = "strand250";
pub const STRAND_270_ID: &str = "strand270";
pub const BAR_150_ID: &str = "bar150";

/// Power formula parameters shared by the deformed bar presets
const MILD_R: f64 = 100.0;
const MILD_K: f64 = 1.096;

static BUILTIN: Lazy<SteelCatalog> = Lazy::new(|| SteelCatalog {
    types: vec![
        mild_bar(GRADE_40_ID, "ASTM A615 Grade 40 bar", 40.0, 60.0),
        mild_bar(GRADE_60_ID, "ASTM A615 Grade 60 bar", 60.0, 90.0),
        mild_bar(GRADE_75_ID, "ASTM A615 Grade 75 bar", 75.0, 100.0),
        mild_bar(GRADE_80_ID, "ASTM A615 Grade 80 bar", 80.0, 105.0),
        SteelType {
            id: STRAND_250_ID.to_string(),
            name: "ASTM A416 Grade 250 low-relaxation strand".to_string(),
            category: SteelCategory::Prestressing,
            es_ksi: 28800.0,
            fpu_ksi: 250.0,
            fpy_ksi: 225.0,
            stress_cap_ksi: 250.0,
            q: 0.030,
            r: 6.06,
            k: 1.040,
            default_fse_ksi: 155.0,
        },
        SteelType {
            id: STRAND_270_ID.to_string(),
            name: "ASTM A416 Grade 270 low-relaxation strand".to_string(),
            category: SteelCategory::Prestressing,
            es_ksi: 28800.0,
            fpu_ksi: 270.0,
            fpy_ksi: 243.0,
            stress_cap_ksi: 270.0,
            q: 0.031,
            r: 7.36,
            k: 1.043,
            default_fse_ksi: 170.0,
        },
        SteelType {
            id: BAR_150_ID.to_string(),
            name: "ASTM A722 Grade 150 threaded bar".to_string(),
            category: SteelCategory::Prestressing,
            es_ksi: 29700.0,
            fpu_ksi: 150.0,
            fpy_ksi: 120.0,
            stress_cap_ksi: 150.0,
            q: 0.020,
            r: 5.0,
            k: 1.010,
            default_fse_ksi: 90.0,
        },
    ],
});

fn mild_bar(id: &str, name: &str, fy_ksi: f64, fu_ksi: f64) -> SteelType {
    SteelType {
        id: id.to_string(),
        name: name.to_string(),
        category: SteelCategory::Mild,
        es_ksi: 29000.0,
        fpu_ksi: fu_ksi,
        fpy_ksi: fy_ksi,
        stress_cap_ksi: fy_ksi,
        q: 0.0,
        r: MILD_R,
        k: MILD_K,
        default_fse_ksi: 0.0,
    }
}

/// Ordered, validated collection of steel types.
///
/// Serializes as a plain JSON array. Deserialization goes through
/// [`SteelCatalog::new`], so every entry is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SteelType>", into = "Vec<SteelType>")]
pub struct SteelCatalog {
    types: Vec<SteelType>,
}

impl TryFrom<Vec<SteelType>> for SteelCatalog {
    type Error = CalcError;

    fn try_from(types: Vec<SteelType>) -> CalcResult<Self> {
        SteelCatalog::new(types)
    }
}

impl From<SteelCatalog> for Vec<SteelType> {
    fn from(catalog: SteelCatalog) -> Self {
        catalog.types
    }
}

impl SteelCatalog {
    /// Built-in presets, shared by the whole process.
    pub fn builtin() -> &'static SteelCatalog {
        &BUILTIN
    }

    /// Build a catalog from entries, validating each one.
    ///
    /// Ids must be unique; order is preserved.
    pub fn new(types: Vec<SteelType>) -> CalcResult<Self> {
        for (i, steel) in types.iter().enumerate() {
            steel.validate()?;
            if types[..i].iter().any(|other| other.id == steel.id) {
                return Err(CalcError::invalid_input(
                    "id",
                    steel.id.clone(),
                    "Duplicate steel id in catalog",
                ));
            }
        }
        Ok(SteelCatalog { types })
    }

    /// Parse and validate a catalog from a JSON array of steel types.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let types: Vec<SteelType> = serde_json::from_str(json).map_err(CalcError::serialization)?;
        Self::new(types)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(CalcError::serialization)
    }

    /// Look up a steel type by id (case-insensitive).
    pub fn get(&self, id: &str) -> CalcResult<&SteelType> {
        self.types
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CalcError::material_not_found(id))
    }

    /// Iterate in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &SteelType> {
        self.types.iter()
    }

    /// Entries of one category, in catalog order
    pub fn by_category(&self, category: SteelCategory) -> impl Iterator<Item = &SteelType> {
        self.types.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries_are_valid() {
        let catalog = SteelCatalog::builtin();
        assert_eq!(catalog.len(), 7);
        for steel in catalog.iter() {
            steel.validate().unwrap();
        }
    }

    #[test]
    fn test_builtin_roundtrips_through_new() {
        let rebuilt = SteelCatalog::new(SteelCatalog::builtin().iter().cloned().collect()).unwrap();
        assert_eq!(&rebuilt, SteelCatalog::builtin());
    }

    #[test]
    fn test_lookup() {
        let catalog = SteelCatalog::builtin();
        let g60 = catalog.get(GRADE_60_ID).unwrap();
        assert_eq!(g60.fpy_ksi, 60.0);
        assert_eq!(g60.stress_cap_ksi, 60.0);
        assert_eq!(g60.category, SteelCategory::Mild);

        let strand = catalog.get("STRAND270").unwrap();
        assert_eq!(strand.stress_cap_ksi, 270.0);
        assert!(strand.is_prestressing());

        let err = catalog.get("grade999").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_by_category() {
        let catalog = SteelCatalog::builtin();
        assert_eq!(catalog.by_category(SteelCategory::Mild).count(), 4);
        assert_eq!(catalog.by_category(SteelCategory::Prestressing).count(), 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let json = SteelCatalog::builtin().to_json().unwrap();
        assert!(json.contains("\"category\": \"prestressing\""));
        let parsed = SteelCatalog::from_json(&json).unwrap();
        assert_eq!(&parsed, SteelCatalog::builtin());
    }

    #[test]
    fn test_from_json_rejects_bad_entries() {
        let bad_r = r#"[{"id":"x","name":"X","category":"mild","es_ksi":29000,"fpu_ksi":90,
            "fpy_ksi":60,"stress_cap_ksi":60,"q":0,"r":-1,"k":1.0}]"#;
        assert!(matches!(
            SteelCatalog::from_json(bad_r),
            Err(CalcError::InvalidInput { .. })
        ));

        let dup = r#"[
            {"id":"x","name":"X","category":"mild","es_ksi":29000,"fpu_ksi":90,"fpy_ksi":60,"stress_cap_ksi":60,"q":0,"r":100,"k":1.0},
            {"id":"x","name":"Y","category":"mild","es_ksi":29000,"fpu_ksi":90,"fpy_ksi":60,"stress_cap_ksi":60,"q":0,"r":100,"k":1.0}
        ]"#;
        assert!(SteelCatalog::from_json(dup).is_err());

        assert!(matches!(
            SteelCatalog::from_json("not json"),
            Err(CalcError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_serde_deserialize_validates_entries() {
        let zero_r = r#"[{"id":"x","name":"X","category":"mild","es_ksi":29000,"fpu_ksi":90,
            "fpy_ksi":60,"stress_cap_ksi":60,"q":0,"r":0,"k":1.0}]"#;
        let err = serde_json::from_str::<SteelCatalog>(zero_r).unwrap_err();
        assert!(err.to_string().contains("R must be positive"), "{}", err);

        let json = serde_json::to_string(SteelCatalog::builtin()).unwrap();
        assert!(json.starts_with('['));
        let parsed: SteelCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, SteelCatalog::builtin());
    }
}
