//! Region content lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ContentRecord, RegionId};

/// Maps a selection to displayable content. Never fails: `None` and unknown
/// ids both resolve to the whole-map record.
pub trait ContentResolver {
    fn resolve(&self, id: Option<&RegionId>) -> ContentRecord;
}

impl<T: ContentResolver + ?Sized> ContentResolver for Arc<T> {
    fn resolve(&self, id: Option<&RegionId>) -> ContentRecord {
        (**self).resolve(id)
    }
}

/// Static content table: one default record plus one record per region name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTable {
    #[serde(rename = "taiwanContent")]
    default: ContentRecord,
    #[serde(rename = "cityContent", default)]
    regions: BTreeMap<String, ContentRecord>,
}

impl ContentTable {
    pub fn new(default: ContentRecord, regions: BTreeMap<String, ContentRecord>) -> Self {
        ContentTable { default, regions }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::Json {
            what: "content table",
            source,
        })
    }

    pub fn default_record(&self) -> &ContentRecord {
        &self.default
    }

    pub fn get(&self, id: &RegionId) -> Option<&ContentRecord> {
        self.regions.get(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl ContentResolver for ContentTable {
    fn resolve(&self, id: Option<&RegionId>) -> ContentRecord {
        id.and_then(|id| self.get(id))
            .unwrap_or(&self.default)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "taiwanContent": {
            "id": "taiwan", "name": "Taiwan", "title": "Formosa",
            "description": "Whole island", "highlights": ["Mountains"]
        },
        "cityContent": {
            "Taipei City": {
                "id": "taipei", "name": "Taipei City", "title": "Capital",
                "description": "North", "highlights": [], "population": "2.5M",
                "specialties": ["Beef noodles"]
            }
        }
    }"#;

    #[test]
    fn test_resolve_known_region() {
        let table = ContentTable::from_json_str(TABLE).unwrap();
        let rec = table.resolve(Some(&RegionId::from("Taipei City")));
        assert_eq!(rec.id, "taipei");
        assert_eq!(rec.population.as_deref(), Some("2.5M"));
    }

    #[test]
    fn test_resolve_none_and_unknown_fall_back() {
        let table = ContentTable::from_json_str(TABLE).unwrap();
        assert_eq!(table.resolve(None).id, "taiwan");
        assert_eq!(table.resolve(Some(&RegionId::from("Atlantis"))).id, "taiwan");
    }

    #[test]
    fn test_region_table_is_optional() {
        let json = r#"{"taiwanContent": {"id": "t", "name": "T", "title": "T", "description": "D"}}"#;
        let table = ContentTable::from_json_str(json).unwrap();
        assert!(table.is_empty());
        assert!(table.default_record().highlights.is_empty());
    }

    #[test]
    fn test_missing_default_is_error() {
        assert!(matches!(
            ContentTable::from_json_str(r#"{"cityContent": {}}"#),
            Err(Error::Json { what: "content table", .. })
        ));
    }

    #[test]
    fn test_shared_resolver() {
        let table = Arc::new(ContentTable::from_json_str(TABLE).unwrap());
        assert_eq!(table.resolve(None).name, "Taiwan");
    }
}
