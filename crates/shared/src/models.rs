use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Identifier of a region: the value of the dataset's identifying property
/// (the county name by default).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        RegionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        RegionId(s.to_string())
    }
}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        LonLat { lon, lat }
    }
}

/// Closed ring of coordinates. The closing point may or may not repeat the first.
pub type Ring = Vec<LonLat>;

/// Polygon: exterior ring followed by holes.
pub type Polygon = Vec<Ring>;

/// Polygon or multipolygon geometry. Anything else decodes to an empty geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub polygons: Vec<Polygon>,
}

impl Geometry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn polygon(rings: Polygon) -> Self {
        Geometry { polygons: vec![rings] }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().flatten().all(|ring| ring.is_empty())
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub code: Option<String>,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

/// Immutable set of regions in render order. Region ids are unique.
#[derive(Debug, Clone, Default)]
pub struct BoundaryDataset {
    regions: Vec<Region>,
}

impl BoundaryDataset {
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        let mut seen = HashSet::new();
        for r in &regions {
            if !seen.insert(r.id.clone()) {
                return Err(Error::DuplicateRegion(r.id.to_string()));
            }
        }
        Ok(BoundaryDataset { regions })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }
}

/// Axis-aligned screen-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Zero-sized box at the origin, used for empty geometry.
    pub const ZERO: Bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Bounding box of `points`, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a ScreenPoint>) -> Option<Bounds> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Encloses no area: zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Camera transform: screen = content * scale + translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Transform {
            translate_x,
            translate_y,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Map a screen point back into untransformed map space.
    pub fn invert(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Descriptive content shown for a region or for the whole map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str) -> Region {
        Region {
            id: RegionId::from(id),
            name: id.to_string(),
            code: None,
            geometry: Geometry::empty(),
            properties: Map::new(),
        }
    }

    #[test]
    fn test_dataset_rejects_duplicate_ids() {
        let err = BoundaryDataset::new(vec![region("A"), region("B"), region("A")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateRegion(id) if id == "A"));
    }

    #[test]
    fn test_dataset_lookup() {
        let ds = BoundaryDataset::new(vec![region("A"), region("B")]).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.contains(&RegionId::from("B")));
        assert!(!ds.contains(&RegionId::from("C")));
    }

    #[test]
    fn test_bounds_from_points() {
        let pts = [ScreenPoint::new(3.0, -1.0), ScreenPoint::new(-2.0, 4.0)];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b, Bounds { min_x: -2.0, min_y: -1.0, max_x: 3.0, max_y: 4.0 });
        assert!((b.width() - 5.0).abs() < 1e-9);
        assert!(Bounds::from_points(&Vec::<ScreenPoint>::new()).is_none());
    }

    #[test]
    fn test_zero_bounds_is_degenerate() {
        assert!(Bounds::ZERO.is_degenerate());
        let line = Bounds { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 0.0 };
        assert!(line.is_degenerate());
        let box_ = Bounds { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 1.0 };
        assert!(!box_.is_degenerate());
    }

    #[test]
    fn test_transform_apply_and_invert() {
        let t = Transform::new(10.0, -20.0, 2.5);
        let p = ScreenPoint::new(4.0, 8.0);
        let back = t.invert(t.apply(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
        assert!(Transform::default().is_identity());
    }

    #[test]
    fn test_content_record_optional_fields() {
        let json = r#"{"id":"taiwan","name":"Taiwan","title":"T","description":"D","highlights":["a"]}"#;
        let rec: ContentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.highlights, vec!["a".to_string()]);
        assert!(rec.population.is_none());
        assert!(rec.specialties.is_none());
    }
}
