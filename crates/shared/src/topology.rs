//! TopoJSON decoding.
//!
//! Turns one named object of a `Topology` into a [`BoundaryDataset`]. Arcs are
//! decoded once (delta + quantization transform), then stitched into rings.
//! Only `Polygon` and `MultiPolygon` carry geometry; every other geometry type
//! becomes an empty region so the projector can treat it as degenerate.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{BoundaryDataset, Geometry, LonLat, Polygon, Region, RegionId, Ring};

/// Which object to read and which properties identify a region.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyOptions {
    pub object: String,
    pub id_property: String,
    pub name_property: String,
    pub code_property: String,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        TopologyOptions {
            object: "main".to_string(),
            id_property: "COUNTYNAME".to_string(),
            name_property: "COUNTYNAME".to_string(),
            code_property: "COUNTYID".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Quantization>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: Map<String, Value>,
}

#[derive(Deserialize, Clone, Copy)]
struct Quantization {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: Value,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
}

/// Parse TopoJSON text and extract the regions of `opts.object`.
pub fn decode_topology(json: &str, opts: &TopologyOptions) -> Result<BoundaryDataset> {
    let topo: Topology = serde_json::from_str(json).map_err(|source| Error::Json {
        what: "topology",
        source,
    })?;
    if topo.kind != "Topology" {
        return Err(Error::NotATopology(topo.kind));
    }

    let object = topo
        .objects
        .get(&opts.object)
        .cloned()
        .ok_or_else(|| Error::MissingObject(opts.object.clone()))?;
    let object: TopoGeometry = serde_json::from_value(object).map_err(|source| Error::Json {
        what: "topology object",
        source,
    })?;

    let arcs = decode_arcs(&topo.arcs, topo.transform);

    let mut leaves = Vec::new();
    flatten(object, &mut leaves);

    let mut regions = Vec::with_capacity(leaves.len());
    for (index, geom) in leaves.into_iter().enumerate() {
        regions.push(build_region(index, geom, &arcs, opts)?);
    }

    tracing::debug!(
        object = %opts.object,
        regions = regions.len(),
        arcs = arcs.len(),
        "Decoded topology"
    );
    BoundaryDataset::new(regions)
}

/// Delta-decode and dequantize every arc into absolute coordinates.
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Quantization>) -> Vec<Vec<LonLat>> {
    raw.iter()
        .map(|arc| match transform {
            Some(q) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        LonLat::new(
                            x * q.scale[0] + q.translate[0],
                            y * q.scale[1] + q.translate[1],
                        )
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| LonLat::new(p[0], p[1]))
                .collect(),
        })
        .collect()
}

fn flatten(geom: TopoGeometry, out: &mut Vec<TopoGeometry>) {
    if geom.kind.as_deref() == Some("GeometryCollection") {
        for child in geom.geometries {
            flatten(child, out);
        }
    } else {
        out.push(geom);
    }
}

fn build_region(
    index: usize,
    geom: TopoGeometry,
    arcs: &[Vec<LonLat>],
    opts: &TopologyOptions,
) -> Result<Region> {
    let id = property_string(&geom.properties, &opts.id_property).ok_or_else(|| {
        Error::MissingProperty {
            index,
            property: opts.id_property.clone(),
        }
    })?;
    let name = property_string(&geom.properties, &opts.name_property).unwrap_or_else(|| id.clone());
    let code = property_string(&geom.properties, &opts.code_property);

    let geometry = match geom.kind.as_deref() {
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> = serde_json::from_value(geom.arcs).unwrap_or_default();
            Geometry::polygon(stitch_polygon(&rings, arcs)?)
        }
        Some("MultiPolygon") => {
            let polys: Vec<Vec<Vec<i64>>> = serde_json::from_value(geom.arcs).unwrap_or_default();
            let polygons = polys
                .iter()
                .map(|rings| stitch_polygon(rings, arcs))
                .collect::<Result<Vec<Polygon>>>()?;
            Geometry { polygons }
        }
        _ => Geometry::empty(),
    };

    Ok(Region {
        id: RegionId::new(id),
        name,
        code,
        geometry,
        properties: geom.properties,
    })
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<LonLat>]) -> Result<Polygon> {
    rings.iter().map(|ring| stitch_ring(ring, arcs)).collect()
}

/// Concatenate arcs into one ring. `!i` (i.e. `-i - 1`) walks arc `i` backwards.
/// Consecutive arcs share an endpoint, which is kept only once.
fn stitch_ring(indices: &[i64], arcs: &[Vec<LonLat>]) -> Result<Ring> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let (arc_idx, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_idx)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(Error::ArcOutOfRange {
                index,
                arcs: arcs.len(),
            })?;

        if !ring.is_empty() {
            ring.pop();
        }
        if reversed {
            ring.extend(arc.iter().rev().copied());
        } else {
            ring.extend(arc.iter().copied());
        }
    }
    Ok(ring)
}

fn property_string(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
