//! Geometry projector: geographic boundaries to screen-space shapes.
//!
//! Spherical Mercator with either a fixed scale and center (the center lands in
//! the middle of the viewport) or a fit-to-viewport mode. Output is a pure
//! function of dataset, mode and viewport size, so re-projecting with the same
//! inputs yields bit-identical shapes.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;
use std::fmt::Write;
use std::sync::Arc;

use crate::config::ProjectionMode;
use crate::models::{BoundaryDataset, Bounds, LonLat, Region, RegionId, ScreenPoint};

/// Mercator is undefined at the poles; clamp like web maps do.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Minimum distinct vertices for a ring to enclose any area.
const MIN_RING_POINTS: usize = 3;

/// Rings enclosing less than this (in square pixels) are collinear noise.
const MIN_RING_AREA: f64 = 1e-9;

pub type ScreenRing = Vec<ScreenPoint>;

/// Unscaled Mercator coordinates in radians, y pointing north.
fn mercator_raw(p: LonLat) -> (f64, f64) {
    let lambda = p.lon.to_radians();
    let phi = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    center_raw: (f64, f64),
    translate: (f64, f64),
}

impl Mercator {
    /// `center` projects to `translate`; one radian of longitude spans `scale` pixels.
    pub fn new(scale: f64, center: LonLat, translate: (f64, f64)) -> Self {
        Mercator {
            scale,
            center_raw: mercator_raw(center),
            translate,
        }
    }

    /// Scale and center the projection so `dataset` exactly fills `width` x `height`.
    pub fn fit_size(dataset: &BoundaryDataset, width: f64, height: f64) -> Self {
        let raw: Vec<ScreenPoint> = dataset
            .regions()
            .iter()
            .flat_map(|r| r.geometry.rings())
            .flatten()
            .map(|&p| {
                let (x, y) = mercator_raw(p);
                ScreenPoint::new(x, -y)
            })
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        let translate = (width / 2.0, height / 2.0);

        let Some(b) = Bounds::from_points(&raw) else {
            return Mercator {
                scale: 1.0,
                center_raw: (0.0, 0.0),
                translate,
            };
        };

        let kx = if b.width() > 0.0 { width / b.width() } else { f64::INFINITY };
        let ky = if b.height() > 0.0 { height / b.height() } else { f64::INFINITY };
        let k = kx.min(ky);
        let scale = if k.is_finite() && k > 0.0 { k } else { 1.0 };
        let c = b.center();

        Mercator {
            scale,
            center_raw: (c.x, -c.y),
            translate,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn project(&self, p: LonLat) -> ScreenPoint {
        let (x, y) = mercator_raw(p);
        ScreenPoint::new(
            self.translate.0 + self.scale * (x - self.center_raw.0),
            self.translate.1 - self.scale * (y - self.center_raw.1),
        )
    }
}

/// One region in screen space: polygons of rings, bounds, and an SVG path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRegion {
    pub id: RegionId,
    pub name: String,
    pub polygons: Vec<Vec<ScreenRing>>,
    pub bounds: Bounds,
    pub path: String,
}

impl ProjectedRegion {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Screen-space bounding box; zero-sized for empty shapes.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Enclosed area: exterior rings minus holes.
    pub fn area(&self) -> f64 {
        self.polygons
            .iter()
            .map(|rings| {
                rings
                    .iter()
                    .enumerate()
                    .map(|(i, ring)| {
                        let a = ring_area(ring).abs();
                        if i == 0 { a } else { -a }
                    })
                    .sum::<f64>()
                    .max(0.0)
            })
            .sum()
    }

    /// Even-odd containment test in untransformed map space.
    pub fn contains(&self, p: ScreenPoint) -> bool {
        if self.is_empty() || !self.bounds.contains(p) {
            return false;
        }
        self.polygons.iter().any(|rings| {
            rings
                .iter()
                .filter(|ring| ring_contains(ring, p))
                .count()
                % 2
                == 1
        })
    }
}

fn ring_area(ring: &[ScreenPoint]) -> f64 {
    let n = ring.len();
    if n < MIN_RING_POINTS {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn ring_contains(ring: &[ScreenPoint], p: ScreenPoint) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Project one ring, dropping the duplicated closing point. Returns `None`
/// when fewer than three distinct finite points remain or the ring encloses
/// no area.
fn project_ring(ring: &[LonLat], proj: &Mercator) -> Option<ScreenRing> {
    let mut out: ScreenRing = Vec::with_capacity(ring.len());
    for &p in ring {
        let sp = proj.project(p);
        if !(sp.x.is_finite() && sp.y.is_finite()) {
            return None;
        }
        if out.last() != Some(&sp) {
            out.push(sp);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    (out.len() >= MIN_RING_POINTS && ring_area(&out).abs() > MIN_RING_AREA).then_some(out)
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn fmt_coord(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn svg_path(polygons: &[Vec<ScreenRing>]) -> String {
    let mut d = String::new();
    for ring in polygons.iter().flatten() {
        for (i, p) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", fmt_coord(p.x), fmt_coord(p.y));
        }
        d.push('Z');
    }
    d
}

pub fn project_region(region: &Region, proj: &Mercator) -> ProjectedRegion {
    let mut dropped = 0usize;
    let polygons: Vec<Vec<ScreenRing>> = region
        .geometry
        .polygons
        .iter()
        .filter_map(|rings| {
            let mut iter = rings.iter();
            // A polygon without a usable exterior ring contributes nothing.
            let Some(exterior) = iter.next().and_then(|r| project_ring(r, proj)) else {
                dropped += rings.len();
                return None;
            };
            let mut out = vec![exterior];
            for hole in iter {
                match project_ring(hole, proj) {
                    Some(h) => out.push(h),
                    None => dropped += 1,
                }
            }
            Some(out)
        })
        .collect();

    if dropped > 0 {
        tracing::warn!(region = %region.id, dropped, "Dropped degenerate rings");
    }

    let bounds = Bounds::from_points(polygons.iter().flatten().flatten()).unwrap_or(Bounds::ZERO);
    let path = svg_path(&polygons);

    ProjectedRegion {
        id: region.id.clone(),
        name: region.name.clone(),
        polygons,
        bounds,
        path,
    }
}

/// All projected regions for one viewport, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMap {
    regions: Vec<ProjectedRegion>,
    index: HashMap<RegionId, usize>,
    width: f64,
    height: f64,
}

impl ProjectedMap {
    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&ProjectedRegion> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    pub fn bounds_of(&self, id: &RegionId) -> Option<Bounds> {
        self.get(id).map(ProjectedRegion::bounds)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Project every region of `dataset` into a `width` x `height` viewport.
pub fn project(dataset: &BoundaryDataset, mode: ProjectionMode, width: f64, height: f64) -> ProjectedMap {
    let proj = match mode {
        ProjectionMode::Fixed { scale, center } => {
            Mercator::new(scale, LonLat::new(center[0], center[1]), (width / 2.0, height / 2.0))
        }
        ProjectionMode::FitSize => Mercator::fit_size(dataset, width, height),
    };

    let regions: Vec<ProjectedRegion> = dataset
        .regions()
        .iter()
        .map(|r| project_region(r, &proj))
        .collect();
    let index = regions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();

    ProjectedMap {
        regions,
        index,
        width,
        height,
    }
}

/// Owns the read-only dataset and re-projects it whenever the viewport changes.
#[derive(Debug, Clone)]
pub struct GeometryProjector {
    dataset: Arc<BoundaryDataset>,
    mode: ProjectionMode,
}

impl GeometryProjector {
    pub fn new(dataset: Arc<BoundaryDataset>, mode: ProjectionMode) -> Self {
        GeometryProjector { dataset, mode }
    }

    pub fn dataset(&self) -> &BoundaryDataset {
        &self.dataset
    }

    pub fn project(&self, width: f64, height: f64) -> ProjectedMap {
        project(&self.dataset, self.mode, width, height)
    }
}
