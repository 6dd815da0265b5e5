//! Selection & camera state machine.
//!
//! [`MapController`] is the single owner of the selection, the zoom state and
//! the current content. Views read it and call its operations; they never
//! write fields directly.
//!
//! States:
//! - Overview: nothing selected, not zoomed in, identity transform at rest.
//! - Focused(id): a region is selected and framed.
//! - Free view: nothing selected but the camera was moved by a gesture.

use std::sync::Arc;

use crate::animation::{Animator, Easing};
use crate::camera;
use crate::config::{CameraSettings, MapConfig, ViewportSizing};
use crate::content::ContentResolver;
use crate::models::{BoundaryDataset, ContentRecord, RegionId, ScreenPoint, Transform};
use crate::projection::{GeometryProjector, ProjectedMap};
use crate::render::{self, MapEvent, RegionShape};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoSelection,
    Selected(RegionId),
}

impl SelectionState {
    pub fn selected(&self) -> Option<&RegionId> {
        match self {
            SelectionState::NoSelection => None,
            SelectionState::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self, id: &RegionId) -> bool {
        self.selected() == Some(id)
    }
}

/// `transform` is what is currently displayed, including mid-animation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomState {
    pub is_zoomed_in: bool,
    pub transform: Transform,
}

/// Outcome of a state operation, so the caller knows whether to run frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Focused(RegionId),
    Reset,
    Unchanged,
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

pub struct MapController<R> {
    projector: GeometryProjector,
    map: ProjectedMap,
    sizing: ViewportSizing,
    viewport: (f64, f64),
    selection: SelectionState,
    zoom: ZoomState,
    animator: Animator,
    settings: CameraSettings,
    resolver: R,
    content: ContentRecord,
}

impl<R: ContentResolver> MapController<R> {
    /// Project `dataset` for the initial window size and start in Overview.
    pub fn new(
        dataset: Arc<BoundaryDataset>,
        resolver: R,
        config: &MapConfig,
        window_width: f64,
        window_height: f64,
    ) -> Self {
        let projector = GeometryProjector::new(dataset, config.projection);
        let viewport = config.viewport.resolve(window_width, window_height);
        let map = projector.project(viewport.0, viewport.1);
        let content = resolver.resolve(None);

        MapController {
            projector,
            map,
            sizing: config.viewport,
            viewport,
            selection: SelectionState::NoSelection,
            zoom: ZoomState::default(),
            animator: Animator::new(),
            settings: config.camera,
            resolver,
            content,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected(&self) -> Option<&RegionId> {
        self.selection.selected()
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn transform(&self) -> Transform {
        self.zoom.transform
    }

    pub fn is_zoomed_in(&self) -> bool {
        self.zoom.is_zoomed_in
    }

    pub fn content(&self) -> &ContentRecord {
        &self.content
    }

    pub fn map(&self) -> &ProjectedMap {
        &self.map
    }

    pub fn dataset(&self) -> &BoundaryDataset {
        self.projector.dataset()
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Viewport this controller would use for the given window size.
    pub fn viewport_for_window(&self, window_width: f64, window_height: f64) -> (f64, f64) {
        self.sizing.resolve(window_width, window_height)
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn animation_generation(&self) -> u64 {
        self.animator.generation()
    }

    /// Shapes for the current selection plus the view's hover.
    pub fn render(&self, hovered: Option<&RegionId>) -> Vec<RegionShape> {
        render::render_regions(&self.map, &self.selection, hovered)
    }

    /// Region under a screen point in viewBox units.
    pub fn hit_test(&self, point: ScreenPoint) -> Option<RegionId> {
        render::hit_test(&self.map, self.zoom.transform, point)
    }

    /// Select and frame `id`. Re-selecting the focused region and unknown ids
    /// are no-ops.
    pub fn select_region(&mut self, id: &RegionId, now_ms: f64) -> Transition {
        if self.selection.is_selected(id) {
            return Transition::Unchanged;
        }
        let Some(region) = self.map.get(id) else {
            tracing::warn!(region = %id, "Ignoring selection of unknown region");
            return Transition::Unchanged;
        };

        let from = self.zoom.transform;
        if region.is_empty() {
            // Nothing to frame: keep the camera where it is
            self.animator.cancel();
        } else {
            let (w, h) = self.viewport;
            let target = camera::frame_region(region.bounds(), w, h);
            self.animator
                .animate(from, target, self.settings.transition_ms, Easing::CubicInOut, now_ms);
        }

        self.selection = SelectionState::Selected(id.clone());
        self.zoom.is_zoomed_in = true;
        self.content = self.resolver.resolve(Some(id));
        tracing::debug!(region = %id, "Region focused");
        Transition::Focused(id.clone())
    }

    /// Clear the selection and animate back to the identity transform.
    /// No-op in Overview.
    pub fn reset_selection(&mut self, now_ms: f64) -> Transition {
        if !self.zoom.is_zoomed_in && self.selection == SelectionState::NoSelection {
            return Transition::Unchanged;
        }

        let had_selection = self.selection != SelectionState::NoSelection;
        self.selection = SelectionState::NoSelection;
        self.zoom.is_zoomed_in = false;
        if had_selection {
            self.content = self.resolver.resolve(None);
        }

        let target = camera::reset_transform();
        if self.zoom.transform == target {
            self.animator.cancel();
        } else {
            self.animator.animate(
                self.zoom.transform,
                target,
                self.settings.transition_ms,
                Easing::CubicInOut,
                now_ms,
            );
        }
        tracing::debug!(had_selection, "Selection reset");
        Transition::Reset
    }

    /// Background clicks only reset when there is something to reset.
    pub fn background_click(&mut self, now_ms: f64) -> Transition {
        if self.zoom.is_zoomed_in {
            self.reset_selection(now_ms)
        } else {
            Transition::Unchanged
        }
    }

    /// Dispatch a rendered-map event. Hover is view state and changes nothing
    /// here. A double-click on the background resets; on a region it keeps the
    /// focus its first click set.
    pub fn handle_event(&mut self, event: &MapEvent, now_ms: f64) -> Transition {
        match event {
            MapEvent::Click(id) => self.select_region(id, now_ms),
            MapEvent::BackgroundClick => self.background_click(now_ms),
            MapEvent::DoubleClick(None) => self.reset_selection(now_ms),
            // The click that preceded it already focused the region
            MapEvent::DoubleClick(Some(_)) => Transition::Unchanged,
            MapEvent::HoverEnter(_) | MapEvent::HoverLeave(_) => Transition::Unchanged,
        }
    }

    /// Advance the running animation to `now_ms`. Returns `true` while more
    /// frames are needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let zoom = &mut self.zoom;
        self.animator.frame(now_ms, |t| zoom.transform = t)
    }

    /// Drag by a delta in viewBox units. Tracks 1:1 and cancels any animation.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let next = camera::pan(self.zoom.transform, dx, dy);
        self.apply_gesture(next);
    }

    /// Wheel zoom: multiply scale by `factor` around `anchor`.
    pub fn zoom_by(&mut self, anchor: ScreenPoint, factor: f64) {
        let next = camera::zoom_by(self.zoom.transform, anchor, factor);
        self.apply_gesture(next);
    }

    /// Pinch zoom: set an absolute scale around `anchor`.
    pub fn zoom_to(&mut self, anchor: ScreenPoint, scale: f64) {
        let next = camera::zoom_at(self.zoom.transform, anchor, scale);
        self.apply_gesture(next);
    }

    fn apply_gesture(&mut self, next: Transform) {
        self.animator.cancel();
        let next = if self.settings.constrain_pan {
            camera::constrain_pan(next, self.viewport.0, self.viewport.1)
        } else {
            next
        };
        self.zoom.transform = next;
        self.zoom.is_zoomed_in =
            self.selection != SelectionState::NoSelection || !next.is_identity();
    }

    /// React to a window resize. Only window-sized viewports re-project; a
    /// focused region is re-framed immediately. Returns `true` if anything
    /// changed.
    pub fn set_window_size(&mut self, window_width: f64, window_height: f64) -> bool {
        let viewport = self.viewport_for_window(window_width, window_height);
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.map = self.projector.project(viewport.0, viewport.1);

        if let Some(id) = self.selection.selected() {
            self.animator.cancel();
            if let Some(region) = self.map.get(id).filter(|r| !r.is_empty()) {
                self.zoom.transform = camera::frame_region(region.bounds(), viewport.0, viewport.1);
            }
        }
        tracing::debug!(width = viewport.0, height = viewport.1, "Viewport resized");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MAX_SCALE, MIN_SCALE};
    use crate::config::ProjectionMode;
    use crate::content::ContentTable;
    use crate::models::{Geometry, LonLat, Region};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use serde_json::Map;

    /// Wraps a table and records every lookup.
    struct CountingResolver {
        table: ContentTable,
        calls: RefCell<Vec<Option<RegionId>>>,
    }

    impl ContentResolver for CountingResolver {
        fn resolve(&self, id: Option<&RegionId>) -> ContentRecord {
            self.calls.borrow_mut().push(id.cloned());
            self.table.resolve(id)
        }
    }

    fn record(id: &str) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            name: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            highlights: Vec::new(),
            population: None,
            area: None,
            specialties: None,
        }
    }

    const NAMES: [&str; 22] = [
        "Taipei City", "New Taipei City", "Keelung City", "Taoyuan City", "Hsinchu County",
        "Hsinchu City", "Miaoli County", "Taichung City", "Changhua County", "Nantou County",
        "Yunlin County", "Chiayi County", "Chiayi City", "Tainan City", "Kaohsiung City",
        "Pingtung County", "Yilan County", "Hualien County", "Taitung County", "Penghu County",
        "Kinmen County", "Lienchiang County",
    ];

    fn square(id: &str, lon: f64, lat: f64, size: f64) -> Region {
        let ring = vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + size, lat),
            LonLat::new(lon + size, lat + size),
            LonLat::new(lon, lat + size),
            LonLat::new(lon, lat),
        ];
        Region {
            id: RegionId::from(id),
            name: id.to_string(),
            code: None,
            geometry: Geometry::polygon(vec![ring]),
            properties: Map::new(),
        }
    }

    /// 22 small squares on a grid around the projection center, plus content
    /// for Taipei City only.
    fn controller(config: &MapConfig) -> MapController<CountingResolver> {
        let regions = NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let col = (i % 4) as f64;
                let row = (i / 4) as f64;
                square(name, 120.6 + col * 0.2, 22.8 + row * 0.25, 0.08)
            })
            .collect();
        let dataset = Arc::new(BoundaryDataset::new(regions).unwrap());
        let mut cities = BTreeMap::new();
        cities.insert("Taipei City".to_string(), record("taipei"));
        let resolver = CountingResolver {
            table: ContentTable::new(record("taiwan"), cities),
            calls: RefCell::new(Vec::new()),
        };
        MapController::new(dataset, resolver, config, 1024.0, 768.0)
    }

    fn default_controller() -> MapController<CountingResolver> {
        controller(&MapConfig::default())
    }

    fn id(s: &str) -> RegionId {
        RegionId::from(s)
    }

    fn settle(ctl: &mut MapController<CountingResolver>, now_ms: f64) {
        while ctl.tick(now_ms) {}
    }

    fn calls(ctl: &MapController<CountingResolver>) -> Vec<Option<RegionId>> {
        ctl.resolver.calls.borrow().clone()
    }

    #[test]
    fn test_starts_in_overview() {
        let ctl = default_controller();
        assert_eq!(ctl.map().len(), 22);
        assert_eq!(ctl.selection(), &SelectionState::NoSelection);
        assert!(!ctl.is_zoomed_in());
        assert!(ctl.transform().is_identity());
        assert_eq!(ctl.content().id, "taiwan");
        assert_eq!(ctl.viewport(), (450.0, 800.0));
    }

    #[test]
    fn test_taipei_scenario() {
        let mut ctl = default_controller();
        let taipei = id("Taipei City");

        let t = ctl.handle_event(&MapEvent::Click(taipei.clone()), 0.0);
        assert_eq!(t, Transition::Focused(taipei.clone()));
        assert_eq!(ctl.selection(), &SelectionState::Selected(taipei.clone()));
        assert_eq!(ctl.content().id, "taipei");
        settle(&mut ctl, 750.0);
        let scale = ctl.transform().scale;
        assert!(scale > MIN_SCALE && scale <= MAX_SCALE);

        let t = ctl.handle_event(&MapEvent::BackgroundClick, 1000.0);
        assert_eq!(t, Transition::Reset);
        assert_eq!(ctl.selection(), &SelectionState::NoSelection);
        assert_eq!(ctl.content().id, "taiwan");
        settle(&mut ctl, 1750.0);
        assert!(ctl.transform().is_identity());

        // Initial default lookup, Taipei, then the reset
        assert_eq!(calls(&ctl), vec![None, Some(taipei), None]);
    }

    #[test]
    fn test_select_same_region_twice_is_idempotent() {
        let mut ctl = default_controller();
        let a = id("Taichung City");
        ctl.select_region(&a, 0.0);
        let generation = ctl.animation_generation();
        let zoom = ctl.zoom();
        let content = ctl.content().clone();
        let call_count = calls(&ctl).len();

        assert_eq!(ctl.select_region(&a, 10.0), Transition::Unchanged);
        assert_eq!(ctl.animation_generation(), generation);
        assert_eq!(ctl.zoom(), zoom);
        assert_eq!(ctl.content(), &content);
        assert_eq!(calls(&ctl).len(), call_count);
    }

    #[test]
    fn test_select_then_reset_round_trip() {
        let mut ctl = default_controller();
        let before = (ctl.selection().clone(), ctl.zoom());
        ctl.select_region(&id("Tainan City"), 0.0);
        settle(&mut ctl, 800.0);
        ctl.reset_selection(900.0);
        settle(&mut ctl, 2000.0);
        assert_eq!((ctl.selection().clone(), ctl.zoom()), before);
    }

    #[test]
    fn test_mutual_exclusion() {
        let mut ctl = default_controller();
        ctl.select_region(&id("Yilan County"), 0.0);
        ctl.select_region(&id("Hualien County"), 50.0);
        let selected: Vec<RegionId> = ctl
            .render(None)
            .into_iter()
            .filter(|s| s.style == render::RegionStyle::Selected)
            .map(|s| s.id)
            .collect();
        assert_eq!(selected, vec![id("Hualien County")]);
    }

    #[test]
    fn test_rapid_clicks_converge_on_last_target() {
        let mut ctl = default_controller();
        let a = id("Kinmen County");
        let b = id("Pingtung County");
        ctl.select_region(&a, 0.0);
        ctl.tick(200.0);
        let mid_a = ctl.transform();
        ctl.select_region(&b, 200.0);
        // New animation starts from what is displayed
        ctl.tick(200.0);
        assert_eq!(ctl.transform(), mid_a);
        settle(&mut ctl, 950.0);

        let (w, h) = ctl.viewport();
        let expected = camera::frame_region(ctl.map().bounds_of(&b).unwrap(), w, h);
        assert_eq!(ctl.transform(), expected);
        assert!(!ctl.is_animating());
    }

    #[test]
    fn test_background_click_in_overview_is_noop() {
        let mut ctl = default_controller();
        let generation = ctl.animation_generation();
        assert_eq!(ctl.background_click(0.0), Transition::Unchanged);
        assert_eq!(ctl.reset_selection(0.0), Transition::Unchanged);
        assert_eq!(ctl.animation_generation(), generation);
        assert_eq!(calls(&ctl).len(), 1);
    }

    #[test]
    fn test_unknown_region_is_ignored() {
        let mut ctl = default_controller();
        assert_eq!(ctl.select_region(&id("Atlantis"), 0.0), Transition::Unchanged);
        assert_eq!(ctl.selection(), &SelectionState::NoSelection);
        assert!(!ctl.is_zoomed_in());
    }

    #[test]
    fn test_double_click_resets() {
        let mut ctl = default_controller();
        ctl.select_region(&id("Penghu County"), 0.0);
        assert_eq!(ctl.handle_event(&MapEvent::DoubleClick(None), 100.0), Transition::Reset);
        assert!(!ctl.is_zoomed_in());
    }

    #[test]
    fn test_double_click_on_region_keeps_focus() {
        let mut ctl = default_controller();
        let taipei = id("Taipei City");
        // Browsers send click, click, dblclick
        ctl.handle_event(&MapEvent::Click(taipei.clone()), 0.0);
        ctl.handle_event(&MapEvent::Click(taipei.clone()), 150.0);
        let t = ctl.handle_event(&MapEvent::DoubleClick(Some(taipei.clone())), 160.0);
        assert_eq!(t, Transition::Unchanged);
        assert_eq!(ctl.selected(), Some(&taipei));
        assert!(ctl.is_zoomed_in());
        settle(&mut ctl, 1000.0);
        assert!(ctl.transform().scale > 1.0);
    }

    #[test]
    fn test_hover_does_not_touch_selection() {
        let mut ctl = default_controller();
        let t = ctl.handle_event(&MapEvent::HoverEnter(id("Taipei City")), 0.0);
        assert_eq!(t, Transition::Unchanged);
        assert_eq!(ctl.selection(), &SelectionState::NoSelection);
    }

    #[test]
    fn test_free_view_and_reset() {
        let mut ctl = default_controller();
        ctl.zoom_by(ScreenPoint::new(225.0, 400.0), 1.1);
        assert!(ctl.is_zoomed_in());
        assert_eq!(ctl.selection(), &SelectionState::NoSelection);

        // Background click leaves free view without a content lookup
        assert_eq!(ctl.background_click(0.0), Transition::Reset);
        settle(&mut ctl, 1000.0);
        assert!(ctl.transform().is_identity());
        assert!(!ctl.is_zoomed_in());
        assert_eq!(calls(&ctl).len(), 1);
    }

    #[test]
    fn test_gestures_stay_in_scale_bounds() {
        let mut ctl = default_controller();
        let anchor = ScreenPoint::new(100.0, 100.0);
        for _ in 0..100 {
            ctl.zoom_by(anchor, 1.1);
        }
        assert!((ctl.transform().scale - MAX_SCALE).abs() < 1e-9);
        for _ in 0..100 {
            ctl.zoom_by(anchor, 1.0 / 1.1);
        }
        assert!((ctl.transform().scale - MIN_SCALE).abs() < 1e-9);
        ctl.zoom_to(anchor, 50.0);
        assert!((ctl.transform().scale - MAX_SCALE).abs() < 1e-9);
    }

    #[test]
    fn test_pan_back_to_identity_returns_to_overview() {
        let mut ctl = default_controller();
        ctl.pan_by(10.0, 0.0);
        assert!(ctl.is_zoomed_in());
        ctl.pan_by(-10.0, 0.0);
        assert!(!ctl.is_zoomed_in());
    }

    #[test]
    fn test_gesture_cancels_animation() {
        let mut ctl = default_controller();
        ctl.select_region(&id("Nantou County"), 0.0);
        assert!(ctl.is_animating());
        ctl.pan_by(5.0, 5.0);
        assert!(!ctl.is_animating());
        assert!(!ctl.tick(100.0));
        // Still focused
        assert!(ctl.is_zoomed_in());
        assert_eq!(ctl.selected(), Some(&id("Nantou County")));
    }

    #[test]
    fn test_constrained_pan() {
        let mut config = MapConfig::default();
        config.camera.constrain_pan = true;
        let mut ctl = controller(&config);
        ctl.pan_by(40.0, 40.0);
        assert!(ctl.transform().is_identity());
        assert!(!ctl.is_zoomed_in());
    }

    #[test]
    fn test_fixed_viewport_ignores_resize() {
        let mut ctl = default_controller();
        assert!(!ctl.set_window_size(640.0, 480.0));
    }

    #[test]
    fn test_resize_reframes_selection() {
        let config = MapConfig {
            viewport: ViewportSizing::FitWindow,
            projection: ProjectionMode::FitSize,
            ..MapConfig::default()
        };
        let mut ctl = controller(&config);
        assert_eq!(ctl.viewport(), (1024.0, 768.0));
        let target = id("Chiayi City");
        ctl.select_region(&target, 0.0);

        assert!(ctl.set_window_size(600.0, 900.0));
        assert!(!ctl.is_animating());
        let bounds = ctl.map().bounds_of(&target).unwrap();
        assert_eq!(ctl.transform(), camera::frame_region(bounds, 600.0, 900.0));
    }

    #[test]
    fn test_empty_region_keeps_camera() {
        let mut empty = square("Empty", 0.0, 0.0, 0.0);
        empty.geometry = Geometry::empty();
        let dataset = Arc::new(BoundaryDataset::new(vec![empty]).unwrap());
        let table = ContentTable::new(record("taiwan"), BTreeMap::new());
        let mut ctl = MapController::new(dataset, table, &MapConfig::default(), 0.0, 0.0);

        assert_eq!(ctl.select_region(&id("Empty"), 0.0), Transition::Focused(id("Empty")));
        assert!(!ctl.is_animating());
        assert!(ctl.transform().is_identity());
        // Content falls back to the default record
        assert_eq!(ctl.content().id, "taiwan");
        assert_eq!(ctl.reset_selection(10.0), Transition::Reset);
    }

    #[test]
    fn test_collinear_region_keeps_camera() {
        let mut line = square("Line", 0.0, 0.0, 0.0);
        line.geometry = Geometry::polygon(vec![vec![
            LonLat::new(121.0, 24.0),
            LonLat::new(121.1, 24.0),
            LonLat::new(121.2, 24.0),
        ]]);
        let dataset = Arc::new(BoundaryDataset::new(vec![line]).unwrap());
        let table = ContentTable::new(record("taiwan"), BTreeMap::new());
        let mut ctl = MapController::new(dataset, table, &MapConfig::default(), 0.0, 0.0);

        assert_eq!(ctl.select_region(&id("Line"), 0.0), Transition::Focused(id("Line")));
        assert!(!ctl.is_animating());
        while ctl.tick(1000.0) {}
        assert!(ctl.transform().is_identity());
    }

    #[test]
    fn test_hit_test_follows_camera() {
        let mut ctl = default_controller();
        let target = id("Changhua County");
        ctl.select_region(&target, 0.0);
        settle(&mut ctl, 1000.0);
        let center = ctl.map().bounds_of(&target).unwrap().center();
        let on_screen = ctl.transform().apply(center);
        assert_eq!(ctl.hit_test(on_screen), Some(target));
    }
}
