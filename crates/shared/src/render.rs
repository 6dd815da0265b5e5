//! Region renderer view model.
//!
//! Visual state is recomputed from the selection on every render; nothing here
//! stores which region is selected.

use std::fmt;

use crate::models::{RegionId, ScreenPoint, Transform};
use crate::projection::ProjectedMap;
use crate::state::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStyle {
    Idle,
    Hovered,
    Selected,
}

impl RegionStyle {
    /// CSS class list for the region's path element.
    pub fn class(self) -> &'static str {
        match self {
            RegionStyle::Idle => "region",
            RegionStyle::Hovered => "region hovered",
            RegionStyle::Selected => "region selected",
        }
    }
}

/// Selection beats hover.
pub fn style_for(id: &RegionId, selection: &SelectionState, hovered: Option<&RegionId>) -> RegionStyle {
    if selection.is_selected(id) {
        RegionStyle::Selected
    } else if hovered == Some(id) {
        RegionStyle::Hovered
    } else {
        RegionStyle::Idle
    }
}

/// One interactive element per region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub id: RegionId,
    pub name: String,
    pub path: String,
    pub style: RegionStyle,
}

/// Shapes in dataset order. Empty regions are still emitted (with an empty
/// path) so every region keeps its element.
pub fn render_regions(
    map: &ProjectedMap,
    selection: &SelectionState,
    hovered: Option<&RegionId>,
) -> Vec<RegionShape> {
    map.regions()
        .iter()
        .map(|r| RegionShape {
            id: r.id.clone(),
            name: r.name.clone(),
            path: r.path.clone(),
            style: style_for(&r.id, selection, hovered),
        })
        .collect()
}

/// Region under a screen point, undoing the camera transform first.
/// Later regions are drawn on top, so they win. `None` is the background.
pub fn hit_test(map: &ProjectedMap, transform: Transform, point: ScreenPoint) -> Option<RegionId> {
    let p = transform.invert(point);
    map.regions()
        .iter()
        .rev()
        .find(|r| r.contains(p))
        .map(|r| r.id.clone())
}

/// SVG `transform` attribute for the map group.
pub fn transform_attr(t: Transform) -> String {
    format!(
        "translate({},{}) scale({})",
        t.translate_x, t.translate_y, t.scale
    )
}

/// Pointer events reported by the rendered map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    HoverEnter(RegionId),
    HoverLeave(RegionId),
    Click(RegionId),
    BackgroundClick,
    /// The region under the pointer, if any.
    DoubleClick(Option<RegionId>),
}

/// Apply a hover event to the view's hover state. A leave only clears the
/// hover it belongs to, so a late leave cannot wipe a newer enter. Returns
/// `true` if the hover changed; other events are ignored.
pub fn apply_hover(hovered: &mut Option<RegionId>, event: &MapEvent) -> bool {
    match event {
        MapEvent::HoverEnter(id) if hovered.as_ref() != Some(id) => {
            *hovered = Some(id.clone());
            true
        }
        MapEvent::HoverLeave(id) if hovered.as_ref() == Some(id) => {
            *hovered = None;
            true
        }
        _ => false,
    }
}

impl fmt::Display for MapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapEvent::HoverEnter(id) => write!(f, "hover-enter({id})"),
            MapEvent::HoverLeave(id) => write!(f, "hover-leave({id})"),
            MapEvent::Click(id) => write!(f, "click({id})"),
            MapEvent::BackgroundClick => write!(f, "background-click"),
            MapEvent::DoubleClick(Some(id)) => write!(f, "double-click({id})"),
            MapEvent::DoubleClick(None) => write!(f, "double-click"),
        }
    }
}
