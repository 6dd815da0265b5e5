//! Map configuration.
//!
//! Every field has a default, so a partial (or empty) JSON object is valid.
//! The scale bound and framing margin are constants in [`crate::camera`],
//! not configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::topology::TopologyOptions;

/// How big the rendering surface is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ViewportSizing {
    /// Fixed logical viewBox; the surface is scaled by CSS.
    Fixed { width: f64, height: f64 },
    /// Track the live window dimensions.
    FitWindow,
}

impl Default for ViewportSizing {
    fn default() -> Self {
        ViewportSizing::Fixed {
            width: 450.0,
            height: 800.0,
        }
    }
}

impl ViewportSizing {
    /// Logical viewport size given the current window size.
    pub fn resolve(&self, window_width: f64, window_height: f64) -> (f64, f64) {
        match *self {
            ViewportSizing::Fixed { width, height } => (width, height),
            ViewportSizing::FitWindow => (window_width.max(0.0), window_height.max(0.0)),
        }
    }
}

/// How geographic coordinates are fitted to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ProjectionMode {
    /// Fixed scale and geographic center; the center lands in the middle of the viewport.
    Fixed { scale: f64, center: [f64; 2] },
    /// Scale and translate so the whole dataset fills the viewport.
    FitSize,
}

impl Default for ProjectionMode {
    fn default() -> Self {
        ProjectionMode::Fixed {
            scale: 11000.0,
            center: [121.0, 23.6],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Duration of framing and reset animations.
    pub transition_ms: f64,
    /// Scale factor applied per wheel notch.
    pub wheel_zoom_step: f64,
    /// Mouse movement below this is a click, not a drag.
    pub drag_threshold_px: f64,
    /// Touch is less precise than a mouse.
    pub touch_drag_threshold_px: f64,
    /// Keep scaled content covering the viewport during free gestures.
    pub constrain_pan: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            transition_ms: 750.0,
            wheel_zoom_step: 1.1,
            drag_threshold_px: 3.0,
            touch_drag_threshold_px: 8.0,
            constrain_pan: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportSizing,
    pub projection: ProjectionMode,
    pub topology_object: String,
    pub id_property: String,
    pub name_property: String,
    pub code_property: String,
    pub camera: CameraSettings,
}

impl Default for MapConfig {
    fn default() -> Self {
        let topo = TopologyOptions::default();
        MapConfig {
            viewport: ViewportSizing::default(),
            projection: ProjectionMode::default(),
            topology_object: topo.object,
            id_property: topo.id_property,
            name_property: topo.name_property,
            code_property: topo.code_property,
            camera: CameraSettings::default(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json).map_err(|source| Error::Json {
            what: "map config",
            source,
        })?;
        Ok(config.sanitized())
    }

    pub fn topology_options(&self) -> TopologyOptions {
        TopologyOptions {
            object: self.topology_object.clone(),
            id_property: self.id_property.clone(),
            name_property: self.name_property.clone(),
            code_property: self.code_property.clone(),
        }
    }

    /// Replace values that would break the camera with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = CameraSettings::default();
        let cam = &mut self.camera;
        if !(cam.transition_ms.is_finite() && cam.transition_ms >= 0.0) {
            tracing::warn!(value = cam.transition_ms, "Invalid transition_ms, using default");
            cam.transition_ms = defaults.transition_ms;
        }
        if !(cam.wheel_zoom_step.is_finite() && cam.wheel_zoom_step > 1.0) {
            tracing::warn!(value = cam.wheel_zoom_step, "Invalid wheel_zoom_step, using default");
            cam.wheel_zoom_step = defaults.wheel_zoom_step;
        }
        if !(cam.drag_threshold_px.is_finite() && cam.drag_threshold_px >= 0.0) {
            cam.drag_threshold_px = defaults.drag_threshold_px;
        }
        if !(cam.touch_drag_threshold_px.is_finite() && cam.touch_drag_threshold_px >= 0.0) {
            cam.touch_drag_threshold_px = defaults.touch_drag_threshold_px;
        }
        if let ProjectionMode::Fixed { scale, .. } = self.projection {
            if !(scale.is_finite() && scale > 0.0) {
                tracing::warn!(value = scale, "Invalid projection scale, using default");
                self.projection = ProjectionMode::default();
            }
        }
        if let ViewportSizing::Fixed { width, height } = self.viewport {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !(valid(width) && valid(height)) {
                tracing::warn!(width, height, "Invalid fixed viewport, using default");
                self.viewport = ViewportSizing::default();
            }
        }
        self
    }
}
