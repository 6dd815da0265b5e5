use dioxus::html::geometry::WheelDelta;
use taiwan_map_shared::models::ScreenPoint;

pub const MAP_CONTAINER_ID: &str = "taiwan-map-container";

/// Get the bounding client rect of the map container element.
pub fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Live window size in CSS pixels, or zero outside a browser.
pub fn window_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

/// Pixels per viewBox unit for an SVG using `preserveAspectRatio="xMidYMid meet"`.
pub fn viewbox_scale(container_w: f64, container_h: f64, vb_w: f64, vb_h: f64) -> Option<f64> {
    if container_w <= 0.0 || container_h <= 0.0 || vb_w <= 0.0 || vb_h <= 0.0 {
        return None;
    }
    Some((container_w / vb_w).min(container_h / vb_h))
}

/// Convert container-relative pixels to viewBox units. The letterboxed
/// viewBox is centered in the container.
pub fn container_to_viewbox(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    container_h: f64,
    vb_w: f64,
    vb_h: f64,
) -> Option<ScreenPoint> {
    let s = viewbox_scale(container_w, container_h, vb_w, vb_h)?;
    let offset_x = (container_w - vb_w * s) / 2.0;
    let offset_y = (container_h - vb_h * s) / 2.0;
    Some(ScreenPoint::new(
        (container_x - offset_x) / s,
        (container_y - offset_y) / s,
    ))
}

/// Client coordinates to viewBox units, using the live container.
pub fn client_to_viewbox(client_x: f64, client_y: f64, vb_w: f64, vb_h: f64) -> Option<ScreenPoint> {
    let rect = container_rect()?;
    container_to_viewbox(
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        rect.height(),
        vb_w,
        vb_h,
    )
}

/// A client-pixel drag delta in viewBox units.
pub fn client_delta_to_viewbox(dx: f64, dy: f64, vb_w: f64, vb_h: f64) -> Option<(f64, f64)> {
    let rect = container_rect()?;
    let s = viewbox_scale(rect.width(), rect.height(), vb_w, vb_h)?;
    Some((dx / s, dy / s))
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

pub fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}
