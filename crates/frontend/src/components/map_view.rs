use dioxus::html::input_data::MouseButton;
use dioxus::logger::tracing;
use dioxus::prelude::*;
use taiwan_map_shared::models::{RegionId, ScreenPoint};
use taiwan_map_shared::render::{self, MapEvent, RegionShape};
use taiwan_map_shared::state::Transition;

use crate::animation::{self, run_frames};
use crate::data::Controller;
use crate::viewport::{self, MAP_CONTAINER_ID};

/// Run a state operation and start the frame loop if the camera has to move.
fn apply(mut controller: Signal<Option<Controller>>, op: impl FnOnce(&mut Controller, f64) -> Transition) {
    let now = animation::now_ms();
    let transition = match controller.write().as_mut() {
        Some(ctl) => op(ctl, now),
        None => return,
    };
    if transition.is_changed() {
        run_frames(controller);
    }
}

pub fn dispatch(controller: Signal<Option<Controller>>, event: MapEvent) {
    tracing::debug!(%event, "Map event");
    apply(controller, |ctl, now| ctl.handle_event(&event, now));
}

/// Hover stays in the view; it never reaches the controller.
fn hover(mut hovered: Signal<Option<RegionId>>, event: MapEvent) {
    let mut current = hovered.peek().clone();
    if render::apply_hover(&mut current, &event) {
        hovered.set(current);
    }
}

/// Back button and Escape.
pub fn reset_view(controller: Signal<Option<Controller>>) {
    apply(controller, |ctl, now| ctl.reset_selection(now));
}

/// Apply a direct gesture to the controller, if loaded.
fn gesture(mut controller: Signal<Option<Controller>>, f: impl FnOnce(&mut Controller)) {
    if let Some(ctl) = controller.write().as_mut() {
        f(ctl);
    }
}

#[component]
pub fn MapView(controller: Signal<Option<Controller>>) -> Element {
    // Hover is view state only; selection lives in the controller
    let hovered = use_signal(|| None::<RegionId>);

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_last = use_signal(|| (0.0_f64, 0.0_f64));

    // Touch state
    let mut touch_start_pos = use_signal(|| None::<(f64, f64)>);
    let mut touch_last = use_signal(|| (0.0_f64, 0.0_f64));
    let mut touch_did_pan = use_signal(|| false);
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_start_scale = use_signal(|| 1.0_f64);
    let mut pinch_anchor = use_signal(|| ScreenPoint::new(0.0, 0.0));

    let (shapes, transform_attr, (vb_w, vb_h), settings, zoomed) = {
        let guard = controller.read();
        let Some(ctl) = guard.as_ref() else {
            return rsx! {};
        };
        (
            ctl.render(hovered.read().as_ref()),
            render::transform_attr(ctl.transform()),
            ctl.viewport(),
            *ctl.settings(),
            ctl.is_zoomed_in(),
        )
    };

    let container_class = match (*is_dragging.read() && *did_drag.read(), zoomed) {
        (true, _) => "map-container dragging",
        (false, true) => "map-container zoomed",
        (false, false) => "map-container",
    };

    let paths = shapes.into_iter().map(move |shape: RegionShape| {
        let click_id = shape.id.clone();
        let dblclick_id = shape.id.clone();
        let enter_id = shape.id.clone();
        let leave_id = shape.id.clone();
        rsx! {
            path {
                key: "{shape.id}",
                d: "{shape.path}",
                class: shape.style.class(),
                onclick: move |evt: Event<MouseData>| {
                    // Region clicks must not reach the background handler
                    evt.stop_propagation();
                    if *did_drag.read() {
                        return;
                    }
                    dispatch(controller, MapEvent::Click(click_id.clone()));
                },
                ondoubleclick: move |evt: Event<MouseData>| {
                    evt.stop_propagation();
                    evt.prevent_default();
                    dispatch(controller, MapEvent::DoubleClick(Some(dblclick_id.clone())));
                },
                onmouseenter: move |_| hover(hovered, MapEvent::HoverEnter(enter_id.clone())),
                onmouseleave: move |_| hover(hovered, MapEvent::HoverLeave(leave_id.clone())),
                title { "{shape.name}" }
            }
        }
    });

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = viewport::wheel_delta_y(evt.data().delta());
                if delta_y == 0.0 {
                    return;
                }
                let step = settings.wheel_zoom_step;
                let factor = if delta_y < 0.0 { step } else { 1.0 / step };
                let client = evt.data().client_coordinates();
                let Some(anchor) = viewport::client_to_viewbox(client.x, client.y, vb_w, vb_h) else {
                    return;
                };
                gesture(controller, |ctl| ctl.zoom_by(anchor, factor));
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_last.set((client.x, client.y));
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let start = *drag_start.read();
                let threshold = settings.drag_threshold_px;
                if !*did_drag.read()
                    && ((client.x - start.0).abs() > threshold || (client.y - start.1).abs() > threshold)
                {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let last = *drag_last.read();
                    if let Some((dx, dy)) =
                        viewport::client_delta_to_viewbox(client.x - last.0, client.y - last.1, vb_w, vb_h)
                    {
                        gesture(controller, |ctl| ctl.pan_by(dx, dy));
                    }
                    drag_last.set((client.x, client.y));
                }
            },

            // did_drag stays set until the next mousedown so the trailing click is ignored
            onmouseup: move |_| is_dragging.set(false),
            onmouseleave: move |_| is_dragging.set(false),

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                dispatch(controller, MapEvent::DoubleClick(None));
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    let c = touches[0].client_coordinates();
                    touch_start_pos.set(Some((c.x, c.y)));
                    touch_last.set((c.x, c.y));
                    touch_did_pan.set(false);
                } else if touches.len() >= 2 {
                    let c0 = touches[0].client_coordinates();
                    let c1 = touches[1].client_coordinates();
                    let p0 = (c0.x, c0.y);
                    let p1 = (c1.x, c1.y);
                    let mid = ((p0.0 + p1.0) / 2.0, (p0.1 + p1.1) / 2.0);
                    let Some(anchor) = viewport::client_to_viewbox(mid.0, mid.1, vb_w, vb_h) else {
                        return;
                    };
                    let start_scale = controller
                        .peek()
                        .as_ref()
                        .map(|c| c.transform().scale)
                        .unwrap_or(1.0);
                    is_pinching.set(true);
                    pinch_start_distance.set(viewport::point_distance(p0, p1));
                    pinch_start_scale.set(start_scale);
                    pinch_anchor.set(anchor);
                    // A pinch is never a tap
                    touch_start_pos.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();

                if *is_pinching.read() && touches.len() >= 2 {
                    let c0 = touches[0].client_coordinates();
                    let c1 = touches[1].client_coordinates();
                    let d = viewport::point_distance((c0.x, c0.y), (c1.x, c1.y));
                    let start_d = *pinch_start_distance.read();
                    if start_d < 1.0 {
                        return;
                    }
                    let scale = *pinch_start_scale.read() * d / start_d;
                    let anchor = *pinch_anchor.read();
                    gesture(controller, |ctl| ctl.zoom_to(anchor, scale));
                } else if touches.len() == 1 {
                    let c = touches[0].client_coordinates();
                    let cur = (c.x, c.y);
                    let Some(start) = *touch_start_pos.read() else {
                        return;
                    };
                    if !*touch_did_pan.read()
                        && viewport::point_distance(start, cur) > settings.touch_drag_threshold_px
                    {
                        touch_did_pan.set(true);
                    }
                    if *touch_did_pan.read() {
                        let last = *touch_last.read();
                        if let Some((dx, dy)) =
                            viewport::client_delta_to_viewbox(cur.0 - last.0, cur.1 - last.1, vb_w, vb_h)
                        {
                            gesture(controller, |ctl| ctl.pan_by(dx, dy));
                        }
                        touch_last.set(cur);
                    }
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt.data().touches().len();

                if *is_pinching.read() {
                    // Wait for all fingers to lift before resetting pinch state
                    if remaining == 0 {
                        is_pinching.set(false);
                        touch_start_pos.set(None);
                    }
                    return;
                }

                // Taps get no click event because touchstart is cancelled, so hit-test here
                if remaining == 0 && !*touch_did_pan.read() {
                    let start = *touch_start_pos.read();
                    if let Some(p) = start.and_then(|s| viewport::client_to_viewbox(s.0, s.1, vb_w, vb_h)) {
                        let hit = controller.peek().as_ref().and_then(|c| c.hit_test(p));
                        let event = match hit {
                            Some(id) => MapEvent::Click(id),
                            None => MapEvent::BackgroundClick,
                        };
                        dispatch(controller, event);
                    }
                }

                if remaining == 0 {
                    touch_start_pos.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start_pos.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            svg {
                class: "taiwan-map",
                view_box: "0 0 {vb_w} {vb_h}",
                preserve_aspect_ratio: "xMidYMid meet",
                onclick: move |_| {
                    if *did_drag.read() {
                        return;
                    }
                    dispatch(controller, MapEvent::BackgroundClick);
                },

                // Catches background clicks anywhere in the viewBox
                rect {
                    class: "map-background",
                    x: "0",
                    y: "0",
                    width: "{vb_w}",
                    height: "{vb_h}",
                }

                g {
                    transform: "{transform_attr}",
                    {paths}
                }
            }
        }
    }
}
