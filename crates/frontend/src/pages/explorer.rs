use dioxus::logger::tracing;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use taiwan_map_shared::loading::{LoadingStage, LoadingState};
use taiwan_map_shared::state::MapController;

use crate::components::back_button::BackButton;
use crate::components::content_panel::ContentPanel;
use crate::components::help_overlay::HelpOverlay;
use crate::components::loading_pulse::LoadingPulse;
use crate::components::map_view::{reset_view, MapView};
use crate::data::{self, Controller};
use crate::viewport;

#[component]
pub fn Explorer() -> Element {
    let mut loading = use_signal(LoadingState::new);
    let mut controller = use_signal(|| None::<Controller>);
    let mut load_error = use_signal(|| None::<String>);
    let mut show_help = use_signal(|| false);

    // Parse and project in stages so the loading overlay can paint in between
    use_future(move || async move {
        loading.write().advance(LoadingStage::DataLoading);
        loading.write().set_progress(20.0);
        TimeoutFuture::new(0).await;

        let assets = match data::bundled_assets() {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse bundled map assets");
                load_error.set(Some(e.to_string()));
                loading.write().advance(LoadingStage::Completed);
                return;
            }
        };
        loading.write().advance(LoadingStage::Rendering);
        loading.write().set_progress(70.0);
        TimeoutFuture::new(0).await;

        let (w, h) = viewport::window_size();
        let ctl = MapController::new(assets.dataset, assets.content, &assets.config, w, h);
        tracing::info!(regions = ctl.map().len(), "Map ready");
        controller.set(Some(ctl));
        loading.write().advance(LoadingStage::Completed);
    });

    let (content, selected, zoomed) = match controller.read().as_ref() {
        Some(ctl) => (
            Some(ctl.content().clone()),
            ctl.selected().cloned(),
            ctl.is_zoomed_in(),
        ),
        None => (None, None, false),
    };
    let error = load_error.read().clone();
    let loading_state = *loading.read();

    rsx! {
        div {
            class: "app",
            tabindex: "0",

            onkeydown: move |evt: Event<KeyboardData>| match evt.key() {
                Key::Escape => {
                    if *show_help.read() {
                        show_help.set(false);
                    } else {
                        reset_view(controller);
                    }
                }
                Key::Character(c) if c == "h" || c == "H" || c == "?" => {
                    let shown = *show_help.read();
                    show_help.set(!shown);
                }
                _ => {}
            },

            // Only window-sized viewports react; fixed ones ignore the new size
            onresize: move |_evt: Event<ResizeData>| {
                let (w, h) = viewport::window_size();
                let changed = controller
                    .peek()
                    .as_ref()
                    .is_some_and(|c| c.viewport() != c.viewport_for_window(w, h));
                if changed {
                    if let Some(ctl) = controller.write().as_mut() {
                        ctl.set_window_size(w, h);
                    }
                }
            },

            div { class: "map-stage",
                if let Some(err) = error {
                    div { class: "load-error", "Failed to load map: {err}" }
                }
                MapView { controller }
                BackButton {
                    visible: zoomed,
                    on_reset: move |_| reset_view(controller),
                }
                button {
                    class: "help-button",
                    onclick: move |_| show_help.set(true),
                    "?"
                }
            }

            if let Some(content) = content {
                ContentPanel { content, selected, zoomed }
            }

            LoadingPulse { state: loading_state }
            HelpOverlay { show: show_help }
        }
    }
}
