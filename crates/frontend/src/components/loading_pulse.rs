use dioxus::prelude::*;
use taiwan_map_shared::loading::{LoadingStage, LoadingState};

fn stage_label(stage: LoadingStage) -> &'static str {
    match stage {
        LoadingStage::Initial => "Starting...",
        LoadingStage::DataLoading => "Loading map data...",
        LoadingStage::Rendering => "Rendering...",
        LoadingStage::Completed => "Done",
    }
}

#[component]
pub fn LoadingPulse(state: LoadingState) -> Element {
    if !state.is_loading() {
        return rsx! {};
    }
    let label = stage_label(state.stage());
    let progress = state.progress().round();

    rsx! {
        div { class: "loading-overlay",
            div { class: "pulse",
                div { class: "pulse-core" }
                div { class: "pulse-ring outer" }
                div { class: "pulse-ring inner" }
                div { class: "pulse-dot" }
            }
            div { class: "loading-text",
                p { class: "loading-title", "載入台灣地圖中..." }
                p { class: "loading-stage", "{label} {progress}%" }
            }
        }
    }
}
