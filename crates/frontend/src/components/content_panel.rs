use dioxus::prelude::*;
use taiwan_map_shared::models::{ContentRecord, RegionId};

#[component]
pub fn ContentPanel(content: ContentRecord, selected: Option<RegionId>, zoomed: bool) -> Element {
    rsx! {
        aside { class: "content-panel",
            if let Some(id) = &selected {
                span { class: "region-tag", "{id}" }
            }

            h1 { "{content.title}" }
            p { class: "description", "{content.description}" }

            if let Some(population) = &content.population {
                div { class: "fact-row",
                    span { class: "fact-label", "人口：" }
                    span { "{population}" }
                }
            }
            if let Some(area) = &content.area {
                div { class: "fact-row",
                    span { class: "fact-label", "面積：" }
                    span { "{area}" }
                }
            }

            if !content.highlights.is_empty() {
                h3 { "特色亮點：" }
                ul { class: "highlights",
                    for highlight in &content.highlights {
                        li { "{highlight}" }
                    }
                }
            }

            if let Some(specialties) = &content.specialties {
                h3 { "特色美食：" }
                div { class: "specialties",
                    for specialty in specialties {
                        span { class: "specialty-chip", "{specialty}" }
                    }
                }
            }

            if zoomed {
                p { class: "panel-hint", "點擊地圖空白處可回到完整台灣視圖" }
            } else {
                p { class: "panel-hint idle", "點擊任何縣市可查看詳細資訊" }
            }
        }
    }
}
