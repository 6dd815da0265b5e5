use dioxus::prelude::*;

/// Shown only while zoomed in.
#[component]
pub fn BackButton(visible: bool, on_reset: EventHandler<()>) -> Element {
    if !visible {
        return rsx! {};
    }

    rsx! {
        button {
            class: "back-button",
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                on_reset.call(());
            },
            span { class: "back-arrow", "\u{2190}" }
            "返回"
        }
    }
}
