use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "Help" }

                div { class: "shortcut-section",
                    h3 { "Mouse" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Click county" }
                        span { "Zoom in and show its details" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Click background" }
                        span { "Back to the whole island" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Double-click background" }
                        span { "Reset view" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Scroll" }
                        span { "Zoom at cursor" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Drag" }
                        span { "Pan" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Touch" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Tap" }
                        span { "Same as click" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Pinch" }
                        span { "Zoom" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Keyboard" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } }
                        span { "Reset view / close help" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "H" } " / " kbd { "?" } }
                        span { "Toggle this help" }
                    }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}
