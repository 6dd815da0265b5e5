mod animation;
mod components;
mod data;
mod pages;
mod viewport;

use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Title { "臺灣互動地圖" }
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        pages::explorer::Explorer {}
    }
}

fn main() {
    dioxus::logger::init(Level::INFO).ok();
    launch(App);
}
