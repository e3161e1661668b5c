//! Service Colors for the browser (WASM)
//!
//! 読み込み時に `window.ServiceColors` を公開し、DOMの準備ができ次第初期化する。

mod api;
mod dom;
mod dropdown;
mod namespace;
mod observer;
mod state;

pub use api::{
    apply_service_colors_js, configure_service_colors, create_service_button_js,
    create_service_label_js, get_service_class, init_service_colors, teardown_service_colors,
    update_service_dropdown_styling,
};

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    if let Err(e) = namespace::publish() {
        gloo::console::error!(format!("service colors: publish failed: {}", e));
    }

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    // 読み込み中ならDOMContentLoadedまで待つ
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(auto_init);
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        {
            gloo::console::error!(e);
        }
    } else {
        auto_init();
    }
}

fn auto_init() {
    if let Err(e) = init_service_colors() {
        gloo::console::error!(e);
    }
}
