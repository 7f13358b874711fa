pub mod core;
pub mod services;
pub mod utils;
#[cfg(not(target_arch = "wasm32"))]
pub mod console;
#[cfg(target_arch = "wasm32")]
pub mod ui;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use leptos::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).unwrap_or(());

    // The backend serves this page, so it lives at the same origin.
    let mut config = crate::core::config::Config::default();
    if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
        config.api.base_url = origin;
    }

    crate::ui::register_service_worker(&config.ui.service_worker);

    leptos::mount_to_body(move || {
        use crate::ui::App;
        view! { <App config=config/> }
    });
}
