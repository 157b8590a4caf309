//! License Plate Detector Web App (Leptos + WASM)

mod app;
mod components;
pub mod api;

use wasm_bindgen::prelude::*;
use leptos::prelude::*;
use app::App;
use plate_detect_common::DEFAULT_BACKEND_URL;

/// ビルド時に `PLATE_DETECT_BACKEND_URL` で差し替え可能
pub const BACKEND_URL: &str = match option_env!("PLATE_DETECT_BACKEND_URL") {
    Some(url) => url,
    None => DEFAULT_BACKEND_URL,
};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(|| view! { <App backend_url=BACKEND_URL.to_string() /> });
}
