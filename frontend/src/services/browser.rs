//! Thin wrappers over `window` APIs the pages need.

use wasm_bindgen::JsValue;

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Native confirm dialog. Answers `false` when no dialog can be shown.
pub fn confirm(message: &str) -> bool {
    match web_sys::window().map(|w| w.confirm_with_message(message)) {
        Some(Ok(answer)) => answer,
        Some(Err(e)) => {
            log::error!("🪟 BROWSER: confirm failed: {}", describe(e));
            false
        }
        None => false,
    }
}

pub fn navigate_to(url: &str) {
    log::info!("🪟 BROWSER: Navigating to {}", url);
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("🪟 BROWSER: Navigation to {} failed: {}", url, describe(e));
        }
    }
}

pub fn print_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.print() {
            log::error!("🪟 BROWSER: print failed: {}", describe(e));
        }
    }
}
