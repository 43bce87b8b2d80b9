//! Small wrappers around the browser globals the app relies on.

use wasm_bindgen::UnwrapThrowExt;

pub fn browser_window() -> web_sys::Window {
    web_sys::window().expect_throw("window is not available")
}

pub fn session_storage() -> Option<web_sys::Storage> {
    browser_window().session_storage().ok().flatten()
}

pub fn local_storage() -> Option<web_sys::Storage> {
    browser_window().local_storage().ok().flatten()
}

pub fn location() -> web_sys::Location {
    browser_window().location()
}

/// Current origin, e.g. `https://calc.example.com`.
pub fn origin() -> String {
    location().origin().unwrap_or_default()
}

/// Redirect the browser; failures only happen in non-browser contexts.
pub fn redirect_to(url: &str) {
    let _ = location().assign(url);
}

/// Replace the current history entry, dropping query/fragment noise.
pub fn replace_url(url: &str) {
    if let Ok(history) = browser_window().history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url));
    }
}
