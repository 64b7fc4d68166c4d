//! Platform abstraction (clipboard).

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod wasm;
        pub use wasm::copy_to_clipboard;
    } else {
        mod native;
        pub use native::copy_to_clipboard;
    }
}

/// Copy `content` and report the outcome with a toast.
pub fn copy_with_toast(app: &mut crate::App, content: &str) -> bool {
    let ok = copy_to_clipboard(content);
    if ok {
        log::debug!("[platform] copied {} bytes", content.len());
        app.show_toast(crate::constants::messages::COPY_ADDRESS.to_string());
    } else {
        log::warn!("[platform] clipboard unavailable");
        app.show_toast(crate::constants::messages::COPY_FAILED.to_string());
    }
    ok
}
