use wasm_bindgen_futures::JsFuture;

/// Write text through `navigator.clipboard` (secure contexts only). The write
/// itself completes asynchronously; failures are logged.
pub fn copy_to_clipboard(s: &str) -> bool {
    let Some(win) = web_sys::window() else { return false; };
    let clip = win.navigator().clipboard();
    let p = clip.write_text(s);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(p).await {
            log::warn!("[clipboard] write_text rejected: {e:?}");
        }
    });
    true
}
