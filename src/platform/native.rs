use copypasta::{ClipboardContext, ClipboardProvider};

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(content: &str) -> bool {
    match ClipboardContext::new() {
        Ok(mut ctx) => match ctx.set_contents(content.to_string()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[clipboard] set_contents failed: {e}");
                false
            }
        },
        Err(e) => {
            log::warn!("[clipboard] no clipboard context: {e}");
            false
        }
    }
}
