//! Navigation history: where route changes are written to.
//!
//! The browser build writes straight into `window.history`; the terminal build
//! keeps an in-memory stack with the same push/replace/back/forward behavior.

pub trait Navigator {
    /// Add a new entry and make it current.
    fn push(&mut self, path: &str);
    /// Overwrite the current entry (used for redirects).
    fn replace(&mut self, path: &str);
    /// Path of the current entry.
    fn current(&self) -> String;
    /// Step back; returns the new current path, or None at the start.
    fn back(&mut self) -> Option<String>;
    /// Step forward; returns the new current path, or None at the end.
    fn forward(&mut self) -> Option<String>;
}

/// Browser-style history stack kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryHistory {
    fn push(&mut self, path: &str) {
        // Pushing after going back discards the forward entries
        self.entries.truncate(self.cursor + 1);
        if self.entries.last().map(String::as_str) == Some(path) {
            return;
        }
        self.entries.push(path.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, path: &str) {
        self.entries[self.cursor] = path.to_string();
    }

    fn current(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn back(&mut self) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    fn forward(&mut self) -> Option<String> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

/// `window.history` wrapper. Back/forward are driven by the browser, which
/// reports them through `popstate`, so those methods only trigger the move.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserHistory {
    fn push(&mut self, path: &str) {
        let Some(win) = web_sys::window() else { return };
        if let Ok(history) = win.history() {
            if let Err(e) =
                history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
            {
                log::warn!("[nav] pushState failed: {e:?}");
            }
        }
    }

    fn replace(&mut self, path: &str) {
        let Some(win) = web_sys::window() else { return };
        if let Ok(history) = win.history() {
            if let Err(e) =
                history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
            {
                log::warn!("[nav] replaceState failed: {e:?}");
            }
        }
    }

    fn current(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn back(&mut self) -> Option<String> {
        // The new path arrives later through `popstate`
        if let Some(Ok(history)) = web_sys::window().map(|w| w.history()) {
            if let Err(e) = history.back() {
                log::warn!("[nav] history.back() failed: {e:?}");
            }
        }
        None
    }

    fn forward(&mut self) -> Option<String> {
        // The new path arrives later through `popstate`
        if let Some(Ok(history)) = web_sys::window().map(|w| w.history()) {
            if let Err(e) = history.forward() {
                log::warn!("[nav] history.forward() failed: {e:?}");
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_back_forward() {
        let mut h = MemoryHistory::default();
        h.push("/Ethereum");
        h.push("/Ethereum/usdc");
        assert_eq!(h.current(), "/Ethereum/usdc");

        assert_eq!(h.back().as_deref(), Some("/Ethereum"));
        assert_eq!(h.back().as_deref(), Some("/"));
        assert_eq!(h.back(), None);

        assert_eq!(h.forward().as_deref(), Some("/Ethereum"));
        assert_eq!(h.current(), "/Ethereum");
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut h = MemoryHistory::default();
        h.push("/Ethereum");
        h.push("/Bsc");
        h.back();
        h.push("/Optimism");
        assert_eq!(h.entries(), ["/", "/Ethereum", "/Optimism"]);
        assert_eq!(h.forward(), None);
    }

    #[test]
    fn replace_keeps_length() {
        let mut h = MemoryHistory::default();
        h.replace("/Ethereum");
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), "/Ethereum");
    }

    #[test]
    fn duplicate_push_is_ignored() {
        let mut h = MemoryHistory::new("/Ethereum");
        h.push("/Ethereum");
        assert_eq!(h.len(), 1);
    }
}
