#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM-based web frontend for tokensnap.
//
// JS side:
//   import init, { WasmApp } from "./tokensnap-web-dom.js";
//   const app = new WasmApp();
//   const snap = JSON.parse(app.snapshot_json());
//   const snap2 = JSON.parse(app.handle_action_json(JSON.stringify({ type: "SetSearch", text: "usd" })));
//   window.addEventListener("popstate", () =>
//     render(JSON.parse(app.handle_action_json(JSON.stringify({ type: "PopState", path: location.pathname })))));
//
// Fetch results arrive asynchronously; JS re-renders from `snapshot_json()`
// after `app.pending()` drops (or on its own animation frame).

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::window;

    use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel, UnboundedReceiver, UnboundedSender};

    use tokensnap::{
        app::{App, AppOptions},
        config::Config,
        effects::run_effects,
        nav::BrowserHistory,
        platform,
        ui_snapshot::{apply_action, UiAction, UiSnapshot},
        AppEvent, HttpFeed,
    };

    /// Initialize logging, the panic hook, and theme CSS variables on page load.
    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());

        let Some(root) = window()
            .and_then(|win| win.document())
            .and_then(|doc| doc.document_element())
        else {
            return;
        };
        if let Some(html_root) = root.dyn_ref::<web_sys::HtmlElement>() {
            let colors = Config::web_default().theme.colors();
            for (name, value) in colors.to_css_vars() {
                if let Err(e) = html_root.style().set_property(name, &value) {
                    log::warn!("[theme] Failed to set CSS var {}: {:?}", name, e);
                }
            }
            log::info!("[theme] CSS variables injected");
        }
    }

    /// Wasm-exposed app wrapper.
    ///
    /// Holds the core App and the receiver for fetch results.
    #[wasm_bindgen]
    pub struct WasmApp {
        app: App,
        feed: Rc<HttpFeed>,
        event_tx: UnboundedSender<AppEvent>,
        event_rx: UnboundedReceiver<AppEvent>,
        in_flight: Rc<std::cell::Cell<usize>>,
    }

    #[wasm_bindgen]
    impl WasmApp {
        /// Build the app from the current location and start the first fetch.
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<WasmApp, JsValue> {
            let cfg = Config::web_default();
            let feed = HttpFeed::new(cfg.http_timeout_ms)
                .map_err(|e| JsValue::from_str(&format!("http client: {e}")))?;
            let (event_tx, event_rx) = unbounded_channel::<AppEvent>();

            let mut app = App::new(
                cfg.category_source.clone(),
                AppOptions::from_config(&cfg, AppOptions::web_layout()),
                Box::new(BrowserHistory),
            );
            app.start();

            let mut this = WasmApp {
                app,
                feed: Rc::new(feed),
                event_tx,
                event_rx,
                in_flight: Rc::new(std::cell::Cell::new(0)),
            };
            this.spawn_effects();
            Ok(this)
        }

        /// Get a fresh snapshot as JSON (drains pending events first).
        #[wasm_bindgen]
        pub fn snapshot_json(&mut self) -> String {
            self.drain_events();
            self.snapshot()
        }

        /// Apply an action (JSON-encoded UiAction) and return an updated snapshot.
        #[wasm_bindgen]
        pub fn handle_action_json(&mut self, action_json: String) -> String {
            self.drain_events();

            match serde_json::from_str::<UiAction>(&action_json) {
                Ok(action) => {
                    if let Some(content) = apply_action(&mut self.app, action) {
                        platform::copy_with_toast(&mut self.app, &content);
                    }
                    self.spawn_effects();
                }
                Err(e) => {
                    log::warn!("Failed to deserialize UiAction ({e}): {action_json:?}");
                }
            }

            self.snapshot()
        }

        /// Number of effects still running (JS polls until zero).
        #[wasm_bindgen]
        pub fn pending(&self) -> usize {
            self.in_flight.get()
        }
    }

    impl WasmApp {
        fn snapshot(&self) -> String {
            let snap = UiSnapshot::from_app(&self.app);
            serde_json::to_string(&snap).unwrap_or_else(|e| {
                log::error!("Failed to serialize UiSnapshot: {e}");
                "{}".to_string()
            })
        }

        fn drain_events(&mut self) {
            loop {
                match self.event_rx.try_recv() {
                    Ok(ev) => self.app.on_event(ev),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::warn!("[WasmApp] Event channel disconnected");
                        break;
                    }
                }
            }
            // Discovery finishing can queue the first token fetch
            self.spawn_effects();
        }

        fn spawn_effects(&mut self) {
            let effects = self.app.take_effects();
            if effects.is_empty() {
                return;
            }
            let feed = Rc::clone(&self.feed);
            let tx = self.event_tx.clone();
            let in_flight = Rc::clone(&self.in_flight);
            in_flight.set(in_flight.get() + effects.len());
            spawn_local(async move {
                let count = effects.len();
                for ev in run_effects(feed.as_ref(), effects).await {
                    let _ = tx.send(ev);
                }
                in_flight.set(in_flight.get().saturating_sub(count));
            });
        }
    }
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("tokensnap-web-dom is only supported on wasm32 (browser) target.");
}
