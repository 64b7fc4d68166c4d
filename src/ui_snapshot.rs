//! UI snapshot and action types for DOM-based rendering
//!
//! This module provides a clean boundary between the headless App core
//! and the DOM frontend, enabling the wasm façade to serialize state as JSON.
//! JS owns the DOM; Rust owns routing, filtering, hover, and the grid window.

use serde::{Deserialize, Serialize};

use crate::app::{App, InputMode};
use crate::constants::{app::TITLE, feeds::DEFAULT_TOKEN_IMAGE, messages};

/// Snapshot of App state for DOM rendering (one-way data flow: Rust → JS)
#[derive(Debug, Clone, Serialize)]
pub struct UiSnapshot {
    pub title: String,

    /// Path mirrored into the address bar
    pub route_path: String,

    pub categories: Vec<CategoryTab>,

    pub search: SearchState,

    /// "{category} Tokens", "Loading ...", an error, or "No tokens found"
    pub heading: String,
    pub loading: bool,
    pub error: Option<String>,

    /// Placeholder tiles to draw while loading
    pub skeleton_count: usize,

    /// Materialized tiles (the whole filtered list in grid mode, the visible
    /// window in virtual mode)
    pub tiles: Vec<TileView>,

    /// Grid geometry so JS can size the scroll container
    pub grid: GridState,

    /// Details of the hovered token
    pub tooltip: Option<Tooltip>,

    /// Toast notification (transient message)
    pub toast: Option<String>,

    pub match_mode: String,
    pub render_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTab {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchState {
    pub text: String,
    pub focused: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    /// Position in the filtered list (key for hover actions)
    pub index: usize,
    pub symbol: String,
    pub name: String,
    pub address: String,
    /// Logo URL, or the placeholder image when missing or broken
    pub logo_src: String,
    pub row: usize,
    pub col: usize,
    pub hovered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridState {
    pub columns: usize,
    pub total_rows: usize,
    pub total_count: usize,
    pub content_height: u32,
    pub row_stride: u32,
    pub col_stride: u32,
    pub tile_size: u32,
    pub scroll_top: u32,
    pub window_start: usize,
    pub window_end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub logo_uri: String,
    pub address: String,
}

impl UiSnapshot {
    pub fn from_app(app: &App) -> Self {
        let active = app.category();
        let categories = app
            .categories()
            .iter()
            .map(|c| CategoryTab {
                name: c.name.clone(),
                active: Some(c.name.as_str()) == active,
            })
            .collect();

        let layout = app.layout();
        let columns = app.columns();
        let window = if app.loading() { 0..0 } else { app.tile_window() };
        let hovered = app.hovered();

        let tiles = window
            .clone()
            .filter_map(|pos| {
                let token = app.filtered_token(pos)?;
                let cell = layout.cell(pos, columns);
                Some(TileView {
                    index: pos,
                    symbol: token.symbol.clone(),
                    name: token.name.clone(),
                    address: token.address.clone(),
                    logo_src: app.logo_src(token).to_string(),
                    row: cell.row,
                    col: cell.col,
                    hovered: hovered == Some(pos),
                })
            })
            .collect();

        let count = app.filtered_len();
        let tooltip = app.hovered_token().map(|t| Tooltip {
            name: t.name.clone(),
            logo_uri: t.logo().unwrap_or(DEFAULT_TOKEN_IMAGE).to_string(),
            address: t.address.clone(),
        });

        UiSnapshot {
            title: TITLE.to_string(),
            route_path: app.route_path(),
            categories,
            search: SearchState {
                text: app.search().to_string(),
                focused: app.input_mode() == InputMode::Search,
            },
            heading: app.heading(),
            loading: app.loading(),
            error: app.error().map(str::to_string),
            skeleton_count: app.skeleton_count(),
            tiles,
            grid: GridState {
                columns,
                total_rows: layout.rows(count, columns),
                total_count: count,
                content_height: layout.content_height(count, columns),
                row_stride: layout.row_stride(),
                col_stride: layout.col_stride(),
                tile_size: layout.tile_w,
                scroll_top: app.scroll_top(),
                window_start: window.start,
                window_end: window.end,
            },
            tooltip,
            toast: app.toast_message().map(str::to_string),
            match_mode: app.match_mode().to_string(),
            render_mode: app.render_mode().to_string(),
        }
    }
}

/// User actions from DOM (data flow: JS → Rust)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum UiAction {
    /// Category button clicked
    SelectCategory { name: String },
    /// Search input changed (live filter, no navigation)
    SetSearch { text: String },
    /// Enter in the search box: commit the term into the URL
    SubmitSearch,
    /// Pointer entered a tile (`None` when it left the grid)
    Hover { index: Option<usize> },
    /// `<img>` error event; `url` is the failing `src`
    LogoFailed { url: String },
    /// Grid container resized (px)
    Resize { width: u32, height: u32 },
    /// Grid container scrolled (px)
    Scroll { top: u32 },
    /// Browser back/forward (`popstate`)
    PopState { path: String },
    /// Copy the hovered token's contract address
    CopyAddress,
    /// Keyboard navigation outside the search box
    Key {
        code: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        meta: bool,
    },
}

/// Apply a DOM action to the app. Returns text the host should put on the
/// clipboard, if any.
pub fn apply_action(app: &mut App, action: UiAction) -> Option<String> {
    match action {
        UiAction::SelectCategory { name } => app.select_category(&name),
        UiAction::SetSearch { text } => {
            app.start_search();
            app.set_search(text);
        }
        UiAction::SubmitSearch => app.submit_search(),
        UiAction::Hover { index } => app.hover(index),
        UiAction::LogoFailed { url } => app.mark_logo_broken(&url),
        UiAction::Resize { width, height } => app.set_viewport(width, height),
        UiAction::Scroll { top } => app.scroll_to(top),
        UiAction::PopState { path } => app.on_location_changed(&path),
        UiAction::CopyAddress => return copy_request(app),
        UiAction::Key { code, ctrl, alt, shift, meta } => {
            return handle_key(app, &code, ctrl || meta, alt, shift);
        }
    }
    None
}

fn copy_request(app: &mut App) -> Option<String> {
    let content = app.copy_content();
    if content.is_none() {
        app.show_toast(messages::COPY_FAILED.to_string());
    }
    content
}

/// Browser `KeyboardEvent.key` values, same semantics as the terminal.
fn handle_key(app: &mut App, code: &str, ctrl: bool, alt: bool, shift: bool) -> Option<String> {
    match code {
        "ArrowUp" => app.move_hover(0, -1),
        "ArrowDown" => app.move_hover(0, 1),
        "ArrowLeft" => app.move_hover(-1, 0),
        "ArrowRight" => app.move_hover(1, 0),
        "Home" => app.hover_first(),
        "End" => app.hover_last(),
        "PageUp" => app.page_up(),
        "PageDown" => app.page_down(),
        "Tab" if shift => app.prev_category(),
        "Tab" => app.next_category(),
        "]" => app.next_category(),
        "[" => app.prev_category(),
        "/" => app.start_search(),
        "Escape" => {
            if app.input_mode() == InputMode::Search {
                app.cancel_search();
            } else {
                app.clear_search();
            }
        }
        "c" if !ctrl && !alt => return copy_request(app),
        d if d.len() == 1 && !ctrl && !alt => {
            if let Some(n) = d.chars().next().and_then(|c| c.to_digit(10)) {
                if n > 0 {
                    app.select_category_index(n as usize - 1);
                }
            }
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::categories::{Category, CategorySource};
    use crate::feed::FeedOutcome;
    use crate::nav::MemoryHistory;
    use crate::types::{AppEvent, Effect, Token};

    const WETH_LOGO: &str = "https://logos.test/weth.png";

    fn app_at(path: &str) -> App {
        let table = vec![
            Category::new("Ethereum", "https://feeds.test/ethereum.json"),
            Category::new("Arbitrum", "https://feeds.test/arbitrum.json"),
        ];
        let mut app = App::new(
            CategorySource::Static(table),
            AppOptions::default(),
            Box::new(MemoryHistory::new(path)),
        );
        app.start();
        app
    }

    fn tokens() -> Vec<Token> {
        serde_json::from_str(&format!(
            r#"[
                {{"symbol":"WETH","name":"Wrapped Ether","address":"0xc02a","decimals":18,"chainId":1,"logoURI":"{WETH_LOGO}"}},
                {{"symbol":"DAI","name":"Dai Stablecoin","address":"0x6b17","decimals":18,"chainId":1,"logoURI":"https://logos.test/dai.png"}},
                {{"symbol":"USDC","name":"USD Coin","address":"0xa0b8","decimals":6,"chainId":1}}
            ]"#
        ))
        .unwrap()
    }

    fn loaded(path: &str) -> App {
        let mut app = app_at(path);
        let category = app.category().unwrap().to_string();
        app.take_effects();
        app.on_event(AppEvent::TokensLoaded {
            seq: app.request_seq(),
            category,
            result: Ok(FeedOutcome::Tokens(tokens())),
        });
        app
    }

    fn act(app: &mut App, json: &str) -> Option<String> {
        let action: UiAction = serde_json::from_str(json).unwrap();
        apply_action(app, action)
    }

    #[test]
    fn loading_snapshot_shows_skeletons_only() {
        let app = app_at("/Ethereum");
        let snap = UiSnapshot::from_app(&app);
        assert!(snap.loading);
        assert_eq!(snap.skeleton_count, 20);
        assert!(snap.tiles.is_empty());
        assert_eq!((snap.grid.window_start, snap.grid.window_end), (0, 0));
        assert_eq!(snap.route_path, "/Ethereum");
        let active: Vec<_> = snap.categories.iter().filter(|c| c.active).map(|c| c.name.as_str()).collect();
        assert_eq!(active, ["Ethereum"]);
    }

    #[test]
    fn tagged_actions_drive_search_and_hover() {
        let mut app = loaded("/Ethereum");
        let snap = UiSnapshot::from_app(&app);
        assert_eq!(snap.skeleton_count, 0);
        assert_eq!(snap.tiles.len(), 3);
        assert_eq!(snap.heading, "Ethereum Tokens");

        act(&mut app, r#"{"type":"SetSearch","text":"dai"}"#);
        act(&mut app, r#"{"type":"Hover","index":0}"#);
        let snap = UiSnapshot::from_app(&app);
        assert!(snap.search.focused);
        assert_eq!(snap.search.text, "dai");
        assert_eq!(snap.tiles.len(), 1);
        assert!(snap.tiles[0].hovered);
        assert_eq!(snap.tooltip.as_ref().unwrap().name, "Dai Stablecoin");

        // Key events without modifier flags decode with defaults
        let copied = act(&mut app, r#"{"type":"Key","code":"c"}"#);
        assert_eq!(copied.as_deref(), Some("0x6b17"));

        act(&mut app, r#"{"type":"Hover","index":null}"#);
        assert!(act(&mut app, r#"{"type":"CopyAddress"}"#).is_none());
        assert_eq!(UiSnapshot::from_app(&app).toast.as_deref(), Some(messages::COPY_FAILED));
    }

    #[test]
    fn logo_failure_swaps_tile_to_placeholder_but_keeps_tooltip_link() {
        let mut app = loaded("/Ethereum");
        act(&mut app, r#"{"type":"Hover","index":0}"#);
        act(&mut app, &format!(r#"{{"type":"LogoFailed","url":"{WETH_LOGO}"}}"#));

        let snap = UiSnapshot::from_app(&app);
        assert_eq!(snap.tiles[0].logo_src, DEFAULT_TOKEN_IMAGE);
        assert_eq!(snap.tiles[1].logo_src, "https://logos.test/dai.png");
        assert_eq!(snap.tooltip.unwrap().logo_uri, WETH_LOGO);

        // A token without a logo links to the placeholder
        act(&mut app, r#"{"type":"Hover","index":2}"#);
        let snap = UiSnapshot::from_app(&app);
        assert_eq!(snap.tooltip.unwrap().logo_uri, DEFAULT_TOKEN_IMAGE);
    }

    #[test]
    fn pop_state_reseeds_category_and_search() {
        let mut app = loaded("/Ethereum");
        act(&mut app, r#"{"type":"PopState","path":"/Arbitrum/usd"}"#);

        let effects = app.take_effects();
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchTokens { category, .. }] if category == "Arbitrum"
        ));
        let snap = UiSnapshot::from_app(&app);
        assert!(snap.loading);
        assert!(snap.tiles.is_empty());
        assert_eq!(snap.search.text, "usd");
        assert!(snap.categories.iter().any(|c| c.active && c.name == "Arbitrum"));
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        assert!(serde_json::from_str::<UiAction>(r#"{"type":"Explode"}"#).is_err());
        assert!(serde_json::from_str::<UiAction>(r#"{"text":"dai"}"#).is_err());
    }
}
