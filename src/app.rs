use std::collections::HashSet;
use std::ops::Range;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

use crate::categories::{self, Category, CategorySource, Resolution};
use crate::config::Config;
use crate::constants::{app as app_consts, feeds, grid as grid_consts, messages};
use crate::feed::FeedOutcome;
use crate::filter::{compile_filter, filter_indices, CompiledFilter, MatchMode};
use crate::grid::{GridLayout, RenderMode};
use crate::nav::Navigator;
use crate::router::{self, Route};
use crate::types::{AppEvent, Effect, Token};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode { Normal, Search }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CategoriesState { Pending, Ready, Failed }

/// Knobs that shape the view but never change at runtime.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub match_mode: MatchMode,
    pub render_mode: RenderMode,
    pub layout: GridLayout,
    pub probe_logos: bool,
}

impl AppOptions {
    pub fn from_config(cfg: &Config, layout: GridLayout) -> Self {
        Self {
            match_mode: cfg.match_mode,
            render_mode: cfg.render_mode,
            layout,
            probe_logos: cfg.probe_logos,
        }
    }

    /// Terminal cell layout.
    pub fn tui_layout() -> GridLayout {
        GridLayout::new(grid_consts::TUI_TILE_COLS, grid_consts::TUI_TILE_ROWS, grid_consts::TUI_GAP)
    }

    /// Browser pixel layout.
    pub fn web_layout() -> GridLayout {
        GridLayout::new(grid_consts::WEB_TILE_PX, grid_consts::WEB_TILE_PX, grid_consts::WEB_GAP_PX)
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            render_mode: RenderMode::default(),
            layout: Self::tui_layout(),
            probe_logos: false,
        }
    }
}

pub struct App {
    quit: bool,
    opts: AppOptions,

    // Categories
    source: CategorySource,
    categories: Vec<Category>,
    categories_state: CategoriesState,
    category: Option<String>,
    pending_route: Option<Route>,   // route read before discovery finished

    // Tokens of the active category and the filtered view over them
    tokens: Vec<Token>,
    filtered: Vec<usize>,
    loading: bool,
    error: Option<String>,
    request_seq: u64,               // latest issued fetch; older responses are dropped
    loaded_at: Option<chrono::DateTime<chrono::Local>>,

    // Search
    search: String,
    compiled: CompiledFilter,
    input_mode: InputMode,

    // Hover and logos
    hovered: Option<usize>,         // index into `tokens`, stable across refilters
    broken_logos: HashSet<String>,
    probed_logos: HashSet<String>,

    // Grid viewport
    viewport: (u32, u32),
    scroll_top: u32,

    nav: Box<dyn Navigator>,
    effects: Vec<Effect>,
    toast_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: CategorySource, opts: AppOptions, nav: Box<dyn Navigator>) -> Self {
        let compiled = compile_filter("", opts.match_mode);
        Self {
            quit: false,
            opts,
            source,
            categories: Vec::new(),
            categories_state: CategoriesState::Pending,
            category: None,
            pending_route: None,
            tokens: Vec::new(),
            filtered: Vec::new(),
            loading: false,
            error: None,
            request_seq: 0,
            loaded_at: None,
            search: String::new(),
            compiled,
            input_mode: InputMode::Normal,
            hovered: None,
            broken_logos: HashSet::new(),
            probed_logos: HashSet::new(),
            viewport: (80, 24),
            scroll_top: 0,
            nav,
            effects: Vec::new(),
            toast_message: None,
        }
    }

    /// Read the current location and either apply it (static categories) or
    /// queue category discovery and apply it once that finishes.
    pub fn start(&mut self) {
        let route = router::parse(&self.nav.current());
        log::info!("[app] start at {:?}", route);
        match self.source.clone() {
            CategorySource::Static(table) => {
                self.categories = table;
                self.categories_state = CategoriesState::Ready;
                self.apply_route(route);
            }
            CategorySource::Discovered { listing_url, raw_base_url } => {
                self.pending_route = Some(route);
                self.categories_state = CategoriesState::Pending;
                self.effects.push(Effect::DiscoverCategories { listing_url, raw_base_url });
            }
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn categories(&self) -> &[Category] { &self.categories }
    pub fn categories_state(&self) -> CategoriesState { self.categories_state }
    pub fn category(&self) -> Option<&str> { self.category.as_deref() }
    pub fn tokens(&self) -> &[Token] { &self.tokens }
    pub fn filtered_len(&self) -> usize { self.filtered.len() }
    pub fn search(&self) -> &str { &self.search }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn loading(&self) -> bool { self.loading }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn request_seq(&self) -> u64 { self.request_seq }
    pub fn scroll_top(&self) -> u32 { self.scroll_top }
    pub fn viewport(&self) -> (u32, u32) { self.viewport }
    pub fn layout(&self) -> GridLayout { self.opts.layout }
    pub fn render_mode(&self) -> RenderMode { self.opts.render_mode }
    pub fn match_mode(&self) -> MatchMode { self.opts.match_mode }
    pub fn loaded_at(&self) -> Option<chrono::DateTime<chrono::Local>> { self.loaded_at }
    pub fn route_path(&self) -> String { self.nav.current() }

    /// Token at a position of the filtered view.
    pub fn filtered_token(&self, pos: usize) -> Option<&Token> {
        self.filtered.get(pos).and_then(|&i| self.tokens.get(i))
    }

    pub fn filtered_tokens(&self) -> impl Iterator<Item = &Token> {
        self.filtered.iter().filter_map(|&i| self.tokens.get(i))
    }

    /// Position of the hovered token in the filtered view.
    pub fn hovered(&self) -> Option<usize> {
        let src = self.hovered?;
        self.filtered.iter().position(|&i| i == src)
    }

    pub fn hovered_token(&self) -> Option<&Token> {
        self.hovered.and_then(|i| self.tokens.get(i))
    }

    pub fn columns(&self) -> usize {
        self.opts.layout.columns(self.viewport.0)
    }

    /// Number of placeholder tiles to draw (only while a fetch is pending).
    pub fn skeleton_count(&self) -> usize {
        if self.loading { grid_consts::SKELETON_TILES } else { 0 }
    }

    /// Filtered positions that should be materialized for display.
    pub fn tile_window(&self) -> Range<usize> {
        let count = self.filtered.len();
        match self.opts.render_mode {
            RenderMode::Grid => 0..count,
            RenderMode::Virtual => self.opts.layout.visible_range(
                count,
                self.columns(),
                self.viewport.1,
                self.scroll_top,
            ),
        }
    }

    pub fn heading(&self) -> String {
        if self.categories_state == CategoriesState::Failed
            || (self.categories_state == CategoriesState::Ready && self.categories.is_empty())
        {
            return messages::NO_CATEGORIES.to_string();
        }
        let Some(category) = self.category.as_deref() else {
            return "Loading categories...".to_string();
        };
        if self.loading {
            format!("Loading {category} tokens...")
        } else if let Some(err) = &self.error {
            err.clone()
        } else if self.filtered.is_empty() {
            messages::NO_TOKENS.to_string()
        } else {
            format!("{category} Tokens")
        }
    }

    /// Logo to display for a token: its own, or the placeholder when missing or broken.
    pub fn logo_src<'a>(&self, token: &'a Token) -> &'a str {
        match token.logo() {
            Some(url) if !self.broken_logos.contains(url) => url,
            _ => feeds::DEFAULT_TOKEN_IMAGE,
        }
    }

    pub fn is_logo_fallback(&self, token: &Token) -> bool {
        self.logo_src(token) == feeds::DEFAULT_TOKEN_IMAGE
    }

    /// Drain pending async work for the host to run.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ----- toast -----
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        const TOAST_DURATION: Duration = Duration::from_secs(app_consts::TOAST_DURATION_SECS);
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    // ----- routing -----

    /// Apply a route read from the location (load, back/forward). Never pushes.
    pub fn apply_route(&mut self, route: Route) {
        match categories::resolve(route.category.as_deref(), &self.categories) {
            Resolution::Found(name) => {
                let search = route.search.unwrap_or_default();
                if route.category.as_deref() != Some(name.as_str()) {
                    // matched case-insensitively; canonicalize the address
                    self.nav.replace(&router::to_path(&name, &search));
                }
                self.show(name, search);
            }
            Resolution::Redirect(name) => {
                log::info!("[router] {:?} is not a known category; redirecting to {name}", route.category);
                self.nav.replace(&router::to_path(&name, ""));
                self.show(name, String::new());
            }
            Resolution::Unavailable => {
                log::warn!("[router] no categories to show for {:?}", route);
                self.category = None;
                self.tokens.clear();
                self.loading = false;
                self.refilter();
            }
        }
    }

    /// Location changed outside the app (popstate, history stepping).
    pub fn on_location_changed(&mut self, path: &str) {
        let route = router::parse(path);
        if self.categories_state == CategoriesState::Pending {
            self.pending_route = Some(route);
        } else {
            self.apply_route(route);
        }
    }

    pub fn navigate_back(&mut self) {
        if let Some(path) = self.nav.back() {
            self.on_location_changed(&path);
        }
    }

    pub fn navigate_forward(&mut self) {
        if let Some(path) = self.nav.forward() {
            self.on_location_changed(&path);
        }
    }

    fn show(&mut self, name: String, search: String) {
        if self.category.as_deref() != Some(name.as_str()) {
            self.begin_fetch(name);
        }
        self.search = search;
        self.hovered = None;
        self.scroll_top = 0;
        self.refilter();
    }

    fn begin_fetch(&mut self, name: String) {
        let Some(url) = categories::find(&self.categories, &name).map(|c| c.url.clone()) else {
            log::warn!("[app] no feed URL for category {name}");
            return;
        };
        self.request_seq += 1;
        self.loading = true;
        self.error = None;
        self.tokens.clear();
        self.effects.push(Effect::FetchTokens {
            seq: self.request_seq,
            category: name.clone(),
            url,
        });
        self.category = Some(name);
    }

    // ----- categories -----

    /// User picked a category: clears the search and pushes `/{category}`.
    pub fn select_category(&mut self, name: &str) {
        let Some(c) = categories::find(&self.categories, name) else {
            log::warn!("[app] unknown category {name}");
            return;
        };
        let name = c.name.clone();
        self.input_mode = InputMode::Normal;
        self.nav.push(&router::to_path(&name, ""));
        self.show(name, String::new());
    }

    pub fn select_category_index(&mut self, index: usize) {
        if let Some(name) = self.categories.get(index).map(|c| c.name.clone()) {
            self.select_category(&name);
        }
    }

    fn category_index(&self) -> Option<usize> {
        let current = self.category.as_deref()?;
        self.categories.iter().position(|c| c.name == current)
    }

    pub fn next_category(&mut self) {
        if self.categories.is_empty() { return; }
        let idx = self.category_index().map(|i| (i + 1) % self.categories.len()).unwrap_or(0);
        self.select_category_index(idx);
    }

    pub fn prev_category(&mut self) {
        if self.categories.is_empty() { return; }
        let len = self.categories.len();
        let idx = self.category_index().map(|i| (i + len - 1) % len).unwrap_or(0);
        self.select_category_index(idx);
    }

    // ----- search -----
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_add_char(&mut self, ch: char) {
        self.search.push(ch);
        self.refilter();
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.refilter();
    }

    /// Replace the whole search text (web input events).
    pub fn set_search(&mut self, text: String) {
        self.search = text;
        self.refilter();
    }

    /// Commit the search: leave input mode and push `/{category}/{term}`.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.refilter();
        if let Some(category) = self.category.as_deref() {
            let path = router::to_path(category, self.search.trim());
            self.nav.push(&path);
        }
    }

    /// Leave the search box without committing.
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Drop the term entirely and return to `/{category}`.
    pub fn clear_search(&mut self) {
        if self.search.is_empty() { return; }
        self.search.clear();
        self.refilter();
        if let Some(category) = self.category.as_deref() {
            let path = router::to_path(category, "");
            self.nav.push(&path);
        }
    }

    fn refilter(&mut self) {
        self.compiled = compile_filter(&self.search, self.opts.match_mode);
        self.filtered = filter_indices(&self.tokens, &self.compiled);
        // Hover follows the token; drop it once the token is filtered out
        if let Some(src) = self.hovered {
            if !self.filtered.contains(&src) {
                self.hovered = None;
            }
        }
        self.clamp_scroll();
    }

    // ----- events -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.quit = true,
            AppEvent::TokensLoaded { seq, category, result } => {
                if seq != self.request_seq {
                    log::debug!(
                        "[app] dropping stale response #{seq} for {category} (latest #{})",
                        self.request_seq
                    );
                    return;
                }
                self.loading = false;
                self.loaded_at = Some(chrono::Local::now());
                match result {
                    Ok(FeedOutcome::Tokens(tokens)) => {
                        log::info!("[app] {} tokens loaded for {category}", tokens.len());
                        self.tokens = tokens;
                        self.error = None;
                    }
                    Ok(FeedOutcome::Empty) => {
                        log::info!("[app] feed for {category} is empty");
                        self.tokens.clear();
                        self.error = None;
                    }
                    Err(e) => {
                        log::error!("[app] fetching {category} failed: {e}");
                        self.tokens.clear();
                        self.error = Some(messages::FETCH_FAILED.to_string());
                    }
                }
                self.hovered = None;
                self.refilter();
            }
            AppEvent::CategoriesLoaded(Ok(list)) => {
                log::info!("[app] discovered {} categories", list.len());
                self.categories = list;
                self.categories_state = if self.categories.is_empty() {
                    CategoriesState::Failed
                } else {
                    CategoriesState::Ready
                };
                let route = self.pending_route.take().unwrap_or_default();
                if self.categories_state == CategoriesState::Ready {
                    self.apply_route(route);
                }
            }
            AppEvent::CategoriesLoaded(Err(e)) => {
                log::error!("[app] category discovery failed: {e}");
                self.categories_state = CategoriesState::Failed;
                self.pending_route = None;
            }
            AppEvent::LogoProbed { url, ok } => {
                if !ok {
                    log::debug!("[app] logo unreachable: {url}");
                    self.broken_logos.insert(url);
                }
            }
        }
    }

    // ----- hover / selection -----
    pub fn hover(&mut self, pos: Option<usize>) {
        self.hovered = pos.and_then(|p| self.filtered.get(p).copied());
        if !self.opts.probe_logos {
            return;
        }
        let url = self
            .hovered_token()
            .and_then(|t| t.logo())
            .map(str::to_string);
        if let Some(url) = url {
            if self.probed_logos.insert(url.clone()) {
                self.effects.push(Effect::ProbeLogo { url });
            }
        }
    }

    /// Hover whatever tile sits under a point relative to the grid origin.
    pub fn hover_at(&mut self, x: u32, y: u32) {
        let pos = self.opts.layout.hit_test(
            x,
            y,
            self.columns(),
            self.filtered.len(),
            self.scroll_top,
        );
        if pos != self.hovered() {
            self.hover(pos);
        }
    }

    /// Keyboard movement across the grid; rows move by the column count.
    pub fn move_hover(&mut self, dx: isize, dy: isize) {
        let count = self.filtered.len();
        if count == 0 { return; }
        let cols = self.columns() as isize;
        let next = match self.hovered() {
            None => 0,
            Some(cur) => (cur as isize + dx + dy * cols).clamp(0, count as isize - 1) as usize,
        };
        self.hover(Some(next));
        self.reveal(next);
    }

    pub fn hover_first(&mut self) {
        if !self.filtered.is_empty() {
            self.hover(Some(0));
            self.reveal(0);
        }
    }

    pub fn hover_last(&mut self) {
        if let Some(last) = self.filtered.len().checked_sub(1) {
            self.hover(Some(last));
            self.reveal(last);
        }
    }

    fn reveal(&mut self, pos: usize) {
        self.scroll_top = self.opts.layout.scroll_to_reveal(
            pos,
            self.columns(),
            self.viewport.1,
            self.scroll_top,
        );
        self.clamp_scroll();
    }

    /// Image at `url` failed to load in the renderer; every token using it
    /// falls back from now on.
    pub fn mark_logo_broken(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() || url == feeds::DEFAULT_TOKEN_IMAGE {
            return;
        }
        log::debug!("[app] logo failed to load: {url}");
        self.broken_logos.insert(url.to_string());
    }

    /// Contract address of the hovered token (copy target).
    pub fn copy_content(&self) -> Option<String> {
        self.hovered_token().map(|t| t.address.clone())
    }

    // ----- viewport -----

    /// Grid area size from the renderer; columns follow the width.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if self.viewport != (width, height) {
            self.viewport = (width, height);
            self.clamp_scroll();
        }
    }

    pub fn scroll_to(&mut self, top: u32) {
        self.scroll_top = top;
        self.clamp_scroll();
    }

    pub fn page_down(&mut self) {
        let step = self.viewport.1.max(self.opts.layout.row_stride());
        self.scroll_to(self.scroll_top.saturating_add(step));
    }

    pub fn page_up(&mut self) {
        let step = self.viewport.1.max(self.opts.layout.row_stride());
        self.scroll_to(self.scroll_top.saturating_sub(step));
    }

    fn clamp_scroll(&mut self) {
        let max = self.opts.layout.max_scroll(self.filtered.len(), self.columns(), self.viewport.1);
        self.scroll_top = self.scroll_top.min(max);
    }
}
