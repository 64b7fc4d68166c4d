// Native binary for tokensnap - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use tokensnap::{
    app::{App, AppOptions, InputMode},
    config::load,
    effects::run_effect,
    nav::MemoryHistory,
    platform, router,
    theme::ColorScheme,
    types::AppEvent,
    ui, HttpFeed,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    init_logging()?;

    let cfg = load().context("Failed to load configuration")?;
    cfg.print_summary();

    let feed = Arc::new(HttpFeed::new(cfg.http_timeout_ms)?);

    // Deep link from CLI args seeds the history, e.g. ./tokensnap /Arbitrum/usdc
    let initial_path = cfg
        .initial_route
        .as_deref()
        .map(|raw| router::parse(raw).to_path())
        .unwrap_or_else(|| "/".to_string());
    log::info!("[main] starting at {initial_path}");

    let mut app = App::new(
        cfg.category_source.clone(),
        AppOptions::from_config(&cfg, AppOptions::tui_layout()),
        Box::new(MemoryHistory::new(initial_path)),
    );
    app.start();

    // terminal
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, rx) = unbounded_channel::<AppEvent>();
    let colors = cfg.theme.colors();

    // main loop
    let result = run_loop(&mut app, &mut terminal, rx, tx, feed, &colors, cfg.render_fps).await;

    // cleanup
    execute!(terminal.backend_mut(), DisableMouseCapture)?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// The TUI owns stdout, so log lines go to a file.
fn init_logging() -> Result<()> {
    let path = std::env::var("TOKENSNAP_LOG").unwrap_or_else(|_| "tokensnap.log".into());
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Restore the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn spawn_effects(app: &mut App, feed: &Arc<HttpFeed>, tx: &UnboundedSender<AppEvent>) {
    for effect in app.take_effects() {
        let feed = Arc::clone(feed);
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = run_effect(feed.as_ref(), effect).await;
            // Receiver gone means the UI already quit
            let _ = tx.send(ev);
        });
    }
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
    feed: Arc<HttpFeed>,
    colors: &ColorScheme,
    render_fps: u32,
) -> Result<()> {
    let mut last_frame = Instant::now();
    let mut mouse_enabled = true;
    let mut grid_area = Rect::default();
    let frame_ms = 1000u32.saturating_div(render_fps.max(1)) as u64;
    let budget = Duration::from_millis(frame_ms.max(1));

    spawn_effects(app, &feed, &tx);

    loop {
        // frame budget (coalesced renders)
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or fetch results
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) => {
                    if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                        if let (KeyCode::Char('m'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
                            mouse_enabled = !mouse_enabled;
                            if mouse_enabled {
                                execute!(terminal.backend_mut(), EnableMouseCapture)?;
                                app.show_toast("Mouse enabled (Ctrl+M to disable)".to_string());
                            } else {
                                execute!(terminal.backend_mut(), DisableMouseCapture)?;
                                app.hover(None);
                                app.show_toast("Mouse disabled".to_string());
                            }
                        } else {
                            handle_key(app, k);
                        }
                    }
                }
                Event::Mouse(m) => {
                    if mouse_enabled {
                        handle_mouse(app, m, grid_area);
                    }
                }
                _ => {}
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }
        spawn_effects(app, &feed, &tx);

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| grid_area = ui::draw(f, app, colors))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, grid: Rect) {
    let inside = mouse.column >= grid.x
        && mouse.column < grid.x + grid.width
        && mouse.row >= grid.y
        && mouse.row < grid.y + grid.height;
    let step = app.layout().row_stride();
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Down(MouseButton::Left) => {
            if inside {
                app.hover_at((mouse.column - grid.x) as u32, (mouse.row - grid.y) as u32);
            } else {
                app.hover(None);
            }
        }
        MouseEventKind::ScrollUp => app.scroll_to(app.scroll_top().saturating_sub(step)),
        MouseEventKind::ScrollDown => app.scroll_to(app.scroll_top().saturating_add(step)),
        _ => {}
    }
}

fn handle_key(app: &mut App, k: KeyEvent) {
    // Search input mode: filter live, Enter commits to the route
    if app.input_mode() == InputMode::Search {
        match (k.code, k.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.on_event(AppEvent::Quit),
            (KeyCode::Char(c), _) => app.search_add_char(c),
            (KeyCode::Backspace, _) => app.search_backspace(),
            (KeyCode::Enter, _) => app.submit_search(),
            (KeyCode::Esc, _) => app.cancel_search(),
            _ => {}
        }
        return;
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }

        // History
        (KeyCode::Left, KeyModifiers::ALT) => app.navigate_back(),
        (KeyCode::Right, KeyModifiers::ALT) => app.navigate_forward(),

        // Categories
        (KeyCode::Tab, _) | (KeyCode::Char(']'), _) => app.next_category(),
        (KeyCode::BackTab, _) | (KeyCode::Char('['), _) => app.prev_category(),
        (KeyCode::Char(d @ '1'..='9'), _) => {
            app.select_category_index(d as usize - '1' as usize);
        }

        // Hover movement across the grid
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.move_hover(0, -1),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.move_hover(0, 1),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.move_hover(-1, 0),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.move_hover(1, 0),
        (KeyCode::Home, _) => app.hover_first(),
        (KeyCode::End, _) => app.hover_last(),
        (KeyCode::PageUp, _) => app.page_up(),
        (KeyCode::PageDown, _) => app.page_down(),

        (KeyCode::Char('/'), _) | (KeyCode::Char('f'), _) => app.start_search(),
        (KeyCode::Esc, _) => {
            if app.hovered().is_some() {
                app.hover(None);
            } else {
                app.clear_search();
            }
        }
        (KeyCode::Char('c'), _) => match app.copy_content() {
            Some(address) => {
                platform::copy_with_toast(app, &address);
            }
            None => app.show_toast("Hover a token to copy its address".to_string()),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensnap::categories::{Category, CategorySource};

    fn app() -> App {
        let table = vec![Category::new("Ethereum", "https://feeds.test/ethereum.json")];
        let mut app = App::new(
            CategorySource::Static(table),
            AppOptions::default(),
            Box::new(MemoryHistory::new("/Ethereum")),
        );
        app.start();
        app
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key(app, KeyEvent::new(code, modifiers));
    }

    #[test]
    fn ctrl_c_quits_while_searching() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(app.input_mode(), InputMode::Search);

        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.quit_flag());
        assert_eq!(app.search(), "");
    }

    #[test]
    fn plain_keys_type_into_search() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(app.search(), "cQ");
        assert!(!app.quit_flag());
    }
}
