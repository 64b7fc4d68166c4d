use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect},
    widgets::{Block, Borders, BorderType, Paragraph, Clear},
    style::{Style, Modifier},
    text::{Line, Span},
};
use crate::app::{App, InputMode};
use crate::constants::{app::TITLE, feeds::DEFAULT_TOKEN_IMAGE};
use crate::filter::MatchMode;
use crate::theme::ColorScheme;

// ===============================
// Top-level draw
// ===============================

/// Draw the whole screen and return the grid area so the host can map
/// mouse positions back to tiles.
pub fn draw(f:&mut Frame, app:&mut App, colors:&ColorScheme) -> Rect {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(colors.panel.color())), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // title
            Constraint::Length(3),  // search box
            Constraint::Length(1),  // category tabs
            Constraint::Length(1),  // heading
            Constraint::Min(0),     // tiles
            Constraint::Length(1),  // footer
        ])
        .split(area);

    header(f, chunks[0], app, colors);
    search_bar(f, chunks[1], app, colors);
    category_tabs(f, chunks[2], app, colors);
    heading(f, chunks[3], app, colors);

    let grid_area = chunks[4];
    app.set_viewport(grid_area.width as u32, grid_area.height as u32);
    tiles(f, grid_area, app, colors);
    footer(f, chunks[5], app, colors);

    // Overlays render last
    if app.hovered_token().is_some() {
        draw_tooltip(f, grid_area, app, colors);
    }
    if app.toast_message().is_some() {
        draw_toast_modal(f, app, colors);
    }
    grid_area
}

// ===============================
// Header / Search / Categories
// ===============================
fn header(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let line = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(colors.accent.color()).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.route_path(), Style::default().fg(colors.text_dim.color())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn search_bar(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let focused = app.input_mode() == InputMode::Search;
    let text = app.search();

    let border_color = if focused { colors.focus } else { colors.tile_border };
    let hint = search_hint(app.match_mode());
    let (shown, style) = if text.is_empty() && !focused {
        (hint, Style::default().fg(colors.text_dim.color()))
    } else {
        (text, Style::default().fg(colors.text.color()))
    };

    let paragraph = Paragraph::new(shown)
        .style(style)
        .block(Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color.color())));
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        // Cursor inside the input box
        let x = area.x + 1 + (text.chars().count().min((area.width.saturating_sub(2)) as usize) as u16);
        let y = area.y + 1;
        f.set_cursor_position((x, y));
    }
}

fn category_tabs(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let active = app.category();
    let mut spans = Vec::new();
    for (i, c) in app.categories().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(colors.text_dim.color())));
        }
        let style = if Some(c.name.as_str()) == active {
            Style::default().fg(colors.focus.color()).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(colors.text.color())
        };
        spans.push(Span::styled(c.name.clone(), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn heading(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let color = if app.error().is_some() { colors.error } else { colors.accent };
    let p = Paragraph::new(app.heading())
        .style(Style::default().fg(color.color()).add_modifier(Modifier::BOLD));
    f.render_widget(p, area);
}

// ===============================
// Tiles
// ===============================
fn tiles(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let layout = app.layout();
    let columns = app.columns();

    if app.skeleton_count() > 0 {
        for i in 0..app.skeleton_count() {
            let Some(rect) = tile_rect(area, app, i, columns, 0) else { continue };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors.skeleton.color()))
                .style(Style::default().bg(colors.skeleton.color()));
            f.render_widget(block, rect);
        }
        return;
    }

    let hovered = app.hovered();
    let inner_w = layout.tile_w.saturating_sub(2) as usize;
    for pos in app.tile_window() {
        let Some(token) = app.filtered_token(pos) else { continue };
        let Some(rect) = tile_rect(area, app, pos, columns, app.scroll_top()) else { continue };

        let is_hovered = hovered == Some(pos);
        let border = if is_hovered { colors.focus } else { colors.tile_border };
        let logo_mark = if app.is_logo_fallback(token) { "?" } else { "◉" };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{logo_mark} "), Style::default().fg(colors.text_dim.color())),
                Span::styled(truncate(&token.symbol, inner_w.saturating_sub(2)), Style::default().fg(colors.text.color()).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(truncate(&token.name, inner_w), Style::default().fg(colors.text_dim.color()))),
        ];
        let p = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(if is_hovered { BorderType::Thick } else { BorderType::Rounded })
                .border_style(Style::default().fg(border.color())),
        );
        f.render_widget(p, rect);
    }
}

/// Screen rect for tile `index`, clipped to `area`. Tiles scrolled above the
/// top edge or left with less than a bordered row are skipped.
fn tile_rect(area:Rect, app:&App, index:usize, columns:usize, scroll_top:u32) -> Option<Rect> {
    let layout = app.layout();
    let cell = layout.cell(index, columns);
    let top = cell.row as u32 * layout.row_stride();
    if top < scroll_top {
        return None;
    }
    let y = top - scroll_top;
    let x = cell.col as u32 * layout.col_stride();
    if y + 2 > area.height as u32 || x + layout.tile_w > area.width as u32 {
        return None;
    }
    let height = layout.tile_h.min(area.height as u32 - y);
    Some(Rect {
        x: area.x + x as u16,
        y: area.y + y as u16,
        width: layout.tile_w as u16,
        height: height as u16,
    })
}

// ===============================
// Footer / Overlays
// ===============================
fn footer(f:&mut Frame, area:Rect, app:&App, colors:&ColorScheme){
    let key = Style::default().fg(colors.focus.color());
    let dim = Style::default().fg(colors.text_dim.color());
    let mut spans = vec![
        Span::styled("Tab", key), Span::styled(" network  ", dim),
        Span::styled("/", key), Span::styled(" search  ", dim),
        Span::styled("←↑↓→", key), Span::styled(" hover  ", dim),
        Span::styled("c", key), Span::styled(" copy  ", dim),
        Span::styled("Alt+←/→", key), Span::styled(" history  ", dim),
        Span::styled("q", key), Span::styled(" quit", dim),
    ];
    if !app.loading() && app.category().is_some() {
        spans.push(Span::styled(
            format!("   {} of {} tokens", app.filtered_len(), app.tokens().len()),
            dim,
        ));
    }
    if let Some(at) = app.loaded_at() {
        spans.push(Span::styled(format!("  (loaded {})", at.format("%H:%M:%S")), dim));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Name, logo URL, and contract address of the hovered token, docked to the
/// bottom of the grid.
fn draw_tooltip(f:&mut Frame, grid:Rect, app:&App, colors:&ColorScheme){
    let Some(token) = app.hovered_token() else { return };
    if grid.height < 5 {
        return;
    }
    let height = 5;
    let overlay = Rect { x: grid.x, y: grid.y + grid.height - height, width: grid.width, height };
    f.render_widget(Clear, overlay);

    let inner_w = grid.width.saturating_sub(12) as usize;
    let label = Style::default().fg(colors.text_dim.color());
    let lines = vec![
        Line::from(vec![Span::styled("Name     ", label), Span::styled(truncate(&token.name, inner_w), Style::default().fg(colors.text.color()).add_modifier(Modifier::BOLD))]),
        Line::from(vec![Span::styled("Logo     ", label), Span::styled(truncate(token.logo().unwrap_or(DEFAULT_TOKEN_IMAGE), inner_w), Style::default().fg(colors.link.color()).add_modifier(Modifier::UNDERLINED))]),
        Line::from(vec![Span::styled("Address  ", label), Span::styled(truncate(&token.address, inner_w), Style::default().fg(colors.text.color()))]),
    ];
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" {} ", token.symbol))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.focus.color()))
            .style(Style::default().bg(colors.panel.color())),
    );
    f.render_widget(p, overlay);
}

fn draw_toast_modal(f: &mut Frame, app: &App, colors:&ColorScheme) {
    let message = app.toast_message().unwrap_or("");

    // Small centered box (40% width, 3 lines height)
    let area = f.area();
    let width = (area.width * 4) / 10;
    let height = 3;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let overlay = Rect { x, y, width, height };

    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.accent.color()));

    let text = Paragraph::new(format!("✓ {message}"))
        .style(Style::default().fg(colors.accent.color()).add_modifier(Modifier::BOLD))
        .block(block);

    f.render_widget(text, overlay);
}

// ===============================
// Helpers
// ===============================
fn search_hint(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::Substring => "Search by symbol, name, or address (press /)",
        MatchMode::Prefix => "Search by symbol or chain id prefix (press /)",
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{head}...")
}
