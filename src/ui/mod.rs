// UI module for rendering the TUI.
// Contains widgets for tabs, the search bar, profile, repository list and console.

mod list;
mod modal;
mod profile;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode, Tab, View};
use crate::state::ConsoleLevel;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);

    match app.view.clone() {
        View::Error { title, message } => draw_error_view(frame, &title, &message, chunks[2]),
        View::Main => draw_content(frame, app, chunks[2]),
    }

    draw_status_bar(frame, app, chunks[3]);

    match app.input_mode {
        InputMode::Filter => {
            modal::draw_prompt(frame, "Filter Repositories", "Filter", &app.input, "Apply")
        }
        InputMode::GoToPage => modal::draw_prompt(
            frame,
            "Go to Page",
            &format!("Page (1-{})", app.profile.pager.total_pages()),
            &app.input,
            "Go",
        ),
        InputMode::Search | InputMode::Normal => {}
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        Tab::Profile => profile::draw_profile(frame, &app.profile, area),
        Tab::Repositories => list::render_repo_list(frame, &mut app.profile, area),
        Tab::Console => draw_console_tab(frame, app, area),
    }
}

/// Draw the username input, or the current username when not editing.
fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Search;

    let line = if editing {
        Line::from(vec![
            Span::styled("User: ", Style::default().fg(Color::Yellow)),
            Span::raw(&app.input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else {
        match &app.profile.username {
            Some(username) => Line::from(vec![
                Span::styled("User: ", Style::default().fg(Color::DarkGray)),
                Span::styled(username, Style::default().fg(Color::Cyan)),
            ]),
            None => Line::from(Span::styled(
                "Press / to search for a GitHub user",
                Style::default().fg(Color::DarkGray),
            )),
        }
    };

    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Search ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Draw the error screen shown after authentication failures.
fn draw_error_view(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let mut lines: Vec<Line> = message
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Red))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc to go back or / to search again",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {} ", title));
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(text, area);
}

/// Draw the Console tab with activity and error messages.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
    } else {
        // Show newest messages first (reverse order)
        let items: Vec<ListItem> = app
            .console
            .messages
            .iter()
            .rev()
            .map(|msg| {
                let (icon, color) = match msg.level {
                    ConsoleLevel::Error => ("❌", Color::Red),
                    ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                    ConsoleLevel::Info => ("ℹ️", Color::Cyan),
                };

                let time = list::format_relative_time(&msg.timestamp);

                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", icon)),
                    Span::styled(time, Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(msg.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
    }
}

/// Draw the status bar with keybinding hints, page position and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::raw(k);
    let hint = |h: &'static str| Span::styled(h, Style::default().fg(Color::DarkGray));

    let mut spans = if app.input_mode == InputMode::Search {
        vec![
            key(" ↵ "),
            hint("Search"),
            key("  Esc "),
            hint("Cancel"),
        ]
    } else if app.active_tab == Tab::Repositories && app.view == View::Main {
        vec![
            key(" ←→ "),
            hint("Page"),
            key("  ↑↓ "),
            hint("Select"),
            key("  g "),
            hint("Go to"),
            key("  f "),
            hint("Filter"),
            key("  o "),
            hint("Sort"),
            key("  +/- "),
            hint("Page size"),
            key("  ? "),
            hint("Help"),
            key("  q "),
            hint("Quit"),
        ]
    } else {
        vec![
            key(" / "),
            hint("Search"),
            key("  Tab "),
            hint("Switch"),
            key("  r "),
            hint("Refresh"),
            key("  ? "),
            hint("Help"),
            key("  q "),
            hint("Quit"),
        ]
    };

    if app.active_tab == Tab::Repositories && app.profile.repos.is_loaded() {
        if let Some((start, end)) = app.profile.pager.page_range() {
            spans.push(Span::styled(
                format!("  {}-{} of {}", start, end, app.profile.pager.len()),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    let rate = app.client.rate_limit();
    if rate.limit > 0 {
        let rate_color = if rate.remaining < 10 {
            Color::Red
        } else if rate.remaining < 100 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        spans.push(Span::styled(
            format!("  API: {}/{}", rate.remaining, rate.limit),
            Style::default().fg(rate_color),
        ));
    }
    let (capacity, ttl) = app.client.cache_limits();
    let mut cache_info = format!("  cached: {}", app.client.cached_responses());
    if let Some(capacity) = capacity {
        cache_info.push_str(&format!("/{}", capacity));
    }
    match ttl {
        Some(ttl) => cache_info.push_str(&format!(" (ttl {}s)", ttl.as_secs())),
        None => cache_info.push_str(" (no expiry)"),
    }
    spans.push(Span::styled(cache_info, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 55.min(area.width);
    let popup_height = 22.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let bindings = [
        ("  / or s        ", "Search for a user"),
        ("  Tab/Shift-Tab ", "Switch tabs"),
        ("  ←/→ or h/l    ", "Previous/next page"),
        ("  Home/End      ", "First/last page"),
        ("  g             ", "Go to page"),
        ("  ↑/↓ or k/j    ", "Move selection"),
        ("  Enter         ", "Show repository URL in console"),
        ("  f             ", "Filter repositories"),
        ("  o             ", "Cycle sort order"),
        ("  +/-           ", "Change page size"),
        ("  r             ", "Refresh, bypassing the cache"),
        ("  c             ", "Clear console"),
        ("  Esc           ", "Close prompt / leave error view"),
        ("  ?             ", "Show/hide this help"),
        ("  q             ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(bindings.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(*keys, Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
