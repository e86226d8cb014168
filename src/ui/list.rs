// Repository list rendering.
// Shows the current page of repositories with loading, error and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::{LoadingState, ProfileState};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 365 {
        format!("{}y ago", duration.num_days() / 365)
    } else if duration.num_days() > 30 {
        format!("{}mo ago", duration.num_days() / 30)
    } else if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Title with page position, sort order and filter.
fn list_title(state: &ProfileState) -> String {
    let pager = &state.pager;
    let mut title = format!(
        " Repositories [page {}/{}] sort: {} ",
        if pager.is_empty() { 0 } else { pager.current_page() },
        pager.total_pages(),
        state.filter.sort.title()
    );
    if state.filter.is_active() {
        title.push_str(&format!(
            "filter: \"{}\" ({}/{}) ",
            state.filter.query(),
            pager.len(),
            state.total_repos()
        ));
    }
    title
}

/// Render the current page of repositories.
pub fn render_repo_list(frame: &mut Frame, state: &mut ProfileState, area: Rect) {
    match &state.repos {
        LoadingState::Idle => render_empty(frame, area, "Press / to search for a user"),
        LoadingState::Loading => render_loading(frame, area, "Loading repositories"),
        LoadingState::Error(e) => render_error(frame, area, e),
        LoadingState::Loaded(all) => {
            if all.is_empty() {
                render_empty(frame, area, "No public repositories");
                return;
            }
            if state.pager.is_empty() {
                render_empty(frame, area, "No repositories match the filter");
                return;
            }

            let items: Vec<ListItem> = state
                .pager
                .displayed_items()
                .iter()
                .map(|repo| {
                    let mut spans = vec![
                        Span::styled(repo.name.clone(), Style::default().fg(Color::Cyan)),
                        Span::styled(
                            format!("  ★ {}", repo.stars),
                            Style::default().fg(Color::Yellow),
                        ),
                    ];

                    if let Some(language) = &repo.language {
                        spans.push(Span::styled(
                            format!("  {}", language),
                            Style::default().fg(Color::Magenta),
                        ));
                    }

                    spans.push(Span::styled(
                        format!("  {}", format_relative_time(&repo.updated_at)),
                        Style::default().fg(Color::DarkGray),
                    ));

                    if repo.fork {
                        spans.push(Span::styled("  fork", Style::default().fg(Color::Blue)));
                    }
                    if repo.archived {
                        spans.push(Span::styled(
                            "  archived",
                            Style::default().fg(Color::Red),
                        ));
                    }

                    let mut lines = vec![Line::from(spans)];

                    let mut detail = repo.description.clone().unwrap_or_default();
                    if !repo.topics.is_empty() {
                        if !detail.is_empty() {
                            detail.push_str("  ");
                        }
                        detail.push_str(&format!("[{}]", repo.topics.join(", ")));
                    }
                    if !detail.is_empty() {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", detail),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }

                    ListItem::new(lines)
                })
                .collect();

            let list_widget = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(list_title(state)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(list_widget, area, &mut state.list_state);
        }
    }
}
