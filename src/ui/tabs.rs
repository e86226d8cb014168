// Tab bar with per-tab badges: repository count, loading markers, unread console messages.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::LoadingState;

/// Label and style for one tab.
fn tab_label(tab: Tab, app: &App) -> Line<'static> {
    let profile = &app.profile;
    let badge = match tab {
        Tab::Profile if profile.user.is_loading() => Some("…".to_string()),
        Tab::Profile => None,
        Tab::Repositories => match &profile.repos {
            LoadingState::Loading => Some("…".to_string()),
            LoadingState::Loaded(_) if profile.filter.is_active() => {
                Some(format!("{}/{}", profile.pager.len(), profile.total_repos()))
            }
            LoadingState::Loaded(repos) => Some(repos.len().to_string()),
            LoadingState::Idle | LoadingState::Error(_) => None,
        },
        Tab::Console => (app.console.unread > 0).then(|| app.console.unread.to_string()),
    };
    let alert = tab == Tab::Console && app.console.unread > 0;

    let style = match (tab == app.active_tab, alert) {
        (true, _) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().fg(Color::Red),
        (false, false) => Style::default().fg(Color::White),
    };

    let mut spans = vec![Span::styled(tab.title(), style)];
    if let Some(badge) = badge {
        let badge_color = if alert { Color::Red } else { Color::DarkGray };
        spans.push(Span::styled(
            format!(" ({})", badge),
            Style::default().fg(badge_color),
        ));
    }
    Line::from(spans)
}

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let labels: Vec<Line> = Tab::ALL.iter().map(|tab| tab_label(*tab, app)).collect();
    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == app.active_tab)
        .unwrap_or_default();

    let title = match &app.profile.username {
        Some(username) => format!(" octolook · {} ", username),
        None => " octolook ".to_string(),
    };

    let bar = Tabs::new(labels)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title)
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));

    frame.render_widget(bar, area);
}
