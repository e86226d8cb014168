// Profile pane rendering.

use ratatui::{prelude::*, widgets::*};

use crate::models::UserProfile;
use crate::state::{LoadingState, ProfileState};

use super::list::{render_empty, render_error, render_loading};

/// Render the searched user's profile.
pub fn draw_profile(frame: &mut Frame, state: &ProfileState, area: Rect) {
    match &state.user {
        LoadingState::Idle => render_empty(frame, area, "Press / to search for a GitHub user"),
        LoadingState::Loading => render_loading(frame, area, "Loading profile"),
        LoadingState::Error(e) => render_error(frame, area, e),
        LoadingState::Loaded(user) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", user.login));
            let text = Paragraph::new(profile_lines(user, state))
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(text, area);
        }
    }
}

fn field<'a>(label: &'a str, value: &'a str, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn profile_lines<'a>(user: &'a UserProfile, state: &ProfileState) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                user.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  @{}", user.login),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(bio) = &user.bio {
        lines.push(Line::from(Span::styled(
            bio.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    if let Some(location) = &user.location {
        lines.push(field("Location", location, Color::White));
    }
    if let Some(company) = &user.company {
        lines.push(field("Company", company, Color::White));
    }
    if let Some(blog) = &user.blog_url {
        lines.push(field("Blog", blog, Color::Blue));
    }
    if let Some(twitter) = &user.twitter {
        lines.push(field("Twitter", twitter, Color::Blue));
    }
    lines.push(field("Profile", &user.profile_url, Color::Blue));
    lines.push(field("Avatar", &user.avatar_url, Color::DarkGray));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(
            user.followers.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" followers  "),
        Span::styled(
            user.following.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" following  "),
        Span::styled(
            user.public_repos.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" public repos"),
    ]));

    lines.push(Line::from(Span::styled(
        format!("Joined {}", user.created_at.format("%Y-%m-%d")),
        Style::default().fg(Color::DarkGray),
    )));

    let repos_status = match &state.repos {
        LoadingState::Loading => "Loading repositories...".to_string(),
        LoadingState::Loaded(repos) => {
            format!("{} repositories loaded, Tab to browse", repos.len())
        }
        LoadingState::Error(e) => format!("Repositories unavailable: {}", e),
        LoadingState::Idle => String::new(),
    };
    if !repos_status.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            repos_status,
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}
