// Modal UI components.
// Small centered prompts for filter and go-to-page input.

use ratatui::{prelude::*, widgets::*};

/// Draw a single-line input prompt on top of the current view.
pub fn draw_prompt(frame: &mut Frame, title: &str, label: &str, input: &str, help: &str) {
    let area = frame.area();

    // Create centered modal
    let modal_width = 50.min(area.width);
    let modal_height = 5.min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
            Span::raw(input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Yellow)),
            Span::styled(format!(" = {}  ", help), Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let prompt = Paragraph::new(lines).block(block);
    frame.render_widget(prompt, modal_area);
}
