// Console tab rendering.
// Shows the activity log with level-colored entries.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::console::ConsoleLevel;

/// Draw the Console tab content.
pub fn draw_console_tab(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" console ");

    if app.console.messages.is_empty() {
        let placeholder = Paragraph::new("No activity yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = app
        .console
        .messages
        .iter()
        .map(|message| {
            let (marker, style) = match message.level {
                ConsoleLevel::Info => ("INFO ", Style::default().fg(Color::Gray)),
                ConsoleLevel::Warn => ("WARN ", Style::default().fg(Color::Yellow)),
                ConsoleLevel::Error => ("ERROR", Style::default().fg(Color::Red)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    message.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(marker, style.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(message.message.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
