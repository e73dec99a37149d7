// Experience tab rendering.
// Maps the typing engine's rendered blocks onto styled terminal lines,
// keeping the viewport scrolled to the newest output.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::terminal::{SegmentKind, TermBlock};

/// Draw the Experience tab content.
pub fn draw_experience_tab(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" experience ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = terminal_lines(app.engine.blocks());

    // Follow the newest line once the content outgrows the viewport.
    let overflow = lines.len().saturating_sub(inner.height as usize);
    let paragraph = Paragraph::new(lines).scroll((overflow as u16, 0));
    frame.render_widget(paragraph, inner);
}

fn terminal_lines(blocks: &[TermBlock]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            TermBlock::Command(command) => {
                lines.push(Line::from(vec![
                    Span::styled("$ ", Style::default().fg(Color::Green)),
                    Span::styled(
                        command.as_str(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
            TermBlock::Output(color_lines) => {
                for color_line in color_lines {
                    let spans: Vec<Span> = color_line
                        .iter()
                        .map(|segment| Span::styled(segment.text.as_str(), segment_style(segment.kind)))
                        .collect();
                    lines.push(Line::from(spans));
                }
            }
            TermBlock::Cursor => {
                lines.push(Line::styled(
                    "█",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
        }
    }
    lines
}

fn segment_style(kind: SegmentKind) -> Style {
    match kind {
        SegmentKind::Plain => Style::default().fg(Color::Gray),
        SegmentKind::Commit => Style::default().fg(Color::Yellow),
        SegmentKind::Head => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        SegmentKind::Tag => Style::default().fg(Color::Magenta),
        SegmentKind::Pipe => Style::default().fg(Color::Red),
    }
}
