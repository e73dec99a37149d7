// Projects tab rendering.
// Draws skeleton placeholders, project cards, staleness warnings, and the
// two error banners.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, ProjectsView};
use crate::i18n::{self, tr};
use crate::state::feed::{ErrorKind, WarningKind};

/// Draw the Projects tab content.
pub fn draw_projects_tab(frame: &mut Frame, app: &App, area: Rect) {
    match &app.projects {
        ProjectsView::Loading { skeleton } => draw_skeleton(frame, *skeleton, area),
        ProjectsView::Cards { projects, warning } => {
            let grid_area = match warning {
                Some(kind) => {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(2), Constraint::Min(1)])
                        .split(area);
                    draw_warning(frame, app, *kind, chunks[0]);
                    chunks[1]
                }
                None => area,
            };
            draw_cards(frame, projects, grid_area);
        }
        ProjectsView::Error(kind) => draw_error(frame, app, kind, area),
        ProjectsView::Empty => draw_empty(frame, app, area),
    }
}

/// Placeholder cards shown during the minimum loading interval.
fn draw_skeleton(frame: &mut Frame, count: usize, area: Rect) {
    for (idx, cell) in grid_cells(area, count).into_iter().enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let body = Paragraph::new(vec![
            Line::raw(""),
            Line::raw("░░░░░░░░░░░░"),
            Line::raw("░░░░░░░░"),
            Line::raw("░░░░░░░░░░"),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .block(block.title(format!(" loading {} ", idx + 1)));
        frame.render_widget(body, cell);
    }
}

fn draw_cards(frame: &mut Frame, projects: &[crate::github::ProjectSummary], area: Rect) {
    for (project, cell) in projects.iter().zip(grid_cells(area, projects.len())) {
        let languages = project
            .top_languages(3)
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(" · ");

        let mut lines = vec![
            Line::raw(""),
            Line::styled(
                project.description.clone().unwrap_or_default(),
                Style::default().fg(Color::Gray),
            ),
            Line::raw(""),
            Line::from(vec![
                Span::styled("★ ", Style::default().fg(Color::Yellow)),
                Span::raw(project.stargazers_count.to_string()),
                Span::raw("   "),
                Span::styled("⑂ ", Style::default().fg(Color::Cyan)),
                Span::raw(project.forks_count.to_string()),
                Span::raw("   "),
                Span::styled(
                    project.updated_at.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ];
        if !languages.is_empty() {
            lines.push(Line::styled(languages, Style::default().fg(Color::Green)));
        }

        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", project.name))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(card, cell);
    }
}

fn draw_warning(frame: &mut Frame, app: &App, kind: WarningKind, area: Rect) {
    let lang = app.language;
    let lines = match kind {
        WarningKind::StaleCacheRateLimit => vec![
            Line::raw(format!("⚠ {}", tr(lang, "projects.error.usingCache"))),
            Line::styled(
                format!("  {}", tr(lang, "projects.error.cacheWarning")),
                Style::default().fg(Color::DarkGray),
            ),
        ],
        WarningKind::StaleCacheError => {
            vec![Line::raw(format!("⚠ {}", tr(lang, "projects.error.errorCache")))]
        }
    };
    let warning = Paragraph::new(lines).style(Style::default().fg(Color::Yellow));
    frame.render_widget(warning, area);
}

fn draw_error(frame: &mut Frame, app: &App, kind: &ErrorKind, area: Rect) {
    let lang = app.language;
    let lines = match kind {
        ErrorKind::RateLimited { reset } => {
            let mut lines = vec![
                Line::styled(
                    tr(lang, "projects.error.rateLimit"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Line::raw(tr(lang, "projects.error.rateLimitMessage")),
            ];
            if let Some(reset) = reset {
                lines.push(Line::styled(
                    i18n::rate_limit_reset_label(*reset, lang),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(profile_line(app, lang));
            lines
        }
        ErrorKind::Generic { profile_url } => vec![
            Line::styled(
                tr(lang, "projects.error.title"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::raw(tr(lang, "projects.error.visitProfile")),
            Line::styled(profile_url.clone(), Style::default().fg(Color::Cyan)),
        ],
    };

    let banner = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(banner, area);
}

fn profile_line(app: &App, lang: crate::i18n::Language) -> Line<'static> {
    Line::from(vec![
        Span::raw(tr(lang, "projects.error.visitProfile").to_string()),
        Span::raw(" "),
        Span::styled(
            format!("https://github.com/{}", app.github_user),
            Style::default().fg(Color::Cyan),
        ),
    ])
}

fn draw_empty(frame: &mut Frame, app: &App, area: Rect) {
    let empty = Paragraph::new(tr(app.language, "projects.empty"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(empty, area);
}

/// Split an area into a 2-column grid with one cell per card.
fn grid_cells(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(2);
    let row_constraints = vec![Constraint::Ratio(1, rows as u32); rows];
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    let mut cells = Vec::with_capacity(count);
    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(*row_area);
        for col_idx in 0..2 {
            if row_idx * 2 + col_idx < count {
                cells.push(cols[col_idx]);
            }
        }
    }
    cells
}
