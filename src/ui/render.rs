use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::ui::text::NO_PROJECTS;

pub fn render(frame: &mut ratatui::Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let input_title = match app.active_ide() {
        Some(ide) => format!("Search {} projects", ide.data().name),
        None => "Search recent projects (prefix an IDE key to narrow)".to_string(),
    };
    let input = Paragraph::new(Text::from(app.input.clone()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(input_title));
    frame.render_widget(input, chunks[0]);

    let list_items: Vec<ListItem<'_>> = if app.results().is_empty() {
        vec![ListItem::new(Line::from(NO_PROJECTS))]
    } else {
        app.results()
            .iter()
            .enumerate()
            .map(|(idx, project)| {
                let mut style = Style::default();
                if idx == app.selected_index {
                    style = style.bg(Color::Blue).fg(Color::White);
                }
                let mut spans = vec![
                    Span::styled(project.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  {}", project.path)),
                    Span::styled(
                        format!("  [{}]", project.ide.data().name),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if app.has_query() {
                    spans.push(Span::raw(format!("  {:.0}", -project.score)));
                }
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect()
    };

    let title = format!("Projects ({})", app.results().len());
    let projects = List::new(list_items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(projects, chunks[1]);

    let status = Paragraph::new(format!(
        "{} | Enter open | Alt+Enter copy path | Up/Down select | Esc clear/quit",
        app.status_message
    ))
    .style(Style::default().fg(Color::Yellow))
    .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);
}
