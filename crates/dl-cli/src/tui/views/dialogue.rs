use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::{centered_rect, rgb};
use crate::tui::app::App;

pub fn draw_talk_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(30, 40, frame.area());
    let items: Vec<ListItem> = app
        .sim
        .state()
        .active_companions()
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled(c.name.clone(), Style::default().fg(rgb(c.color)).bold()),
                Span::styled(
                    format!("  {}", c.archetype),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Talk to ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.talk_cursor));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn draw_conversation(frame: &mut Frame, app: &App) {
    let Some(conversation) = &app.conversation else {
        return;
    };
    let area = centered_rect(60, 50, frame.area());

    let response = app.last_response.as_ref().map(|r| {
        Line::from(Span::styled(
            r.clone(),
            Style::default().fg(Color::Yellow).italic(),
        ))
    });
    let mut lines = Vec::new();
    if conversation.is_finished() {
        lines.push(Line::from(conversation.text()));
        lines.push(Line::from(""));
        lines.extend(response);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "(Esc or Enter to leave)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        if let Some(response) = response {
            lines.push(response);
            lines.push(Line::from(""));
        }
        lines.push(Line::from(conversation.text()));
        lines.push(Line::from(""));
        for (n, (_, choice)) in app.visible_choices().iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}. ", n + 1), Style::default().fg(Color::Cyan)),
                Span::raw(choice.text.clone()),
            ]));
        }
    }

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", conversation.speaker()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}
