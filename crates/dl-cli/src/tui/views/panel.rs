use dl_narrative::companion_appearance;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::rgb;
use crate::tui::app::App;

const RECENT_EVENTS: usize = 8;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.sim.state();
    let stage = state.stage();
    let heading = Style::default().fg(Color::White).bold();
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled("You", heading)),
        Line::from(format!("  at {}", state.player.position)),
        Line::from(vec![
            Span::raw("  sanity "),
            meter(state.player.sanity.value()),
        ]),
        Line::from(format!("  walked {} hexes", state.player.distance_traveled)),
        Line::from(""),
        Line::from(Span::styled("Companions", heading)),
    ];

    for companion in state.companions() {
        match companion_appearance(companion, stage) {
            Some(look) => lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<12}", companion.name),
                    Style::default().fg(rgb(look.color)),
                ),
                meter(companion.morale.value()),
                Span::styled(format!(" {}", look.animation.name()), dim),
            ])),
            None => lines.push(Line::from(Span::styled(
                format!("  {:<12} gone", companion.name),
                dim.crossed_out(),
            ))),
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Quest", heading)));
    match &state.active_quest {
        Some(quest) => {
            lines.push(Line::from(format!("  {}", quest.title)));
            for task in &quest.tasks {
                let mark = if task.done { "x" } else { " " };
                lines.push(Line::from(Span::styled(
                    format!("  [{mark}] {}", task.description),
                    if task.done { dim } else { Style::default() },
                )));
            }
        }
        None => lines.push(Line::from(Span::styled("  (none)", dim))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Recent", heading)));
    let events = app.sim.events().events();
    for event in events.iter().rev().take(RECENT_EVENTS) {
        lines.push(Line::from(Span::styled(
            format!("  {}", event.description),
            dim,
        )));
    }

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Party ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn meter(value: f64) -> Span<'static> {
    let filled = (value / 10.0).round().clamp(0.0, 10.0) as usize;
    let color = if value <= 20.0 {
        Color::Red
    } else if value <= 50.0 {
        Color::Yellow
    } else {
        Color::Green
    };
    Span::styled(
        format!("{}{} {:>3.0}", "█".repeat(filled), "░".repeat(10 - filled), value),
        Style::default().fg(color),
    )
}
