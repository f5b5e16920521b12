pub mod dialogue;
pub mod map;
pub mod panel;

use dl_core::Rgb;
use dl_narrative::StagePreset;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app::{App, Mode};

/// Terminal color for a palette entry.
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let preset = StagePreset::for_stage(app.stage());
    let paused = if app.paused { "  [paused]" } else { "" };
    let title = Line::from(vec![
        Span::styled(" Dragon's Labyrinth ", Style::default().bold()),
        Span::raw("| "),
        Span::styled(
            preset.stage.name().to_uppercase(),
            Style::default().fg(rgb(preset.accent)).bold(),
        ),
        Span::styled(
            format!(
                "  tick {}  {:.0}s  ♪ {}{paused}",
                app.sim.current_tick(),
                app.sim.clock().elapsed_secs(),
                preset.audio_track
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let bar = Paragraph::new(title).style(Style::default().bg(rgb(preset.sky.darken(0.6))));
    frame.render_widget(bar, area);
}

pub fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.mode {
        Mode::Explore => match &app.message {
            Some(message) => format!("{message} | ?:help q:quit"),
            None => "arrows/hjkl:cursor Enter:path/go click:target Esc:cancel t:talk p:pause ?:help q:quit"
                .to_string(),
        },
        Mode::Talk => "j/k:choose Enter:talk Esc:back".to_string(),
        Mode::Dialogue => "1-9:answer Esc:leave".to_string(),
    };

    let tint = StagePreset::for_stage(app.stage()).ui_tint;
    let bar = Paragraph::new(status).style(Style::default().fg(Color::Black).bg(rgb(tint)));
    frame.render_widget(bar, area);
}

pub fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().bold()),
        Line::from(""),
        Line::from("  ← → / h l     Move cursor along q"),
        Line::from("  ↑ ↓ / k j     Move cursor along r"),
        Line::from("  c             Cursor back to you"),
        Line::from("  Enter         Preview path, again to walk"),
        Line::from("  Click         Same, with the mouse"),
        Line::from("  Esc           Cancel preview / stop"),
        Line::from("  t             Talk to a companion"),
        Line::from("  p             Pause"),
        Line::from("  ?             Toggle this help"),
        Line::from("  q             Quit"),
        Line::from("  Ctrl+C        Force quit"),
    ];

    let popup = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
