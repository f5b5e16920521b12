mod app;
mod views;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use dl_narrative::DialogueBook;
use dl_simulation::Simulation;

use app::{App, Mode};

pub fn run(sim: Simulation, book: &DialogueBook, tick_every: Duration) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let mut app = App::new(sim, book);

    let result = run_loop(&mut terminal, &mut app, tick_every);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_every: Duration,
) -> Result<(), String> {
    let mut last_tick = Instant::now();
    loop {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        let timeout = tick_every.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            match event::read().map_err(|e| format!("event error: {e}"))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                        && app.mode == Mode::Explore
                    {
                        app.click(mouse.column, mouse.row);
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_every {
            app.tick();
            last_tick = Instant::now();
        }
    }
}

/// Returns `true` when the player asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.show_help {
        app.toggle_help();
        return false;
    }

    match app.mode {
        Mode::Explore => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('h') | KeyCode::Left => app.move_cursor(-1, 0),
            KeyCode::Char('l') | KeyCode::Right => app.move_cursor(1, 0),
            KeyCode::Char('k') | KeyCode::Up => app.move_cursor(0, -1),
            KeyCode::Char('j') | KeyCode::Down => app.move_cursor(0, 1),
            KeyCode::Char('c') => app.center_cursor(),
            KeyCode::Enter | KeyCode::Char(' ') => app.target_cursor(),
            KeyCode::Esc => app.cancel(),
            KeyCode::Char('t') => app.open_talk(),
            KeyCode::Char('p') => app.toggle_pause(),
            KeyCode::Char('?') => app.toggle_help(),
            _ => {}
        },
        Mode::Talk => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.talk_down(),
            KeyCode::Char('k') | KeyCode::Up => app.talk_up(),
            KeyCode::Enter => app.talk_select(),
            KeyCode::Esc | KeyCode::Char('q') => app.mode = Mode::Explore,
            _ => {}
        },
        Mode::Dialogue => match key.code {
            KeyCode::Esc => app.close_dialogue(),
            KeyCode::Enter if app.conversation.as_ref().is_none_or(|c| c.is_finished()) => {
                app.close_dialogue()
            }
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10).filter(|n| *n > 0) {
                    app.choose(n as usize - 1);
                }
            }
            _ => {}
        },
    }
    false
}

fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Map and panel
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(42)])
        .split(chunks[1]);

    views::draw_title_bar(frame, app, chunks[0]);
    views::map::draw(frame, app, body[0]);
    views::panel::draw(frame, app, body[1]);
    views::draw_status_bar(frame, app, chunks[2]);

    match app.mode {
        Mode::Explore => {}
        Mode::Talk => views::dialogue::draw_talk_picker(frame, app),
        Mode::Dialogue => views::dialogue::draw_conversation(frame, app),
    }

    if app.show_help {
        views::draw_help_popup(frame);
    }
}
