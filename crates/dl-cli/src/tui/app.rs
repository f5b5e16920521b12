use dl_core::{HexCoord, NarrativeStage};
use dl_narrative::{Choice, Conversation, DialogueBook};
use dl_simulation::{MovementSystem, PathPreview, Simulation};
use ratatui::layout::Rect;

use crate::hexmap::cell_to_hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Explore,
    Talk,
    Dialogue,
}

pub struct App<'a> {
    pub sim: Simulation,
    pub book: &'a DialogueBook,
    pub mode: Mode,
    pub show_help: bool,
    pub paused: bool,

    // Map state
    pub cursor: HexCoord,
    pub map_area: Rect,

    // Talk state
    pub talk_cursor: usize,
    pub conversation: Option<Conversation<'a>>,
    pub last_response: Option<String>,

    pub message: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(sim: Simulation, book: &'a DialogueBook) -> Self {
        let cursor = sim.state().player.position;
        Self {
            sim,
            book,
            mode: Mode::Explore,
            show_help: false,
            paused: false,
            cursor,
            map_area: Rect::default(),
            talk_cursor: 0,
            conversation: None,
            last_response: None,
            message: None,
        }
    }

    pub fn stage(&self) -> NarrativeStage {
        self.sim.state().stage()
    }

    /// Advance one tick unless paused or mid-conversation.
    pub fn tick(&mut self) {
        if self.paused || self.conversation.is_some() {
            return;
        }
        let before = self.stage();
        if let Err(e) = self.sim.tick() {
            self.message = Some(e.to_string());
            return;
        }
        let after = self.stage();
        if after != before {
            self.message = Some(format!("The world turns to {after}."));
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // Map

    pub fn move_cursor(&mut self, dq: i32, dr: i32) {
        let next = HexCoord::new(self.cursor.q + dq, self.cursor.r + dr);
        if self.sim.state().world.contains(next) {
            self.cursor = next;
        }
    }

    pub fn center_cursor(&mut self) {
        self.cursor = self.sim.state().player.position;
    }

    /// Preview a path to `hex`; if that path is already previewed, walk it.
    pub fn target(&mut self, hex: HexCoord) {
        self.cursor = hex;
        let Some((movement, state)) = self.sim.movement_and_state() else {
            return;
        };
        let previewed = movement.pending_preview().is_some_and(|p| p.to == hex);
        let result = if previewed {
            movement
                .confirm(state)
                .map(|steps| format!("Walking {steps} steps to {hex}."))
        } else {
            movement.preview(state, hex).map(|p| {
                format!(
                    "Path to {hex}: {} steps, cost {}. Enter again to go.",
                    p.len(),
                    p.cost
                )
            })
        };
        self.message = Some(result.unwrap_or_else(|e| e.to_string()));
    }

    pub fn target_cursor(&mut self) {
        self.target(self.cursor);
    }

    /// Resolve a terminal click inside the map to a hex and target it.
    pub fn click(&mut self, column: u16, row: u16) {
        let area = self.map_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return;
        }
        let radius = self.sim.state().world.radius();
        let col = usize::from(column - area.x);
        let row = usize::from(row - area.y);
        if let Some(hex) = cell_to_hex(col, row, radius) {
            self.target(hex);
        }
    }

    /// Drop a pending preview, or stop walking if there is none.
    pub fn cancel(&mut self) {
        let Some(movement) = self.sim.get_system_mut::<MovementSystem>() else {
            return;
        };
        if movement.cancel().is_none() && movement.is_moving() {
            movement.stop();
            self.message = Some("Stopped.".into());
        }
    }

    pub fn preview(&self) -> Option<&PathPreview> {
        self.sim
            .get_system::<MovementSystem>()
            .and_then(|m| m.pending_preview())
    }

    pub fn route(&self) -> Vec<HexCoord> {
        self.sim
            .get_system::<MovementSystem>()
            .and_then(|m| m.route())
            .map(|r| r.remaining().collect())
            .unwrap_or_default()
    }

    // Talk

    pub fn talk_candidates(&self) -> Vec<String> {
        self.sim
            .state()
            .active_companions()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn open_talk(&mut self) {
        if self.talk_candidates().is_empty() {
            self.message = Some("There is no one left to talk to.".into());
            return;
        }
        self.talk_cursor = 0;
        self.mode = Mode::Talk;
    }

    pub fn talk_down(&mut self) {
        if self.talk_cursor + 1 < self.talk_candidates().len() {
            self.talk_cursor += 1;
        }
    }

    pub fn talk_up(&mut self) {
        self.talk_cursor = self.talk_cursor.saturating_sub(1);
    }

    pub fn talk_select(&mut self) {
        let Some(name) = self.talk_candidates().get(self.talk_cursor).cloned() else {
            return;
        };
        match Conversation::open(&mut self.sim, self.book, &name) {
            Ok(conversation) => {
                self.conversation = Some(conversation);
                self.last_response = None;
                self.mode = Mode::Dialogue;
            }
            Err(e) => {
                self.message = Some(e.to_string());
                self.mode = Mode::Explore;
            }
        }
    }

    /// Choices on screen, numbered from zero in display order.
    pub fn visible_choices(&self) -> Vec<(usize, &'a Choice)> {
        self.conversation
            .as_ref()
            .map(|c| c.choices(self.sim.state()))
            .unwrap_or_default()
    }

    /// Pick the `n`th visible choice.
    pub fn choose(&mut self, n: usize) {
        let Some(conversation) = self.conversation.as_mut() else {
            return;
        };
        if conversation.is_finished() {
            return;
        }
        let visible = conversation.choices(self.sim.state());
        let Some(&(index, _)) = visible.get(n) else {
            return;
        };
        match conversation.choose(&mut self.sim, index) {
            Ok(outcome) => self.last_response = Some(outcome.response),
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    pub fn close_dialogue(&mut self) {
        self.conversation = None;
        self.last_response = None;
        self.mode = Mode::Explore;
    }
}

#[cfg(test)]
mod tests {
    use dl_simulation::SimConfig;

    use super::*;

    fn sim() -> Simulation {
        Simulation::standard("Test", SimConfig::default().with_world_radius(6)).unwrap()
    }

    #[test]
    fn cursor_stays_inside_the_world() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        for _ in 0..20 {
            app.move_cursor(1, 0);
        }
        assert_eq!(app.cursor, HexCoord::new(6, 0));
    }

    #[test]
    fn target_previews_then_confirms() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        let hex = HexCoord::new(1, 0);
        app.target(hex);
        assert_eq!(app.preview().map(|p| p.to), Some(hex));
        assert!(app.route().is_empty());

        app.target(hex);
        assert!(app.preview().is_none());
        assert_eq!(app.route(), vec![hex]);

        app.tick();
        assert_eq!(app.sim.state().player.position, hex);
    }

    #[test]
    fn cancel_drops_the_preview() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        app.target(HexCoord::new(0, 1));
        app.cancel();
        assert!(app.preview().is_none());
    }

    #[test]
    fn click_maps_to_a_hex() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        app.map_area = Rect::new(1, 1, 40, 20);
        // Origin of a radius-6 world sits at cell (12, 6).
        app.click(1 + 14, 1 + 6);
        assert_eq!(app.cursor, HexCoord::new(1, 0));
        assert!(app.preview().is_some());

        app.click(0, 0);
        assert_eq!(app.cursor, HexCoord::new(1, 0));
    }

    #[test]
    fn pause_stops_the_clock() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        app.toggle_pause();
        app.tick();
        assert_eq!(app.sim.current_tick(), 0);
        app.toggle_pause();
        app.tick();
        assert_eq!(app.sim.current_tick(), 1);
    }

    #[test]
    fn talking_pauses_and_choices_apply() {
        let book = DialogueBook::standard();
        let mut app = App::new(sim(), &book);
        app.open_talk();
        assert_eq!(app.mode, Mode::Talk);
        assert_eq!(app.talk_candidates()[0], "Elena");

        app.talk_select();
        assert_eq!(app.mode, Mode::Dialogue);
        app.tick();
        assert_eq!(app.sim.current_tick(), 0);

        assert!(!app.visible_choices().is_empty());
        app.choose(0);
        assert!(app.last_response.is_some());
        assert!(app.sim.state().has_flag("talked_to:elena"));

        app.close_dialogue();
        assert_eq!(app.mode, Mode::Explore);
        app.tick();
        assert_eq!(app.sim.current_tick(), 1);
    }
}
