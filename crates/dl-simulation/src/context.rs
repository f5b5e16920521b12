use dl_core::GameState;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The shared game state.
    pub state: &'a mut GameState,
    /// The simulation clock, already advanced for this tick.
    pub clock: &'a SimClock,
    /// Where systems report what happened.
    pub events: &'a mut EventLog,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Session seconds elapsed.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Duration of one tick in seconds.
    pub fn dt(&self) -> f64 {
        self.clock.seconds_per_tick()
    }
}
