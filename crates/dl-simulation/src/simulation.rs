use dl_core::{CompanionId, GameState, SessionMeta};
use serde::Serialize;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::EventLog;
use crate::morale::MoraleSystem;
use crate::movement::MovementSystem;
use crate::quest::QuestSystem;
use crate::sanity::SanitySystem;
use crate::stage::StageTransitionSystem;
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the game state, clock, event log, and registered systems.
/// Drives the tick loop and coordinates cross-system effects.
///
/// Outside the tick loop the state is read-only. Changes from the outside
/// are queued with the owning system and land on the next tick.
pub struct Simulation {
    state: GameState,
    clock: SimClock,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("stage", &self.state.stage())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

/// A serializable view of a running session.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Ticks run so far.
    pub tick: u64,
    /// Session seconds elapsed.
    pub elapsed_secs: f64,
    /// The full game state.
    pub state: &'a GameState,
    /// Every retained event.
    pub events: &'a EventLog,
}

impl Simulation {
    /// Create a new simulation from a game state and configuration. No systems are registered.
    pub fn new(state: GameState, config: SimConfig) -> Self {
        let clock = SimClock::new(config.seconds_per_tick);
        let events = EventLog::new(config.max_events);
        Self {
            state,
            clock,
            events,
            systems: Vec::new(),
            initialized: false,
        }
    }

    /// A fresh session with every game system registered in tick order:
    /// movement, sanity, stage, morale, quest.
    pub fn standard(name: impl Into<String>, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let state = GameState::new(SessionMeta::new(name, config.seed), config.world_radius);
        let mut sim = Self::new(state, config.clone());
        sim.add_system(MovementSystem::new(config.steps_per_tick));
        sim.add_system(SanitySystem::new());
        sim.add_system(StageTransitionSystem::new(config.thresholds));
        sim.add_system(MoraleSystem::new());
        sim.add_system(QuestSystem::new());
        sim.init()?;
        Ok(sim)
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                state: &mut self.state,
                clock: &self.clock,
                events: &mut self.events,
            };
            let result = system.init(&mut ctx);
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        self.clock.advance();

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                state: &mut self.state,
                clock: &self.clock,
                events: &mut self.events,
            };
            let result = system.tick(&mut ctx);
            self.systems[i] = system;
            result?;
            self.apply_cross_system_effects();
        }
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Hand effects from one system to another between system ticks, so a
    /// system later in the order sees them in the same tick.
    fn apply_cross_system_effects(&mut self) {
        // Steps walked -> sanity, charged at the stage they were walked in
        if self.get_system::<SanitySystem>().is_none() {
            return;
        }
        let steps = match self.get_system_mut::<MovementSystem>() {
            Some(movement) => movement.drain_steps_taken(),
            None => return,
        };
        if steps.is_empty() {
            return;
        }
        if let Some(sanity) = self.get_system_mut::<SanitySystem>() {
            for (stage, count) in steps {
                sanity.record_steps(stage, count);
            }
        }
    }

    /// Ask the stage system to advance on the next tick.
    ///
    /// Returns `false` when no stage system is registered.
    pub fn request_stage_advance(&mut self) -> bool {
        match self.get_system_mut::<StageTransitionSystem>() {
            Some(stage) => {
                stage.request_advance();
                true
            }
            None => false,
        }
    }

    /// The shared game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Queue a morale change for a companion, applied by the morale system
    /// on the next tick.
    ///
    /// Returns `false` when no morale system is registered.
    pub fn queue_morale_adjustment(&mut self, companion: CompanionId, delta: f64) -> bool {
        match self.get_system_mut::<MoraleSystem>() {
            Some(morale) => {
                morale.queue_adjustment(companion, delta);
                true
            }
            None => false,
        }
    }

    /// Queue a one-off sanity loss, applied by the sanity system on the next
    /// tick with the usual threshold events.
    ///
    /// Returns `false` when no sanity system is registered.
    pub fn queue_sanity_drain(&mut self, amount: f64) -> bool {
        match self.get_system_mut::<SanitySystem>() {
            Some(sanity) => {
                sanity.queue_drain(amount);
                true
            }
            None => false,
        }
    }

    /// Set a narrative flag.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.state.set_flag(key);
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// A serializable view of the session.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.clock.tick(),
            elapsed_secs: self.clock.elapsed_secs(),
            state: &self.state,
            events: &self.events,
        }
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Split borrow of the movement system and the state, for preview and confirm.
    pub fn movement_and_state(&mut self) -> Option<(&mut MovementSystem, &GameState)> {
        let state = &self.state;
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<MovementSystem>())
            .map(|movement| (movement, state))
    }

    /// Return the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
