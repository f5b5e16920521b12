//! Tick-based game loop for Dragon's Labyrinth.
//!
//! Provides a system-based simulation framework operating on a
//! [`dl_core::GameState`]. Each system owns one concern (walking the player
//! along a confirmed path, draining sanity, advancing the narrative stage,
//! wearing down companion morale, tracking quests) and reports what happened
//! through the shared [`EventLog`].

/// Simulation clock for tracking ticks and session time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Morale system: stage-entry hits, ambient wear, and departures.
pub mod morale;
/// Movement system: A* pathfinding, path preview, and route following.
pub mod movement;
/// Quest system: one active quest per stage.
pub mod quest;
/// Sanity system: time and step drain with threshold events.
pub mod sanity;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Stage transition system: the single writer of the narrative stage.
pub mod stage;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`config::SimConfig`] and [`config::StageThresholds`].
pub use config::{SimConfig, StageThresholds};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`morale::MoraleSystem`].
pub use morale::MoraleSystem;
/// Re-exports of the movement types.
pub use movement::{MovementSystem, PathPreview, Route, find_path};
/// Re-export of [`quest::QuestSystem`].
pub use quest::QuestSystem;
/// Re-export of [`sanity::SanitySystem`].
pub use sanity::SanitySystem;
/// Re-exports of [`simulation::Simulation`] and [`simulation::Snapshot`].
pub use simulation::{Simulation, Snapshot};
/// Re-exports of [`stage::StageTransitionSystem`] and [`stage::AdvanceTrigger`].
pub use stage::{AdvanceTrigger, StageTransitionSystem};
/// Re-export of [`system::System`].
pub use system::System;
