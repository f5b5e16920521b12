use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StageThresholds;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// What pushed the story into its next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceTrigger {
    /// Too long spent in the stage.
    Time,
    /// Sanity fell far enough.
    Sanity,
    /// The player walked far enough.
    Distance,
    /// A narrative event asked for it.
    Requested,
}

impl fmt::Display for AdvanceTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Time => "time",
            Self::Sanity => "sanity",
            Self::Distance => "distance",
            Self::Requested => "requested",
        };
        write!(f, "{s}")
    }
}

/// The only system that moves the narrative stage.
///
/// Advances at most one stage per tick, on whichever threshold fires first or
/// on an explicit request.
#[derive(Debug)]
pub struct StageTransitionSystem {
    thresholds: StageThresholds,
    entered_at: f64,
    requested: bool,
}

impl Default for StageTransitionSystem {
    fn default() -> Self {
        Self::new(StageThresholds::default())
    }
}

impl StageTransitionSystem {
    /// Create the system with the given thresholds.
    pub fn new(thresholds: StageThresholds) -> Self {
        Self {
            thresholds,
            entered_at: 0.0,
            requested: false,
        }
    }

    /// Ask for an advance on the next tick. Repeated requests still move one stage.
    pub fn request_advance(&mut self) {
        self.requested = true;
    }

    /// Whether a request is waiting.
    pub fn has_pending_request(&self) -> bool {
        self.requested
    }

    /// Session seconds at which the current stage began.
    pub fn entered_at(&self) -> f64 {
        self.entered_at
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> &StageThresholds {
        &self.thresholds
    }
}

impl System for StageTransitionSystem {
    fn name(&self) -> &str {
        "stage"
    }

    fn init(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.entered_at = ctx.elapsed_secs();
        Ok(())
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let stage = ctx.state.stage();
        if stage.is_final() {
            self.requested = false;
            return Ok(());
        }

        let trigger = if std::mem::take(&mut self.requested) {
            Some(AdvanceTrigger::Requested)
        } else {
            self.thresholds.trigger(
                stage,
                ctx.elapsed_secs() - self.entered_at,
                ctx.state.player.sanity.value(),
                ctx.state.player.distance_traveled,
            )
        };
        let Some(trigger) = trigger else {
            return Ok(());
        };

        let transition = ctx.state.advance_stage()?;
        self.entered_at = ctx.elapsed_secs();
        info!(%transition, %trigger, tick = ctx.tick(), "stage advanced");
        ctx.emit(
            SimEventKind::StageAdvanced {
                from: transition.from(),
                to: transition.to(),
                trigger,
            },
            format!("The world turns to {} ({trigger})", transition.to()),
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use dl_core::{GameState, Meter, NarrativeStage, SessionMeta};

    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Simulation;

    fn sim() -> Simulation {
        let mut sim = Simulation::new(
            GameState::new(SessionMeta::new("Test", 3), 10),
            SimConfig::default(),
        );
        sim.add_system(StageTransitionSystem::default());
        sim
    }

    #[test]
    fn time_in_stage_advances() {
        let mut sim = sim();
        sim.run(179).unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Peace);
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
        assert_eq!(sim.state().world.stage(), NarrativeStage::Unease);
    }

    #[test]
    fn time_resets_on_entry() {
        let mut sim = sim();
        sim.run(180).unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
        sim.run(239).unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Dread);
    }

    #[test]
    fn at_most_one_stage_per_tick() {
        let mut sim = sim();
        sim.state_mut().player.sanity = Meter::new(0.0);
        sim.state_mut().player.distance_traveled = 1000;
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Dread);
    }

    #[test]
    fn distance_trigger_is_reported() {
        let mut sim = sim();
        sim.state_mut().player.distance_traveled = 12;
        sim.tick().unwrap();
        let advanced = sim.events().events_labeled("stage_advanced");
        assert_eq!(advanced.len(), 1);
        assert_eq!(
            advanced[0].kind,
            SimEventKind::StageAdvanced {
                from: NarrativeStage::Peace,
                to: NarrativeStage::Unease,
                trigger: AdvanceTrigger::Distance,
            }
        );
    }

    #[test]
    fn request_is_honored_next_tick() {
        let mut sim = sim();
        let stage_system = sim.get_system_mut::<StageTransitionSystem>().unwrap();
        stage_system.request_advance();
        stage_system.request_advance();
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
        assert!(!sim.get_system::<StageTransitionSystem>().unwrap().has_pending_request());
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Unease);
    }

    #[test]
    fn horror_is_terminal() {
        let mut sim = sim();
        sim.state_mut().player.sanity = Meter::new(0.0);
        sim.run(10).unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Horror);
        assert_eq!(sim.events().events_labeled("stage_advanced").len(), 4);
        sim.get_system_mut::<StageTransitionSystem>()
            .unwrap()
            .request_advance();
        sim.tick().unwrap();
        assert_eq!(sim.state().stage(), NarrativeStage::Horror);
    }
}
