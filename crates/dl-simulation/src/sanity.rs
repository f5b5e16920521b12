use dl_core::NarrativeStage;
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Sanity lost per second, by stage.
pub const DRAIN_PER_SECOND: [f64; 5] = [0.0, 0.01, 0.03, 0.06, 0.12];

/// Sanity marks that raise an event when crossed on the way down.
pub const THRESHOLDS: [u8; 4] = [75, 50, 25, 0];

/// Sanity lost per hex walked at the given stage.
pub fn drain_per_step(stage: NarrativeStage) -> f64 {
    match stage {
        NarrativeStage::Terror => 0.5,
        NarrativeStage::Horror => 1.0,
        _ => 0.0,
    }
}

/// Wears the player's sanity down over time and with every step in the dark.
///
/// Steps arrive with the stage they were walked in and are priced at that
/// stage. One-off losses from dialogue are queued the same way, so every
/// loss passes the same threshold check.
#[derive(Debug, Default)]
pub struct SanitySystem {
    pending_steps: u32,
    pending_drain: f64,
}

impl SanitySystem {
    /// Create a sanity system with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue hexes walked during `stage`, charged on this system's next tick.
    pub fn record_steps(&mut self, stage: NarrativeStage, steps: u32) {
        self.pending_steps += steps;
        self.pending_drain += drain_per_step(stage) * f64::from(steps);
    }

    /// Queue a one-off loss. Negative amounts are ignored.
    pub fn queue_drain(&mut self, amount: f64) {
        self.pending_drain += amount.max(0.0);
    }

    /// Hexes queued but not yet charged.
    pub fn pending_steps(&self) -> u32 {
        self.pending_steps
    }

    /// Sanity queued but not yet taken.
    pub fn pending_drain(&self) -> f64 {
        self.pending_drain
    }
}

/// Thresholds passed on the way from `before` down to `after`.
fn crossed(before: f64, after: f64) -> impl Iterator<Item = u8> {
    THRESHOLDS.into_iter().filter(move |&t| {
        let mark = f64::from(t);
        before > mark && after <= mark
    })
}

impl System for SanitySystem {
    fn name(&self) -> &str {
        "sanity"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let stage = ctx.state.stage();
        self.pending_steps = 0;
        let queued = std::mem::take(&mut self.pending_drain);
        let drain = DRAIN_PER_SECOND[stage.index()] * ctx.dt() + queued;
        if drain <= 0.0 {
            return Ok(());
        }

        let before = ctx.state.player.sanity.value();
        let after = ctx.state.player.lose_sanity(drain);
        for threshold in crossed(before, after) {
            debug!(threshold, sanity = after, "sanity threshold crossed");
            ctx.emit(
                SimEventKind::SanityThreshold {
                    threshold,
                    sanity: after,
                },
                format!("Sanity fell to {after:.0}"),
            );
        }
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
    use dl_core::{GameState, Meter, SessionMeta};

    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Simulation;

    fn sim_at(stage: NarrativeStage) -> Simulation {
        let mut state = GameState::new(SessionMeta::new("Test", 1), 6);
        while state.stage() < stage {
            state.advance_stage().unwrap();
        }
        let mut sim = Simulation::new(state, SimConfig::default());
        sim.add_system(SanitySystem::new());
        sim
    }

    #[test]
    fn peace_does_not_drain() {
        let mut sim = sim_at(NarrativeStage::Peace);
        sim.run(100).unwrap();
        assert_eq!(sim.state().player.sanity.value(), 100.0);
    }

    #[test]
    fn time_drain_scales_with_stage() {
        let mut sim = sim_at(NarrativeStage::Horror);
        sim.run(10).unwrap();
        let sanity = sim.state().player.sanity.value();
        assert!((sanity - (100.0 - 1.2)).abs() < 1e-9);
    }

    #[test]
    fn steps_drain_in_terror() {
        let mut sim = sim_at(NarrativeStage::Terror);
        sim.get_system_mut::<SanitySystem>()
            .unwrap()
            .record_steps(NarrativeStage::Terror, 4);
        sim.tick().unwrap();
        let sanity = sim.state().player.sanity.value();
        assert!((sanity - (100.0 - 2.0 - 0.06)).abs() < 1e-9);
        assert_eq!(sim.get_system::<SanitySystem>().unwrap().pending_steps(), 0);
    }

    #[test]
    fn steps_are_free_before_terror() {
        let mut sim = sim_at(NarrativeStage::Unease);
        sim.get_system_mut::<SanitySystem>()
            .unwrap()
            .record_steps(NarrativeStage::Unease, 50);
        sim.tick().unwrap();
        assert!(sim.state().player.sanity.value() > 99.9);
    }

    #[test]
    fn steps_are_priced_at_the_stage_they_were_walked() {
        let mut sim = sim_at(NarrativeStage::Horror);
        sim.get_system_mut::<SanitySystem>()
            .unwrap()
            .record_steps(NarrativeStage::Dread, 10);
        sim.tick().unwrap();
        let sanity = sim.state().player.sanity.value();
        assert!((sanity - (100.0 - 0.12)).abs() < 1e-9);
    }

    #[test]
    fn queued_drain_crosses_thresholds_in_peace() {
        let mut sim = sim_at(NarrativeStage::Peace);
        sim.state_mut().player.sanity = Meter::new(52.0);
        let sanity = sim.get_system_mut::<SanitySystem>().unwrap();
        sanity.queue_drain(3.0);
        sanity.queue_drain(-10.0);
        assert_eq!(sanity.pending_drain(), 3.0);
        sim.tick().unwrap();
        assert_eq!(sim.state().player.sanity.value(), 49.0);
        assert_eq!(sim.events().events_labeled("sanity_threshold").len(), 1);
        assert_eq!(sim.get_system::<SanitySystem>().unwrap().pending_drain(), 0.0);
    }

    #[test]
    fn thresholds_fire_once_each() {
        let mut sim = sim_at(NarrativeStage::Horror);
        sim.state_mut().player.sanity = Meter::new(76.0);
        sim.get_system_mut::<SanitySystem>()
            .unwrap()
            .record_steps(NarrativeStage::Horror, 30);
        sim.tick().unwrap();
        let marks: Vec<u8> = sim
            .events()
            .events_labeled("sanity_threshold")
            .iter()
            .filter_map(|e| match e.kind {
                SimEventKind::SanityThreshold { threshold, .. } => Some(threshold),
                _ => None,
            })
            .collect();
        assert_eq!(marks, vec![75, 50]);

        sim.tick().unwrap();
        assert_eq!(sim.events().events_labeled("sanity_threshold").len(), 2);
    }

    #[test]
    fn sanity_floors_at_zero() {
        let mut sim = sim_at(NarrativeStage::Horror);
        sim.get_system_mut::<SanitySystem>()
            .unwrap()
            .record_steps(NarrativeStage::Horror, 500);
        sim.tick().unwrap();
        assert_eq!(sim.state().player.sanity.value(), 0.0);
        assert_eq!(sim.events().events_labeled("sanity_threshold").len(), 4);
    }
}
