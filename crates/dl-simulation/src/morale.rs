use dl_core::{CompanionId, NarrativeStage};
use tracing::{debug, info};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Morale lost on entering each stage, before resilience.
pub const STAGE_ENTRY_LOSS: [f64; 5] = [0.0, 8.0, 12.0, 18.0, 25.0];

/// Morale lost per second while in a stage, before resilience.
pub fn ambient_loss_per_second(stage: NarrativeStage) -> f64 {
    match stage {
        NarrativeStage::Dread => 0.02,
        NarrativeStage::Terror => 0.05,
        NarrativeStage::Horror => 0.1,
        _ => 0.0,
    }
}

/// Wears companions down as the story darkens and sends away those who break.
#[derive(Debug, Default)]
pub struct MoraleSystem {
    last_stage: Option<NarrativeStage>,
    adjustments: Vec<(CompanionId, f64)>,
}

impl MoraleSystem {
    /// Create a morale system. It picks up the current stage on init.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a signed morale change for a companion, applied on the next tick.
    pub fn queue_adjustment(&mut self, companion: CompanionId, delta: f64) {
        self.adjustments.push((companion, delta));
    }

    fn apply_stage_entry(&self, ctx: &mut SimContext<'_>, stage: NarrativeStage) {
        let base = STAGE_ENTRY_LOSS[stage.index()];
        let mut hits = Vec::new();
        for companion in ctx.state.companions_mut() {
            let lost = companion.suffer(base);
            if lost > 0.0 {
                hits.push((companion.id, companion.name.clone(), lost, companion.morale.value()));
            }
        }
        for (id, name, lost, morale) in hits {
            ctx.emit(
                SimEventKind::MoraleChanged {
                    companion: id,
                    delta: -lost,
                    morale,
                },
                format!("{name} shudders as the world turns to {stage} ({morale:.0})"),
            );
        }
    }
}

impl System for MoraleSystem {
    fn name(&self) -> &str {
        "morale"
    }

    fn init(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.last_stage = Some(ctx.state.stage());
        Ok(())
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let stage = ctx.state.stage();
        let previous = self.last_stage.unwrap_or(stage);
        for entered in NarrativeStage::ALL {
            if entered > previous && entered <= stage {
                self.apply_stage_entry(ctx, entered);
            }
        }
        self.last_stage = Some(stage);

        for (id, delta) in std::mem::take(&mut self.adjustments) {
            let Some(companion) = ctx.state.companion_mut(id) else {
                continue;
            };
            if !companion.active {
                continue;
            }
            let before = companion.morale.value();
            let after = companion.adjust_morale(delta);
            let name = companion.name.clone();
            ctx.emit(
                SimEventKind::MoraleChanged {
                    companion: id,
                    delta: after - before,
                    morale: after,
                },
                format!("{name}'s morale is now {after:.0}"),
            );
        }

        let ambient = ambient_loss_per_second(stage) * ctx.dt();
        if ambient > 0.0 {
            for companion in ctx.state.companions_mut() {
                if companion.active {
                    companion.adjust_morale(-ambient * companion.archetype.resilience());
                }
            }
        }

        let mut departed = Vec::new();
        for companion in ctx.state.companions_mut() {
            if companion.active && companion.is_broken() {
                companion.deactivate();
                departed.push((companion.id, companion.name.clone()));
            }
        }
        for (id, name) in departed {
            info!(companion = %name, "companion departed");
            ctx.emit(
                SimEventKind::CompanionDeparted { companion: id },
                format!("{name} has left the party"),
            );
        }
        debug!(active = ctx.state.active_companions().count(), "morale tick");
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
    use dl_core::{Archetype, GameState, Meter, SessionMeta};

    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Simulation;

    fn sim() -> Simulation {
        let mut sim = Simulation::new(
            GameState::new(SessionMeta::new("Test", 5), 8),
            SimConfig::default(),
        );
        sim.add_system(MoraleSystem::new());
        sim.init().unwrap();
        sim
    }

    fn morale_of(sim: &Simulation, name: &str) -> f64 {
        sim.state().find_companion(name).unwrap().morale.value()
    }

    #[test]
    fn peace_leaves_morale_alone() {
        let mut sim = sim();
        sim.run(50).unwrap();
        assert!(sim.state().companions().iter().all(|c| c.morale.value() == 100.0));
    }

    #[test]
    fn stage_entry_hit_scales_with_resilience() {
        let mut sim = sim();
        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();
        // Unease: base 8. Stalwart 0.6, Mercenary 1.4.
        assert!((morale_of(&sim, "Elena") - (100.0 - 4.8)).abs() < 1e-9);
        assert!((morale_of(&sim, "Quinn") - (100.0 - 11.2)).abs() < 1e-9);
        let elena = sim.state().find_companion("Elena").unwrap();
        assert!((elena.trauma.value() - 2.4).abs() < 1e-9);
        assert_eq!(sim.events().events_labeled("morale_changed").len(), 5);
    }

    #[test]
    fn entry_hit_applies_once() {
        let mut sim = sim();
        sim.state_mut().advance_stage().unwrap();
        sim.run(5).unwrap();
        assert!((morale_of(&sim, "Elena") - (100.0 - 4.8)).abs() < 1e-9);
    }

    #[test]
    fn ambient_loss_from_dread() {
        let mut sim = sim();
        sim.state_mut().advance_stage().unwrap();
        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();
        let after_entry = morale_of(&sim, "Marcus");
        sim.run(100).unwrap();
        // Scholar resilience 1.0, 0.02 per second.
        assert!((after_entry - morale_of(&sim, "Marcus") - 2.0).abs() < 1e-6);
    }

    #[test]
    fn broken_companion_departs_and_is_kept() {
        let mut sim = sim();
        let id = sim.state().find_companion("Quinn").unwrap().id;
        sim.state_mut().companion_mut(id).unwrap().morale = Meter::new(5.0);
        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();

        let quinn = sim.state().companion(id).unwrap();
        assert!(!quinn.active);
        assert_eq!(quinn.morale.value(), 0.0);
        assert_eq!(sim.state().companions().len(), 5);
        assert_eq!(sim.events().events_for_companion(id).len(), 2);

        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.events().events_labeled("companion_departed").len(), 1);
    }

    #[test]
    fn queued_adjustment_is_applied() {
        let mut sim = sim();
        let id = sim.state().find_companion("Tobias").unwrap().id;
        sim.state_mut().companion_mut(id).unwrap().morale = Meter::new(50.0);
        sim.get_system_mut::<MoraleSystem>()
            .unwrap()
            .queue_adjustment(id, 10.0);
        sim.tick().unwrap();
        assert_eq!(morale_of(&sim, "Tobias"), 60.0);
        let healer = sim.state().companion(id).unwrap();
        assert_eq!(healer.archetype, Archetype::Healer);
    }
}
