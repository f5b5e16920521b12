use dl_core::{GameState, NarrativeStage, Quest, QuestStatus};
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Keeps exactly one quest active per stage and checks its objectives each tick.
#[derive(Debug, Default)]
pub struct QuestSystem {
    last_stage: Option<NarrativeStage>,
}

impl QuestSystem {
    /// Create a quest system. The first quest is assigned on init.
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(ctx: &mut SimContext<'_>, stage: NarrativeStage) {
        let quest = Quest::for_stage(stage)
            .started(ctx.state.player.distance_traveled, ctx.elapsed_secs());
        debug!(quest = %quest.id, %stage, "quest assigned");
        let id = quest.id.clone();
        let title = quest.title.clone();
        ctx.state.active_quest = Some(quest);
        ctx.emit(
            SimEventKind::QuestAssigned { quest: id },
            format!("New quest: {title}"),
        );
    }

    fn abandon_active(ctx: &mut SimContext<'_>) {
        let Some(mut quest) = ctx.state.active_quest.take() else {
            return;
        };
        if quest.status == QuestStatus::Active {
            quest.status = QuestStatus::Abandoned;
            debug!(quest = %quest.id, "quest abandoned");
            ctx.emit(
                SimEventKind::QuestAbandoned {
                    quest: quest.id.clone(),
                },
                format!("Abandoned: {}", quest.title),
            );
        }
        ctx.state.quest_log.push(quest);
    }

    /// Evaluate the active quest against the state. Returns newly completed task indices.
    fn evaluate(state: &mut GameState, elapsed_secs: f64) -> Option<(Vec<usize>, bool)> {
        let mut quest = state.active_quest.take()?;
        let done = quest.update(&state.objective_context(elapsed_secs));
        let complete = quest.is_complete();
        state.active_quest = Some(quest);
        Some((done, complete))
    }
}

impl System for QuestSystem {
    fn name(&self) -> &str {
        "quest"
    }

    fn init(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let stage = ctx.state.stage();
        self.last_stage = Some(stage);
        if ctx.state.active_quest.is_none() {
            Self::assign(ctx, stage);
        }
        Ok(())
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let stage = ctx.state.stage();
        if self.last_stage != Some(stage) {
            Self::abandon_active(ctx);
            Self::assign(ctx, stage);
            self.last_stage = Some(stage);
        }

        let elapsed = ctx.elapsed_secs();
        let Some((done, complete)) = Self::evaluate(ctx.state, elapsed) else {
            return Ok(());
        };
        let Some(quest) = ctx.state.active_quest.clone() else {
            return Ok(());
        };
        for task in done {
            ctx.emit(
                SimEventKind::QuestTaskCompleted {
                    quest: quest.id.clone(),
                    task,
                },
                format!("Done: {}", quest.tasks[task].description),
            );
        }
        if complete {
            debug!(quest = %quest.id, "quest completed");
            ctx.emit(
                SimEventKind::QuestCompleted {
                    quest: quest.id.clone(),
                },
                format!("Completed: {}", quest.title),
            );
            ctx.state.active_quest = None;
            ctx.state.quest_log.push(quest);
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
    use dl_core::quest::talked_to_flag;
    use dl_core::{HexCoord, QuestId, SessionMeta};

    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Simulation;

    fn sim() -> Simulation {
        let mut sim = Simulation::new(
            GameState::new(SessionMeta::new("Test", 9), 10),
            SimConfig::default(),
        );
        sim.add_system(QuestSystem::new());
        sim.init().unwrap();
        sim
    }

    fn active_id(sim: &Simulation) -> Option<String> {
        sim.state().active_quest.as_ref().map(|q| q.id.0.clone())
    }

    #[test]
    fn first_quest_assigned_on_init() {
        let sim = sim();
        assert_eq!(active_id(&sim).as_deref(), Some("welcome-road"));
        assert_eq!(sim.events().events_labeled("quest_assigned").len(), 1);
    }

    #[test]
    fn tasks_complete_once() {
        let mut sim = sim();
        sim.state_mut().set_flag(talked_to_flag("Elena"));
        sim.tick().unwrap();
        sim.tick().unwrap();
        let quest = sim.state().active_quest.as_ref().unwrap();
        assert_eq!(quest.tasks_done(), 1);
        assert_eq!(sim.events().events_labeled("quest_task_completed").len(), 1);
    }

    #[test]
    fn quest_completes_and_moves_to_log() {
        let mut sim = sim();
        sim.state_mut().set_flag(talked_to_flag("Elena"));
        for step in [
            HexCoord::new(1, 0),
            HexCoord::new(2, 0),
            HexCoord::new(3, 0),
        ] {
            sim.state_mut().player.step_to(step);
        }
        sim.tick().unwrap();
        for step in [HexCoord::new(2, 0), HexCoord::new(1, 0), HexCoord::ORIGIN] {
            sim.state_mut().player.step_to(step);
        }
        sim.tick().unwrap();

        assert!(sim.state().active_quest.is_none());
        assert_eq!(sim.state().quest_log.len(), 1);
        assert!(sim.state().quest_log[0].is_complete());
        assert_eq!(sim.events().events_labeled("quest_completed").len(), 1);
    }

    #[test]
    fn short_round_trip_does_not_finish_the_road() {
        let mut sim = sim();
        sim.state_mut().set_flag(talked_to_flag("Elena"));
        sim.state_mut().player.step_to(HexCoord::new(1, 0));
        sim.state_mut().player.step_to(HexCoord::ORIGIN);
        sim.tick().unwrap();

        let quest = sim.state().active_quest.as_ref().unwrap();
        assert_eq!(quest.tasks_done(), 1);
        assert!(!quest.tasks[2].done);
        assert!(sim.events().events_labeled("quest_completed").is_empty());
    }

    #[test]
    fn stage_change_abandons_and_reassigns() {
        let mut sim = sim();
        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();

        assert_eq!(active_id(&sim).as_deref(), Some("treeline-whispers"));
        let log = &sim.state().quest_log;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, QuestId("welcome-road".into()));
        assert_eq!(log[0].status, QuestStatus::Abandoned);
        assert_eq!(sim.events().events_labeled("quest_abandoned").len(), 1);
    }

    #[test]
    fn completed_quest_is_not_abandoned() {
        let mut sim = sim();
        sim.state_mut().active_quest.as_mut().unwrap().status = QuestStatus::Completed;
        sim.state_mut().advance_stage().unwrap();
        sim.tick().unwrap();
        assert!(sim.events().events_labeled("quest_abandoned").is_empty());
        assert_eq!(sim.state().quest_log[0].status, QuestStatus::Completed);
    }

    #[test]
    fn survive_measures_from_assignment() {
        let mut sim = sim();
        sim.run(10).unwrap();
        for _ in 0..2 {
            sim.state_mut().advance_stage().unwrap();
        }
        sim.tick().unwrap();
        assert_eq!(active_id(&sim).as_deref(), Some("drowned-chapel"));
        let quest = sim.state().active_quest.as_ref().unwrap();
        assert!((quest.started_at - 11.0).abs() < f64::EPSILON);
        sim.run(119).unwrap();
        let quest = sim.state().active_quest.as_ref().unwrap();
        assert_eq!(quest.tasks_done(), 0);
        sim.tick().unwrap();
        let quest = sim.state().active_quest.as_ref().unwrap();
        assert_eq!(quest.tasks_done(), 1);
    }
}
