//! Condition evaluation for dialogue branches.

use dl_core::{Companion, GameState, NarrativeStage, QuestStatus};
use serde::{Deserialize, Serialize};

/// A condition evaluated against the game state and the companion speaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The story has reached at least this stage.
    StageAtLeast {
        /// Minimum stage.
        stage: NarrativeStage,
    },
    /// The story is at exactly this stage.
    StageIs {
        /// Required stage.
        stage: NarrativeStage,
    },
    /// The speaker's morale is below a value.
    MoraleBelow {
        /// Exclusive upper bound.
        value: f64,
    },
    /// The speaker's morale is at or above a value.
    MoraleAtLeast {
        /// Inclusive lower bound.
        value: f64,
    },
    /// The player's sanity is below a value.
    SanityBelow {
        /// Exclusive upper bound.
        value: f64,
    },
    /// A narrative flag is set.
    FlagSet {
        /// Flag key.
        key: String,
    },
    /// The given quest is the active, unfinished quest.
    QuestActive {
        /// Quest ID.
        quest: String,
    },
    /// Logical NOT.
    Not(Box<Condition>),
    /// Logical AND.
    And(Vec<Condition>),
    /// Logical OR.
    Or(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Evaluate the condition against the current state.
    pub fn evaluate(&self, state: &GameState, speaker: &Companion) -> bool {
        match self {
            Condition::StageAtLeast { stage } => state.stage() >= *stage,
            Condition::StageIs { stage } => state.stage() == *stage,
            Condition::MoraleBelow { value } => speaker.morale.value() < *value,
            Condition::MoraleAtLeast { value } => speaker.morale.value() >= *value,
            Condition::SanityBelow { value } => state.player.sanity.value() < *value,
            Condition::FlagSet { key } => state.has_flag(key),
            Condition::QuestActive { quest } => state
                .active_quest
                .as_ref()
                .is_some_and(|q| q.id.0 == *quest && q.status == QuestStatus::Active),
            Condition::Not(inner) => !inner.evaluate(state, speaker),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(state, speaker)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.evaluate(state, speaker)),
            Condition::Always => true,
        }
    }

    /// Shorthand for `Not(FlagSet { key })`.
    pub fn flag_unset(key: impl Into<String>) -> Self {
        Condition::Not(Box::new(Condition::FlagSet { key: key.into() }))
    }

    /// Shorthand for "stage is before `stage`".
    pub fn stage_before(stage: NarrativeStage) -> Self {
        Condition::Not(Box::new(Condition::StageAtLeast { stage }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::{Meter, Quest, SessionMeta};

    fn state() -> GameState {
        GameState::new(SessionMeta::new("Test", 1), 4)
    }

    fn elena(state: &GameState) -> Companion {
        state.find_companion("Elena").unwrap().clone()
    }

    #[test]
    fn stage_conditions() {
        let mut s = state();
        let speaker = elena(&s);
        let at_least_dread = Condition::StageAtLeast {
            stage: NarrativeStage::Dread,
        };
        assert!(!at_least_dread.evaluate(&s, &speaker));
        s.advance_stage().unwrap();
        s.advance_stage().unwrap();
        assert!(at_least_dread.evaluate(&s, &speaker));
        assert!(
            Condition::StageIs {
                stage: NarrativeStage::Dread
            }
            .evaluate(&s, &speaker)
        );
        assert!(!Condition::stage_before(NarrativeStage::Dread).evaluate(&s, &speaker));
    }

    #[test]
    fn morale_reads_the_speaker() {
        let s = state();
        let mut speaker = elena(&s);
        speaker.morale = Meter::new(30.0);
        assert!(Condition::MoraleBelow { value: 40.0 }.evaluate(&s, &speaker));
        assert!(!Condition::MoraleAtLeast { value: 40.0 }.evaluate(&s, &speaker));
        assert!(Condition::MoraleAtLeast { value: 30.0 }.evaluate(&s, &speaker));
    }

    #[test]
    fn sanity_and_flags() {
        let mut s = state();
        let speaker = elena(&s);
        assert!(!Condition::SanityBelow { value: 50.0 }.evaluate(&s, &speaker));
        s.player.lose_sanity(60.0);
        assert!(Condition::SanityBelow { value: 50.0 }.evaluate(&s, &speaker));

        assert!(Condition::flag_unset("bell").evaluate(&s, &speaker));
        s.set_flag("bell");
        assert!(Condition::FlagSet { key: "bell".into() }.evaluate(&s, &speaker));
    }

    #[test]
    fn quest_active() {
        let mut s = state();
        let speaker = elena(&s);
        let cond = Condition::QuestActive {
            quest: "welcome-road".into(),
        };
        assert!(!cond.evaluate(&s, &speaker));
        s.active_quest = Some(Quest::for_stage(NarrativeStage::Peace));
        assert!(cond.evaluate(&s, &speaker));
        s.active_quest.as_mut().unwrap().status = QuestStatus::Completed;
        assert!(!cond.evaluate(&s, &speaker));
    }

    #[test]
    fn logical_combinators() {
        let mut s = state();
        let speaker = elena(&s);
        s.set_flag("a");
        let a = Condition::FlagSet { key: "a".into() };
        let b = Condition::FlagSet { key: "b".into() };
        assert!(!Condition::And(vec![a.clone(), b.clone()]).evaluate(&s, &speaker));
        assert!(Condition::Or(vec![a.clone(), b.clone()]).evaluate(&s, &speaker));
        assert!(Condition::Not(Box::new(b)).evaluate(&s, &speaker));
        assert!(Condition::And(vec![]).evaluate(&s, &speaker));
        assert!(Condition::default().evaluate(&s, &speaker));
    }
}
