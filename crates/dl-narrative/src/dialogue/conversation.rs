//! A live exchange with one companion.

use dl_core::quest::talked_to_flag;
use dl_core::{Companion, CompanionId, GameState};
use dl_simulation::Simulation;
use tracing::debug;

use super::book::{Choice, Dialogue, DialogueBook};
use super::effect::Effect;
use crate::error::{NarrativeError, NarrativeResult};
use crate::resolver::resolve_companion;

/// Flag set once a dialogue has been shown.
pub fn seen_flag(dialogue_id: &str) -> String {
    format!("seen:{dialogue_id}")
}

/// Flag set once a choice has been picked.
pub fn chose_flag(dialogue_id: &str, index: usize) -> String {
    format!("chose:{dialogue_id}:{index}")
}

/// What picking a choice did.
///
/// Flags are set at once. Morale, sanity and stage changes are queued with
/// their systems and land on the next tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceOutcome {
    /// What the companion says back.
    pub response: String,
    /// Morale changes queued for the speaker.
    pub morale_adjustments: Vec<(CompanionId, f64)>,
    /// Sanity loss queued for the player.
    pub sanity_drain: f64,
    /// Whether the choice asked the story to move forward.
    pub stage_advance_requested: bool,
    /// Whether the conversation ended with this choice.
    pub finished: bool,
}

impl ChoiceOutcome {
    // The stage request goes to the stage system, which stays the only writer
    // of the stage.
    fn forward(&self, sim: &mut Simulation) {
        for &(id, delta) in &self.morale_adjustments {
            if !sim.queue_morale_adjustment(id, delta) {
                debug!(%id, delta, "morale change dropped, no morale system");
            }
        }
        if self.sanity_drain > 0.0 && !sim.queue_sanity_drain(self.sanity_drain) {
            debug!(amount = self.sanity_drain, "sanity drain dropped, no sanity system");
        }
        if self.stage_advance_requested && !sim.request_stage_advance() {
            debug!("stage advance requested but no stage system is running");
        }
    }
}

/// A conversation in progress.
#[derive(Debug, Clone)]
pub struct Conversation<'a> {
    book: &'a DialogueBook,
    companion: CompanionId,
    speaker: String,
    current: &'a Dialogue,
    finished: bool,
}

impl<'a> Conversation<'a> {
    /// Start talking to the companion whose name best matches `name`.
    ///
    /// Sets the `talked_to` flag for quests and marks the opening dialogue seen.
    pub fn open(sim: &mut Simulation, book: &'a DialogueBook, name: &str) -> NarrativeResult<Self> {
        let state = sim.state();
        let id = resolve_companion(state, name)
            .ok_or_else(|| NarrativeError::CompanionNotFound(name.to_string()))?;
        let companion = speaker(state, id, name)?;
        let speaker_name = companion.name.clone();
        let current = book
            .opening_for(state, companion)
            .ok_or_else(|| NarrativeError::NoDialogue(speaker_name.clone()))?;

        sim.set_flag(talked_to_flag(&speaker_name));
        sim.set_flag(seen_flag(&current.id));
        debug!(speaker = %speaker_name, dialogue = %current.id, "conversation opened");

        Ok(Self {
            book,
            companion: id,
            speaker: speaker_name,
            current,
            finished: false,
        })
    }

    /// The companion's display name.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// The companion's ID.
    pub fn companion(&self) -> CompanionId {
        self.companion
    }

    /// The dialogue being shown.
    pub fn dialogue(&self) -> &'a Dialogue {
        self.current
    }

    /// The dialogue text with the speaker's name filled in.
    pub fn text(&self) -> String {
        self.current.render(&self.speaker)
    }

    /// Whether the conversation has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Choices whose conditions hold, with their index in the dialogue.
    pub fn choices(&self, state: &GameState) -> Vec<(usize, &'a Choice)> {
        let Some(companion) = state.companion(self.companion) else {
            return Vec::new();
        };
        self.current
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_available(state, companion))
            .collect()
    }

    /// Pick a choice by its index in the dialogue and apply its effects.
    pub fn choose(&mut self, sim: &mut Simulation, index: usize) -> NarrativeResult<ChoiceOutcome> {
        if self.finished {
            return Err(NarrativeError::ConversationOver);
        }
        let current = self.current;
        let choice = current
            .choices
            .get(index)
            .ok_or(NarrativeError::InvalidChoice(index))?;
        let companion = speaker(sim.state(), self.companion, &self.speaker)?;
        if !choice.is_available(sim.state(), companion) {
            return Err(NarrativeError::ChoiceUnavailable(index));
        }

        let mut outcome = ChoiceOutcome {
            response: choice.response.replace("{name}", &self.speaker),
            ..ChoiceOutcome::default()
        };
        for effect in &choice.effects {
            match effect {
                Effect::AdjustMorale { delta } => {
                    outcome.morale_adjustments.push((self.companion, *delta));
                }
                Effect::DrainSanity { amount } => outcome.sanity_drain += amount,
                Effect::SetFlag { key } => sim.set_flag(key.clone()),
                Effect::RequestStageAdvance => outcome.stage_advance_requested = true,
            }
        }
        sim.set_flag(chose_flag(&current.id, index));

        match choice.goto.as_deref() {
            Some(target) => {
                self.current = self
                    .book
                    .get(target)
                    .ok_or_else(|| NarrativeError::UnknownDialogue(target.to_string()))?;
                sim.set_flag(seen_flag(&self.current.id));
            }
            None => self.finished = true,
        }
        outcome.finished = self.finished;
        outcome.forward(sim);
        debug!(
            speaker = %self.speaker,
            choice = index,
            finished = self.finished,
            "choice made"
        );
        Ok(outcome)
    }
}

fn speaker<'s>(state: &'s GameState, id: CompanionId, name: &str) -> NarrativeResult<&'s Companion> {
    let companion = state
        .companion(id)
        .ok_or_else(|| NarrativeError::CompanionNotFound(name.to_string()))?;
    if !companion.active {
        return Err(NarrativeError::CompanionInactive(companion.name.clone()));
    }
    Ok(companion)
}
