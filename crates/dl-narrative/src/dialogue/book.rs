//! Dialogue entries, choices, and the book that holds them.

use dl_core::{Archetype, Companion, GameState, NarrativeStage};
use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::effect::Effect;
use crate::error::{NarrativeError, NarrativeResult};

/// One beat of conversation with a companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Unique identifier for this dialogue.
    pub id: String,
    /// Restrict to a companion by name.
    pub speaker: Option<String>,
    /// Restrict to companions of an archetype.
    pub archetype: Option<Archetype>,
    /// Conditions that must all hold for this dialogue to open.
    pub conditions: Vec<Condition>,
    /// What the companion says. `{name}` is replaced with the speaker's name.
    pub text: String,
    /// Available choices.
    pub choices: Vec<Choice>,
    /// Only reachable through a choice's `goto`, never opened directly.
    pub followup: bool,
}

impl Dialogue {
    /// Create a new dialogue with the given ID and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker: None,
            archetype: None,
            conditions: Vec::new(),
            text: text.into(),
            choices: Vec::new(),
            followup: false,
        }
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Restrict to an archetype.
    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = Some(archetype);
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Mark as reachable only through `goto`.
    pub fn as_followup(mut self) -> Self {
        self.followup = true;
        self
    }

    /// Whether this dialogue is written for the given companion.
    pub fn fits(&self, companion: &Companion) -> bool {
        let name_ok = self
            .speaker
            .as_ref()
            .is_none_or(|s| s.eq_ignore_ascii_case(&companion.name));
        let archetype_ok = self.archetype.is_none_or(|a| a == companion.archetype);
        name_ok && archetype_ok
    }

    /// Whether the dialogue can be shown now.
    pub fn is_available(&self, state: &GameState, speaker: &Companion) -> bool {
        self.fits(speaker) && self.conditions.iter().all(|c| c.evaluate(state, speaker))
    }

    /// The text with the speaker's name filled in.
    pub fn render(&self, speaker: &str) -> String {
        self.text.replace("{name}", speaker)
    }
}

/// A single choice in a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The text shown to the player.
    pub text: String,
    /// Conditions that must be met to show this choice.
    pub conditions: Vec<Condition>,
    /// The response text shown when this choice is selected.
    pub response: String,
    /// Effects to apply when this choice is selected.
    pub effects: Vec<Effect>,
    /// Dialogue ID to branch to after this choice (if any).
    pub goto: Option<String>,
}

impl Choice {
    /// Create a new choice with the given text and response.
    pub fn new(text: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conditions: Vec::new(),
            response: response.into(),
            effects: Vec::new(),
            goto: None,
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the goto branch.
    pub fn with_goto(mut self, dialogue_id: impl Into<String>) -> Self {
        self.goto = Some(dialogue_id.into());
        self
    }

    /// Whether the choice can be picked now.
    pub fn is_available(&self, state: &GameState, speaker: &Companion) -> bool {
        self.conditions.iter().all(|c| c.evaluate(state, speaker))
    }
}

/// An ordered collection of dialogues. Earlier entries win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueBook {
    dialogues: Vec<Dialogue>,
}

impl DialogueBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dialogue.
    pub fn with(mut self, dialogue: Dialogue) -> Self {
        self.dialogues.push(dialogue);
        self
    }

    /// Look up a dialogue by ID.
    pub fn get(&self, id: &str) -> Option<&Dialogue> {
        self.dialogues.iter().find(|d| d.id == id)
    }

    /// All dialogues in order.
    pub fn dialogues(&self) -> &[Dialogue] {
        &self.dialogues
    }

    /// Number of dialogues.
    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// The first dialogue that can open with `speaker` right now.
    pub fn opening_for(&self, state: &GameState, speaker: &Companion) -> Option<&Dialogue> {
        self.dialogues
            .iter()
            .find(|d| !d.followup && d.is_available(state, speaker))
    }

    /// Check that IDs are unique and every `goto` points somewhere.
    pub fn validate(&self) -> NarrativeResult<()> {
        for (i, dialogue) in self.dialogues.iter().enumerate() {
            if self.dialogues[..i].iter().any(|d| d.id == dialogue.id) {
                return Err(NarrativeError::UnknownDialogue(format!(
                    "{} (duplicate)",
                    dialogue.id
                )));
            }
            for target in dialogue.choices.iter().filter_map(|c| c.goto.as_deref()) {
                if self.get(target).is_none() {
                    return Err(NarrativeError::UnknownDialogue(target.to_string()));
                }
            }
        }
        Ok(())
    }

    /// The dialogue shipped with the game, covering every stage.
    pub fn standard() -> Self {
        use NarrativeStage::*;

        Self::new()
            // Peace
            .with(
                Dialogue::new(
                    "elena-road",
                    "{name} shades her eyes against the sun. \"Good road. Good weather. I don't trust either.\"",
                )
                .with_speaker("Elena")
                .with_condition(Condition::StageIs { stage: Peace })
                .with_choice(
                    Choice::new("Where does it lead?", "\"East, to the old keep. Nobody's gone past it in years.\"")
                        .with_goto("elena-road-keep"),
                )
                .with_choice(
                    Choice::new("Let's keep moving.", "She nods and falls in beside you.")
                        .with_effect(Effect::AdjustMorale { delta: 2.0 }),
                ),
            )
            .with(
                Dialogue::new(
                    "elena-road-keep",
                    "\"The last ones who tried came back quiet. Not hurt. Just quiet.\"",
                )
                .with_speaker("Elena")
                .as_followup()
                .with_choice(
                    Choice::new("We'll be careful.", "\"We will.\" She doesn't sound sure.")
                        .with_effect(Effect::SetFlag {
                            key: "heard_of_the_keep".into(),
                        }),
                ),
            )
            .with(
                Dialogue::new(
                    "quinn-coin",
                    "{name} jingles a purse. \"Paid through the week. After that we talk again.\"",
                )
                .with_speaker("Quinn")
                .with_condition(Condition::stage_before(Dread))
                .with_condition(Condition::flag_unset("promised_quinn"))
                .with_choice(
                    Choice::new("You'll be paid double.", "A grin. \"Now that's a road I like.\"")
                        .with_effect(Effect::AdjustMorale { delta: 5.0 })
                        .with_effect(Effect::SetFlag {
                            key: "promised_quinn".into(),
                        }),
                )
                .with_choice(Choice::new("Coin is coin.", "\"Aye. It is.\"")),
            )
            .with(
                Dialogue::new(
                    "marcus-maps",
                    "{name} unrolls a map. \"The distances are wrong. Every hour the keep is further away.\"",
                )
                .with_archetype(Archetype::Scholar)
                .with_condition(Condition::stage_before(Dread))
                .with_choice(
                    Choice::new(
                        "Follow the silence.",
                        "You step off the road. The birds stop singing all at once.",
                    )
                    .with_condition(Condition::StageIs { stage: Unease })
                    .with_effect(Effect::DrainSanity { amount: 3.0 })
                    .with_effect(Effect::SetFlag {
                        key: "followed_silence".into(),
                    })
                    .with_effect(Effect::RequestStageAdvance),
                )
                .with_choice(
                    Choice::new("Maps lie. Trust your feet.", "He rolls it up, unconvinced.")
                        .with_effect(Effect::AdjustMorale { delta: -1.0 }),
                ),
            )
            // Unease
            .with(
                Dialogue::new(
                    "ruth-prayer",
                    "{name} kneels at the roadside. \"Something listens when I pray now. Something new.\"",
                )
                .with_speaker("Sister Ruth")
                .with_condition(Condition::StageAtLeast { stage: Unease })
                .with_condition(Condition::stage_before(Terror))
                .with_choice(
                    Choice::new("Pray with her.", "The words feel heavier than they should.")
                        .with_effect(Effect::AdjustMorale { delta: 4.0 })
                        .with_effect(Effect::DrainSanity { amount: 2.0 }),
                )
                .with_choice(
                    Choice::new("Get up. We're leaving.", "She rises slowly, still whispering.")
                        .with_effect(Effect::AdjustMorale { delta: -2.0 }),
                ),
            )
            // Dread
            .with(
                Dialogue::new("dread-bell", "\"Do you hear it? The bell. There's no tower, but there's a bell.\"")
                    .with_condition(Condition::StageIs { stage: Dread })
                    .with_condition(Condition::flag_unset("answered_the_bell"))
                    .with_choice(
                        Choice::new("Go toward it.", "Each toll lands inside your ribs.")
                            .with_effect(Effect::DrainSanity { amount: 5.0 })
                            .with_effect(Effect::SetFlag {
                                key: "answered_the_bell".into(),
                            })
                            .with_effect(Effect::RequestStageAdvance),
                    )
                    .with_choice(
                        Choice::new("Cover your ears.", "It doesn't help. It was never in your ears.")
                            .with_effect(Effect::AdjustMorale { delta: -3.0 }),
                    ),
            )
            // Terror
            .with(
                Dialogue::new("terror-breaking", "{name} is shaking. \"I can't. I can't do this anymore.\"")
                    .with_condition(Condition::StageAtLeast { stage: Terror })
                    .with_condition(Condition::MoraleBelow { value: 40.0 })
                    .with_choice(
                        Choice::new("Hold them until it passes.", "Slowly, the shaking stops. Yours doesn't.")
                            .with_effect(Effect::AdjustMorale { delta: 8.0 })
                            .with_effect(Effect::DrainSanity { amount: 4.0 }),
                    )
                    .with_choice(
                        Choice::new("We don't have time for this.", "{name} goes silent.")
                            .with_effect(Effect::AdjustMorale { delta: -5.0 }),
                    ),
            )
            .with(
                Dialogue::new(
                    "tobias-wounded",
                    "{name} wipes his hands. \"I can keep them breathing. I can't keep them here.\"",
                )
                .with_speaker("Tobias")
                .with_condition(Condition::StageIs { stage: Terror })
                .with_choice(
                    Choice::new("Do what you can.", "He gets back to work without a word.")
                        .with_effect(Effect::AdjustMorale { delta: 3.0 }),
                ),
            )
            .with(
                Dialogue::new("terror-close", "\"Stay close. Whatever you see out there, stay close.\"")
                    .with_condition(Condition::StageIs { stage: Terror })
                    .with_choice(Choice::new("Keep going.", "You keep going.")),
            )
            // Horror
            .with(
                Dialogue::new("horror-name", "{name} looks at you too long. \"Is this still you?\"")
                    .with_condition(Condition::StageIs { stage: Horror })
                    .with_choice(
                        Choice::new("Say their name.", "Something in their face comes back.")
                            .with_effect(Effect::AdjustMorale { delta: 5.0 })
                            .with_effect(Effect::DrainSanity { amount: 6.0 }),
                    )
                    .with_choice(
                        Choice::new("Say nothing.", "They turn away first.")
                            .with_effect(Effect::AdjustMorale { delta: -10.0 }),
                    ),
            )
            // Any stage
            .with(
                Dialogue::new(
                    "tobias-herbs",
                    "{name} presses a bundle of dried leaves into your hand. \"For sleep. If it comes.\"",
                )
                .with_archetype(Archetype::Healer)
                .with_choice(
                    Choice::new("Thank him.", "He almost smiles.")
                        .with_effect(Effect::AdjustMorale { delta: 3.0 }),
                ),
            )
            .with(
                Dialogue::new("idle", "{name} nods, but says nothing.")
                    .with_choice(Choice::new("Walk on.", "You walk on.")),
            )
    }
}
