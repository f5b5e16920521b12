use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companion::{Companion, CompanionId};
use crate::error::{DlError, DlResult};
use crate::player::PlayerState;
use crate::quest::{ObjectiveContext, Quest};
use crate::stage::{NarrativeStage, StageTransition};
use crate::world::HexWorld;

/// Metadata about the session itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Display name of the run.
    pub name: String,
    /// Seed the world was generated from.
    pub seed: u64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl SessionMeta {
    /// Create session metadata stamped with the current time.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            created_at: Utc::now(),
        }
    }
}

/// The single store every system reads from.
///
/// The narrative stage is private: [`GameState::advance_stage`] is the only
/// write path and it moves exactly one step forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session metadata.
    pub meta: SessionMeta,
    /// The hex map.
    pub world: HexWorld,
    /// The player.
    pub player: PlayerState,
    companions: Vec<Companion>,
    stage: NarrativeStage,
    /// The one quest currently in progress.
    pub active_quest: Option<Quest>,
    /// Finished and abandoned quests, oldest first.
    pub quest_log: Vec<Quest>,
    /// Narrative flags set by dialogue and events.
    pub flags: HashSet<String>,
}

impl GameState {
    /// A fresh session at Peace with the default party, player at the origin.
    pub fn new(meta: SessionMeta, radius: u32) -> Self {
        let world = HexWorld::generate(radius, NarrativeStage::Peace, meta.seed);
        Self {
            meta,
            world,
            player: PlayerState::default(),
            companions: Companion::default_party(),
            stage: NarrativeStage::Peace,
            active_quest: None,
            quest_log: Vec::new(),
            flags: HashSet::new(),
        }
    }

    /// Current narrative stage.
    pub fn stage(&self) -> NarrativeStage {
        self.stage
    }

    /// Move the story one stage forward and re-skin the world to match.
    pub fn advance_stage(&mut self) -> DlResult<StageTransition> {
        let transition = self.stage.advance()?;
        self.stage = transition.to();
        self.world.restage(self.stage);
        Ok(transition)
    }

    /// Add a companion. Names are unique, case-insensitive.
    pub fn add_companion(&mut self, companion: Companion) -> DlResult<CompanionId> {
        if self.find_companion(&companion.name).is_some() {
            return Err(DlError::DuplicateCompanion(companion.name));
        }
        let id = companion.id;
        self.companions.push(companion);
        Ok(id)
    }

    /// Every companion, including those who have left.
    pub fn companions(&self) -> &[Companion] {
        &self.companions
    }

    /// Mutable access to every companion.
    pub fn companions_mut(&mut self) -> &mut [Companion] {
        &mut self.companions
    }

    /// Companions still with the party.
    pub fn active_companions(&self) -> impl Iterator<Item = &Companion> {
        self.companions.iter().filter(|c| c.active)
    }

    /// Look up a companion by ID.
    pub fn companion(&self, id: CompanionId) -> Option<&Companion> {
        self.companions.iter().find(|c| c.id == id)
    }

    /// Mutable lookup by ID.
    pub fn companion_mut(&mut self, id: CompanionId) -> Option<&mut Companion> {
        self.companions.iter_mut().find(|c| c.id == id)
    }

    /// Find a companion by name (case-insensitive).
    pub fn find_companion(&self, name: &str) -> Option<&Companion> {
        self.companions
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Whether a narrative flag is set.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    /// Set a narrative flag.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }

    /// Facts for checking quest objectives at the given session time.
    pub fn objective_context(&self, elapsed_secs: f64) -> ObjectiveContext<'_> {
        ObjectiveContext {
            position: self.player.position,
            distance_traveled: self.player.distance_traveled,
            elapsed_secs,
            flags: &self.flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::companion::Archetype;
    use crate::hex::HexCoord;
    use crate::tile::TileKind;

    fn state() -> GameState {
        GameState::new(SessionMeta::new("Test", 7), 10)
    }

    #[test]
    fn new_session_starts_at_peace() {
        let s = state();
        assert_eq!(s.stage(), NarrativeStage::Peace);
        assert_eq!(s.player.position, HexCoord::ORIGIN);
        assert_eq!(s.active_companions().count(), 5);
        assert!(s.active_quest.is_none());
    }

    #[test]
    fn advance_is_monotonic_and_restages_world() {
        let mut s = state();
        let mut previous = s.stage();
        while let Ok(t) = s.advance_stage() {
            assert_eq!(t.from(), previous);
            assert!(t.to() > previous);
            assert_eq!(s.world.stage(), t.to());
            previous = t.to();
        }
        assert_eq!(s.stage(), NarrativeStage::Horror);
        assert!(s.world.count_of(TileKind::Void) > 0);
        assert!(matches!(s.advance_stage(), Err(DlError::FinalStage)));
        assert_eq!(s.stage(), NarrativeStage::Horror);
    }

    #[test]
    fn companion_names_are_unique() {
        let mut s = state();
        let dup = Companion::new("elena", Archetype::Healer, Rgb::new(0, 0, 0));
        assert!(matches!(
            s.add_companion(dup),
            Err(DlError::DuplicateCompanion(_))
        ));
        assert!(s.find_companion("ELENA").is_some());
    }

    #[test]
    fn inactive_companions_are_kept() {
        let mut s = state();
        let id = s.companions()[0].id;
        s.companion_mut(id).unwrap().deactivate();
        assert_eq!(s.active_companions().count(), 4);
        assert_eq!(s.companions().len(), 5);
        assert!(!s.companion(id).unwrap().active);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut s = state();
        s.advance_stage().unwrap();
        s.set_flag("saw_the_bell");
        let json = serde_json::to_string(&s).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stage(), NarrativeStage::Unease);
        assert_eq!(back.world.stage(), NarrativeStage::Unease);
        assert!(back.has_flag("saw_the_bell"));
        assert_eq!(back.companions().len(), 5);
    }
}
