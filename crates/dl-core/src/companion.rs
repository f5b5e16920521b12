use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Rgb;
use crate::meter::Meter;

/// Unique identifier for a companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanionId(pub Uuid);

impl CompanionId {
    /// Generate a new random companion ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompanionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Temperament of a companion, which scales how hard the dark hits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Steady under pressure.
    Stalwart,
    /// Tends to others, and to themselves.
    Healer,
    /// Curious, brittle when answers run out.
    Scholar,
    /// Faith that cracks loudly.
    Zealot,
    /// Here for the coin, gone when it stops being worth it.
    Mercenary,
}

impl Archetype {
    /// Multiplier applied to every morale loss.
    pub fn resilience(self) -> f64 {
        match self {
            Self::Stalwart => 0.6,
            Self::Healer => 0.8,
            Self::Scholar => 1.0,
            Self::Zealot => 1.2,
            Self::Mercenary => 1.4,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stalwart => "stalwart",
            Self::Healer => "healer",
            Self::Scholar => "scholar",
            Self::Zealot => "zealot",
            Self::Mercenary => "mercenary",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A member of the player's party.
///
/// `active == false` removes a companion from the field without deleting it,
/// so its history is still there for the journal and the quest log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    /// Unique identifier.
    pub id: CompanionId,
    /// Display name.
    pub name: String,
    /// Whether the companion is still with the party.
    pub active: bool,
    /// Psychological state, 0 to 100.
    pub morale: Meter,
    /// Accumulated damage, 0 to 100. Only ever grows.
    pub trauma: Meter,
    /// Base sprite tint.
    pub color: Rgb,
    /// Temperament.
    pub archetype: Archetype,
}

impl Companion {
    /// Create a fresh, active companion at full morale with no trauma.
    pub fn new(name: impl Into<String>, archetype: Archetype, color: Rgb) -> Self {
        Self {
            id: CompanionId::new(),
            name: name.into(),
            active: true,
            morale: Meter::full(),
            trauma: Meter::empty(),
            color,
            archetype,
        }
    }

    /// The party the player sets out with.
    pub fn default_party() -> Vec<Companion> {
        vec![
            Companion::new("Elena", Archetype::Stalwart, Rgb::new(0x4a, 0x90, 0xe2)),
            Companion::new("Marcus", Archetype::Scholar, Rgb::new(0xd4, 0xa0, 0x17)),
            Companion::new("Quinn", Archetype::Mercenary, Rgb::new(0x8b, 0x5a, 0x2b)),
            Companion::new("Sister Ruth", Archetype::Zealot, Rgb::new(0xe8, 0xe8, 0xf0)),
            Companion::new("Tobias", Archetype::Healer, Rgb::new(0x5c, 0xb8, 0x5c)),
        ]
    }

    /// Apply a morale loss scaled by resilience. Trauma grows by half the loss.
    ///
    /// Returns the morale actually lost.
    pub fn suffer(&mut self, base_loss: f64) -> f64 {
        if !self.active || base_loss <= 0.0 {
            return 0.0;
        }
        let before = self.morale.value();
        let after = self.morale.drain(base_loss * self.archetype.resilience());
        let lost = before - after;
        self.trauma.adjust(lost / 2.0);
        lost
    }

    /// Apply a signed morale change without touching trauma.
    pub fn adjust_morale(&mut self, delta: f64) -> f64 {
        if !self.active {
            return self.morale.value();
        }
        self.morale.adjust(delta)
    }

    /// Whether the companion has nothing left to give.
    pub fn is_broken(&self) -> bool {
        self.morale.is_depleted()
    }

    /// Take the companion off the field. History is kept.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion(archetype: Archetype) -> Companion {
        Companion::new("Test", archetype, Rgb::new(10, 20, 30))
    }

    #[test]
    fn new_companion_is_fresh() {
        let c = companion(Archetype::Scholar);
        assert!(c.active);
        assert_eq!(c.morale.value(), 100.0);
        assert_eq!(c.trauma.value(), 0.0);
    }

    #[test]
    fn suffer_scales_with_resilience() {
        let mut stalwart = companion(Archetype::Stalwart);
        let mut merc = companion(Archetype::Mercenary);
        let a = stalwart.suffer(10.0);
        let b = merc.suffer(10.0);
        assert!((a - 6.0).abs() < 1e-9);
        assert!((b - 14.0).abs() < 1e-9);
        assert!((merc.trauma.value() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn suffer_clamps_at_zero() {
        let mut c = companion(Archetype::Mercenary);
        c.suffer(500.0);
        assert_eq!(c.morale.value(), 0.0);
        assert!(c.is_broken());
        assert!((c.trauma.value() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn inactive_companions_are_untouched() {
        let mut c = companion(Archetype::Zealot);
        c.deactivate();
        assert_eq!(c.suffer(20.0), 0.0);
        assert_eq!(c.adjust_morale(-20.0), 100.0);
        assert_eq!(c.morale.value(), 100.0);
    }

    #[test]
    fn default_party_has_unique_names() {
        let party = Companion::default_party();
        assert_eq!(party.len(), 5);
        let mut names: Vec<_> = party.iter().map(|c| c.name.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn companion_id_display_is_short() {
        let id = CompanionId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }
}
