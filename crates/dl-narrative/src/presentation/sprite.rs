//! How companions and monsters look at a given moment.

use std::fmt;

use dl_core::{Companion, NarrativeStage, Rgb};
use serde::Serialize;

/// Morale below which a companion's sprite starts to flicker out.
pub const FLICKER_BELOW: f64 = 20.0;
/// Morale below which a companion trembles.
pub const TREMBLE_BELOW: f64 = 45.0;
/// Opacity of a companion at zero morale.
pub const MIN_OPACITY: f64 = 0.35;
/// Distance, in hexes, at which monsters fade to their faintest.
pub const MONSTER_FADE_DISTANCE: f64 = 10.0;

/// Looping sprite animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteAnimation {
    /// Standing still.
    Idle,
    /// A light, cheerful bounce.
    Bob,
    /// Shaking.
    Tremble,
    /// Fading in and out.
    Flicker,
}

impl SpriteAnimation {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Bob => "bob",
            Self::Tremble => "tremble",
            Self::Flicker => "flicker",
        }
    }
}

/// Resolved render parameters for one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteAppearance {
    /// Tint.
    pub color: Rgb,
    /// 0 (invisible) to 1 (solid).
    pub opacity: f64,
    /// Size multiplier.
    pub scale: f64,
    /// Animation to play.
    pub animation: SpriteAnimation,
}

/// Appearance of a companion, or `None` once they have left the party.
pub fn companion_appearance(
    companion: &Companion,
    stage: NarrativeStage,
) -> Option<SpriteAppearance> {
    if !companion.active {
        return None;
    }
    let trauma = companion.trauma.fraction();
    let morale = companion.morale.value();

    let color = companion
        .color
        .desaturate(trauma)
        .darken(stage.index() as f64 * 0.1);
    let opacity = MIN_OPACITY + (1.0 - MIN_OPACITY) * companion.morale.fraction();
    let animation = if morale < FLICKER_BELOW {
        SpriteAnimation::Flicker
    } else if morale < TREMBLE_BELOW || stage >= NarrativeStage::Terror {
        SpriteAnimation::Tremble
    } else if stage == NarrativeStage::Peace {
        SpriteAnimation::Bob
    } else {
        SpriteAnimation::Idle
    };

    Some(SpriteAppearance {
        color,
        opacity,
        scale: 1.0 - 0.1 * trauma,
        animation,
    })
}

/// The things that stalk the party once peace is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    /// A shape glimpsed at the edge of sight.
    Shade,
    /// Something that walked out of the water.
    Drowned,
    /// A figure with nothing behind the eyes.
    Hollow,
    /// Low to the ground and fast.
    Crawler,
    /// The dragon's shadow passing overhead.
    DragonShadow,
}

impl MonsterKind {
    /// Monsters that can appear at a stage.
    pub fn roster(stage: NarrativeStage) -> &'static [MonsterKind] {
        use MonsterKind::*;
        match stage {
            NarrativeStage::Peace => &[],
            NarrativeStage::Unease => &[Shade],
            NarrativeStage::Dread => &[Shade, Drowned],
            NarrativeStage::Terror => &[Drowned, Hollow, Crawler],
            NarrativeStage::Horror => &[Hollow, Crawler, DragonShadow],
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Shade => "shade",
            Self::Drowned => "drowned",
            Self::Hollow => "hollow",
            Self::Crawler => "crawler",
            Self::DragonShadow => "dragon shadow",
        }
    }

    fn base(self) -> (Rgb, f64) {
        match self {
            Self::Shade => (Rgb::new(0x60, 0x60, 0x70), 0.9),
            Self::Drowned => (Rgb::new(0x3d, 0x5a, 0x5a), 1.0),
            Self::Hollow => (Rgb::new(0xa0, 0x98, 0x90), 1.1),
            Self::Crawler => (Rgb::new(0x4a, 0x2a, 0x2a), 0.7),
            Self::DragonShadow => (Rgb::new(0x10, 0x08, 0x08), 3.0),
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Appearance of a monster `distance` hexes from the player.
///
/// Monsters solidify as the player closes in; beyond
/// [`MONSTER_FADE_DISTANCE`] they hold at a faint 0.1.
pub fn monster_appearance(
    kind: MonsterKind,
    stage: NarrativeStage,
    distance: u32,
) -> SpriteAppearance {
    let (color, scale) = kind.base();
    let opacity = (1.0 - f64::from(distance) / MONSTER_FADE_DISTANCE).clamp(0.1, 1.0);
    let animation = match kind {
        MonsterKind::Shade | MonsterKind::DragonShadow => SpriteAnimation::Flicker,
        _ if stage == NarrativeStage::Horror || distance <= 2 => SpriteAnimation::Tremble,
        _ => SpriteAnimation::Idle,
    };
    SpriteAppearance {
        color: color.darken(stage.index() as f64 * 0.05),
        opacity,
        scale,
        animation,
    }
}
