use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::stage::NarrativeStage;

/// Terrain of a single hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Open meadow.
    Grass,
    /// Woodland, slow going.
    Forest,
    /// Bog, slowest walkable terrain.
    Swamp,
    /// Bare rock.
    Stone,
    /// Burnt ground.
    Ash,
    /// Ossuary fields.
    Bone,
    /// Lakes and rivers. Impassable.
    Water,
    /// A rift in the ground. Impassable.
    Chasm,
    /// Where the world has stopped existing. Impassable.
    Void,
}

impl TileKind {
    /// Whether the player can stand on this tile.
    pub fn is_walkable(self) -> bool {
        self.move_cost().is_some()
    }

    /// Cost of stepping onto this tile, or `None` if impassable.
    pub fn move_cost(self) -> Option<u32> {
        match self {
            Self::Grass | Self::Stone | Self::Ash => Some(1),
            Self::Forest | Self::Bone => Some(2),
            Self::Swamp => Some(3),
            Self::Water | Self::Chasm | Self::Void => None,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Forest => "forest",
            Self::Swamp => "swamp",
            Self::Stone => "stone",
            Self::Ash => "ash",
            Self::Bone => "bone",
            Self::Water => "water",
            Self::Chasm => "chasm",
            Self::Void => "void",
        }
    }

    /// Base terrain for a band at a stage, before obstacles are placed.
    pub fn for_band(band: Band, stage: NarrativeStage) -> TileKind {
        use TileKind::*;
        const TABLE: [[TileKind; 4]; 5] = [
            [Grass, Grass, Forest, Stone],
            [Grass, Forest, Forest, Swamp],
            [Forest, Swamp, Swamp, Stone],
            [Swamp, Ash, Ash, Bone],
            [Ash, Bone, Bone, Void],
        ];
        TABLE[stage.index()][band.index()]
    }

    /// The impassable terrain that obstacles take at a stage.
    pub fn obstacle_for(stage: NarrativeStage) -> TileKind {
        match stage {
            NarrativeStage::Peace | NarrativeStage::Unease => Self::Water,
            NarrativeStage::Dread | NarrativeStage::Terror => Self::Chasm,
            NarrativeStage::Horror => Self::Void,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Concentric distance bands around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Distance 0 to 2.
    Heart,
    /// Distance 3 to 5.
    Inner,
    /// Distance 6 to 8.
    Middle,
    /// Distance 9 and beyond.
    Outer,
}

impl Band {
    /// The band a hex falls in.
    pub fn of(coord: HexCoord) -> Band {
        match coord.length() {
            0..=2 => Self::Heart,
            3..=5 => Self::Inner,
            6..=8 => Self::Middle,
            _ => Self::Outer,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Decorative scatter placed on a tile. Props never block movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    /// A lone tree.
    Tree,
    /// A boulder.
    Rock,
    /// Crumbled masonry.
    Ruin,
    /// A scatter of bones.
    Bones,
    /// A crude totem.
    Totem,
    /// A guttering lantern.
    Lantern,
}

impl Prop {
    /// Props that may appear at a stage.
    pub fn pool(stage: NarrativeStage) -> &'static [Prop] {
        match stage {
            NarrativeStage::Peace => &[Prop::Tree, Prop::Rock, Prop::Lantern],
            NarrativeStage::Unease => &[Prop::Tree, Prop::Rock, Prop::Ruin],
            NarrativeStage::Dread => &[Prop::Ruin, Prop::Rock, Prop::Bones],
            NarrativeStage::Terror => &[Prop::Bones, Prop::Totem, Prop::Ruin],
            NarrativeStage::Horror => &[Prop::Bones, Prop::Totem],
        }
    }

    /// Chance that a walkable tile carries a prop at a stage.
    pub fn density(stage: NarrativeStage) -> f64 {
        [0.18, 0.16, 0.14, 0.12, 0.10][stage.index()]
    }
}

/// A single hex of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Where the tile is.
    pub coord: HexCoord,
    /// Its terrain.
    pub kind: TileKind,
    /// Optional decoration.
    pub prop: Option<Prop>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impassable_kinds_have_no_cost() {
        for kind in [TileKind::Water, TileKind::Chasm, TileKind::Void] {
            assert!(!kind.is_walkable());
        }
        assert_eq!(TileKind::Swamp.move_cost(), Some(3));
        assert_eq!(TileKind::Grass.move_cost(), Some(1));
    }

    #[test]
    fn bands_by_distance() {
        assert_eq!(Band::of(HexCoord::ORIGIN), Band::Heart);
        assert_eq!(Band::of(HexCoord::new(2, 0)), Band::Heart);
        assert_eq!(Band::of(HexCoord::new(0, -3)), Band::Inner);
        assert_eq!(Band::of(HexCoord::new(6, -6)), Band::Middle);
        assert_eq!(Band::of(HexCoord::new(-9, 0)), Band::Outer);
    }

    #[test]
    fn band_table_darkens_with_stage() {
        assert_eq!(
            TileKind::for_band(Band::Heart, NarrativeStage::Peace),
            TileKind::Grass
        );
        assert_eq!(
            TileKind::for_band(Band::Heart, NarrativeStage::Horror),
            TileKind::Ash
        );
        assert_eq!(
            TileKind::for_band(Band::Outer, NarrativeStage::Horror),
            TileKind::Void
        );
    }

    #[test]
    fn heart_is_walkable_at_every_stage() {
        for stage in NarrativeStage::ALL {
            assert!(TileKind::for_band(Band::Heart, stage).is_walkable());
        }
    }

    #[test]
    fn every_stage_has_props() {
        for stage in NarrativeStage::ALL {
            assert!(!Prop::pool(stage).is_empty());
            assert!(Prop::density(stage) > 0.0);
        }
    }
}
