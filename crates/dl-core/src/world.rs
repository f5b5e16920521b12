use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::hex::{HexCoord, hex_count};
use crate::stage::NarrativeStage;
use crate::tile::{Band, Prop, Tile, TileKind};

/// Obstacle chance per stage, applied to hexes beyond the first ring.
const OBSTACLE_DENSITY: [f64; 5] = [0.06, 0.08, 0.10, 0.12, 0.15];

const OBSTACLE_SALT: u64 = 0x0b57_ac1e;
const PROP_SALT: u64 = 0x5ca7_7e4;

/// The hexagonal world: every hex within `radius` of the origin.
///
/// Tiles are a pure function of `(radius, stage, seed)`. Per-hex rolls are
/// seeded from the coordinate, so an obstacle stays in the same place as the
/// world darkens and only its terrain changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WorldParams", into = "WorldParams")]
pub struct HexWorld {
    radius: u32,
    seed: u64,
    stage: NarrativeStage,
    tiles: BTreeMap<HexCoord, Tile>,
}

/// The serialized form of a world: tiles are regenerated on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldParams {
    /// Bounding radius.
    pub radius: u32,
    /// Generation seed.
    pub seed: u64,
    /// Stage the tiles are skinned for.
    pub stage: NarrativeStage,
}

impl From<WorldParams> for HexWorld {
    fn from(p: WorldParams) -> Self {
        HexWorld::generate(p.radius, p.stage, p.seed)
    }
}

impl From<HexWorld> for WorldParams {
    fn from(w: HexWorld) -> Self {
        WorldParams {
            radius: w.radius,
            seed: w.seed,
            stage: w.stage,
        }
    }
}

impl HexWorld {
    /// Generate the world for a stage.
    pub fn generate(radius: u32, stage: NarrativeStage, seed: u64) -> Self {
        let mut world = Self {
            radius,
            seed,
            stage,
            tiles: BTreeMap::new(),
        };
        world.restage(stage);
        world
    }

    /// Re-skin every tile for a new stage. Coordinates are unchanged.
    pub fn restage(&mut self, stage: NarrativeStage) {
        self.stage = stage;
        self.tiles = HexCoord::ORIGIN
            .within(self.radius)
            .into_iter()
            .map(|coord| (coord, self.tile_for(coord, stage)))
            .collect();
    }

    fn tile_for(&self, coord: HexCoord, stage: NarrativeStage) -> Tile {
        let mut kind = TileKind::for_band(Band::of(coord), stage);
        // The spawn hex and its ring stay open so the player is never boxed in.
        if coord.length() > 1 && self.roll(coord, OBSTACLE_SALT) < OBSTACLE_DENSITY[stage.index()]
        {
            kind = TileKind::obstacle_for(stage);
        }

        let prop = if kind.is_walkable() {
            let mut rng = self.rng_for(coord, PROP_SALT);
            if rng.random::<f64>() < Prop::density(stage) {
                let pool = Prop::pool(stage);
                Some(pool[rng.random_range(0..pool.len())])
            } else {
                None
            }
        } else {
            None
        };

        Tile { coord, kind, prop }
    }

    fn roll(&self, coord: HexCoord, salt: u64) -> f64 {
        self.rng_for(coord, salt).random::<f64>()
    }

    fn rng_for(&self, coord: HexCoord, salt: u64) -> StdRng {
        let q = u64::from(coord.q as u32);
        let r = u64::from(coord.r as u32);
        let key = self
            .seed
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            .wrapping_add((q << 32) | r)
            .wrapping_add(salt);
        StdRng::seed_from_u64(key)
    }

    /// Bounding radius.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Generation seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The stage the tiles are currently skinned for.
    pub fn stage(&self) -> NarrativeStage {
        self.stage
    }

    /// Whether a hex lies inside the world bounds.
    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.length() <= self.radius
    }

    /// The tile at a hex, if in bounds.
    pub fn tile(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Whether the player may stand on a hex. Out-of-bounds hexes are not walkable.
    pub fn is_walkable(&self, coord: HexCoord) -> bool {
        self.tile(coord).is_some_and(|t| t.kind.is_walkable())
    }

    /// Cost of stepping onto a hex, or `None` if blocked or out of bounds.
    pub fn move_cost(&self, coord: HexCoord) -> Option<u32> {
        self.tile(coord).and_then(|t| t.kind.move_cost())
    }

    /// All tiles, ordered by coordinate.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the world has no tiles. Never true for a generated world.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// How many tiles have the given terrain.
    pub fn count_of(&self, kind: TileKind) -> usize {
        self.tiles.values().filter(|t| t.kind == kind).count()
    }

    /// Expected tile count for this radius.
    pub fn expected_len(&self) -> usize {
        hex_count(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_covers_every_hex_in_radius() {
        let world = HexWorld::generate(6, NarrativeStage::Peace, 7);
        assert_eq!(world.len(), world.expected_len());
        assert!(world.contains(HexCoord::new(6, -6)));
        assert!(!world.contains(HexCoord::new(7, 0)));
        assert!(world.tile(HexCoord::new(7, 0)).is_none());
    }

    #[test]
    fn generation_is_deterministic() {
        let a = HexWorld::generate(10, NarrativeStage::Dread, 99);
        let b = HexWorld::generate(10, NarrativeStage::Dread, 99);
        let ta: Vec<_> = a.tiles().copied().collect();
        let tb: Vec<_> = b.tiles().copied().collect();
        assert_eq!(ta, tb);
    }

    #[test]
    fn different_seeds_differ() {
        let a = HexWorld::generate(12, NarrativeStage::Peace, 1);
        let b = HexWorld::generate(12, NarrativeStage::Peace, 2);
        let ta: Vec<_> = a.tiles().map(|t| t.kind).collect();
        let tb: Vec<_> = b.tiles().map(|t| t.kind).collect();
        assert_ne!(ta, tb);
    }

    #[test]
    fn spawn_area_is_always_walkable() {
        for seed in 0..20 {
            for stage in NarrativeStage::ALL {
                let world = HexWorld::generate(10, stage, seed);
                assert!(world.is_walkable(HexCoord::ORIGIN));
                for n in HexCoord::ORIGIN.neighbors() {
                    assert!(world.is_walkable(n), "seed {seed} stage {stage} hex {n}");
                }
            }
        }
    }

    #[test]
    fn restage_keeps_obstacle_positions() {
        let mut world = HexWorld::generate(10, NarrativeStage::Peace, 5);
        let water: Vec<HexCoord> = world
            .tiles()
            .filter(|t| t.kind == TileKind::Water)
            .map(|t| t.coord)
            .collect();
        world.restage(NarrativeStage::Terror);
        assert_eq!(world.stage(), NarrativeStage::Terror);
        for coord in water {
            assert_eq!(world.tile(coord).unwrap().kind, TileKind::Chasm);
        }
    }

    #[test]
    fn horror_swallows_the_outer_band() {
        let world = HexWorld::generate(10, NarrativeStage::Horror, 3);
        for tile in world.tiles().filter(|t| t.coord.length() >= 9) {
            assert_eq!(tile.kind, TileKind::Void);
        }
    }

    #[test]
    fn props_only_on_walkable_tiles() {
        let world = HexWorld::generate(12, NarrativeStage::Terror, 11);
        for tile in world.tiles() {
            if tile.prop.is_some() {
                assert!(tile.kind.is_walkable());
            }
        }
    }

    #[test]
    fn serde_regenerates_tiles() {
        let world = HexWorld::generate(5, NarrativeStage::Unease, 21);
        let json = serde_json::to_string(&world).unwrap();
        assert!(json.contains("\"radius\":5"));
        let back: HexWorld = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), world.len());
        assert_eq!(back.stage(), NarrativeStage::Unease);
        let a: Vec<_> = world.tiles().copied().collect();
        let b: Vec<_> = back.tiles().copied().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let world = HexWorld::generate(3, NarrativeStage::Peace, 0);
        assert!(!world.is_walkable(HexCoord::new(4, 0)));
        assert_eq!(world.move_cost(HexCoord::new(4, 0)), None);
    }
}
