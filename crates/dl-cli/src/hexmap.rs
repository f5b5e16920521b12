//! Terminal layout for the hex grid.
//!
//! Hexes sit on a doubled-width grid: column `2q + r`, row `r`, both shifted
//! so the world's corner lands at `(0, 0)`. Neighbours in a row are two
//! columns apart and each row is offset by one, which reads as a hexagon.

use dl_core::{HexCoord, HexWorld, TileKind};

/// Cell (column, row) of a hex in a world of the given radius.
pub fn hex_to_cell(coord: HexCoord, radius: u32) -> (usize, usize) {
    let r = radius as i32;
    let col = 2 * coord.q + coord.r + 2 * r;
    let row = coord.r + r;
    (col.max(0) as usize, row.max(0) as usize)
}

/// The hex under a cell. Cells between two hexes resolve to the left one.
pub fn cell_to_hex(col: usize, row: usize, radius: u32) -> Option<HexCoord> {
    let r = radius as i32;
    let hex_r = row as i32 - r;
    let x = col as i32 - 2 * r;
    let q = (x - hex_r).div_euclid(2);
    let coord = HexCoord::new(q, hex_r);
    (coord.length() <= radius).then_some(coord)
}

/// Width and height, in cells, of a world of the given radius.
pub fn grid_size(radius: u32) -> (usize, usize) {
    let r = radius as usize;
    (4 * r + 1, 2 * r + 1)
}

/// Map glyph for a terrain kind.
pub fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Grass => '.',
        TileKind::Forest => 't',
        TileKind::Swamp => '%',
        TileKind::Stone => ':',
        TileKind::Ash => ',',
        TileKind::Bone => ';',
        TileKind::Water => '~',
        TileKind::Chasm => '#',
        TileKind::Void => 'X',
    }
}

/// Lay the world out as rows of cells, each holding the hex drawn there.
pub fn layout(world: &HexWorld) -> Vec<Vec<Option<HexCoord>>> {
    let (width, height) = grid_size(world.radius());
    let mut rows = vec![vec![None; width]; height];
    for tile in world.tiles() {
        let (col, row) = hex_to_cell(tile.coord, world.radius());
        if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Some(tile.coord);
        }
    }
    rows
}

/// Plain-text rendering with an optional per-hex override glyph.
pub fn render_ascii(world: &HexWorld, overlay: impl Fn(HexCoord) -> Option<char>) -> String {
    let mut out = String::new();
    for row in layout(world) {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Some(coord) => overlay(*coord).unwrap_or_else(|| {
                    world
                        .tile(*coord)
                        .map(|t| tile_glyph(t.kind))
                        .unwrap_or(' ')
                }),
                None => ' ',
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use dl_core::NarrativeStage;

    use super::*;

    #[test]
    fn origin_is_centered() {
        assert_eq!(hex_to_cell(HexCoord::ORIGIN, 3), (6, 3));
        assert_eq!(grid_size(3), (13, 7));
    }

    #[test]
    fn cells_round_trip() {
        for coord in HexCoord::ORIGIN.within(4) {
            let (col, row) = hex_to_cell(coord, 4);
            assert_eq!(cell_to_hex(col, row, 4), Some(coord));
        }
    }

    #[test]
    fn in_between_cell_resolves_left() {
        let (col, row) = hex_to_cell(HexCoord::ORIGIN, 3);
        assert_eq!(cell_to_hex(col + 1, row, 3), Some(HexCoord::ORIGIN));
    }

    #[test]
    fn cells_outside_the_world() {
        assert_eq!(cell_to_hex(0, 0, 3), None);
    }

    #[test]
    fn layout_places_every_tile_once() {
        let world = HexWorld::generate(3, NarrativeStage::Peace, 1);
        let placed = layout(&world).iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(placed, world.len());
    }

    #[test]
    fn ascii_overlay_marks_the_player() {
        let world = HexWorld::generate(2, NarrativeStage::Peace, 1);
        let text = render_ascii(&world, |c| (c == HexCoord::ORIGIN).then_some('@'));
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.matches('@').count(), 1);
        assert_eq!(text.lines().nth(2).unwrap().chars().nth(4), Some('@'));
    }
}
