use colored::Colorize;
use dl_core::{HexCoord, HexWorld, NarrativeStage, TileKind};

use crate::hexmap::{render_ascii, tile_glyph};

const LEGEND: [TileKind; 9] = [
    TileKind::Grass,
    TileKind::Forest,
    TileKind::Swamp,
    TileKind::Stone,
    TileKind::Ash,
    TileKind::Bone,
    TileKind::Water,
    TileKind::Chasm,
    TileKind::Void,
];

pub fn run(radius: u32, stage: NarrativeStage, seed: u64) -> Result<(), String> {
    if radius < 1 {
        return Err("radius must be at least 1".into());
    }
    let world = HexWorld::generate(radius, stage, seed);

    println!(
        "  {} {}",
        "World".bold(),
        format!("(radius {radius}, stage {stage}, seed {seed}, {} hexes)", world.len()).dimmed()
    );
    println!();
    let map = render_ascii(&world, |c| (c == HexCoord::ORIGIN).then_some('@'));
    for line in map.lines() {
        println!("  {line}");
    }
    println!();

    let legend: Vec<String> = LEGEND
        .iter()
        .filter(|kind| world.count_of(**kind) > 0)
        .map(|kind| format!("{} {kind} ({})", tile_glyph(*kind), world.count_of(*kind)))
        .collect();
    println!("  @ you   {}", legend.join("   "));

    Ok(())
}
