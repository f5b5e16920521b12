use colored::Colorize;
use dl_core::{HexCoord, HexWorld, NarrativeStage};
use dl_simulation::find_path;

use crate::hexmap::render_ascii;

pub fn run(
    from: HexCoord,
    to: HexCoord,
    radius: u32,
    stage: NarrativeStage,
    seed: u64,
) -> Result<(), String> {
    let world = HexWorld::generate(radius, stage, seed);
    let path = find_path(&world, from, to).map_err(|e| e.to_string())?;

    println!(
        "  {} {from} -> {to}: {} steps, cost {}",
        "Path".bold(),
        path.len(),
        path.cost
    );
    if path.is_empty() {
        println!("  {}", "(already there)".dimmed());
        return Ok(());
    }

    let steps: Vec<String> = path.steps.iter().map(|s| s.to_string()).collect();
    println!("  {}", steps.join(" "));
    println!();

    let map = render_ascii(&world, |c| {
        if c == from {
            Some('@')
        } else if c == to {
            Some('O')
        } else if path.contains(c) {
            Some('*')
        } else {
            None
        }
    });
    for line in map.lines() {
        println!("  {line}");
    }
    Ok(())
}
