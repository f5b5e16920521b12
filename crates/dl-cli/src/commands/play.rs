use std::path::Path;
use std::time::Duration;

use dl_narrative::DialogueBook;
use dl_simulation::Simulation;
use tracing::info;

use super::load_config;

pub fn run(seed: Option<u64>, config: Option<&Path>) -> Result<(), String> {
    let config = load_config(config, seed)?;
    let tick_every = Duration::from_secs_f64(config.seconds_per_tick);
    let book = DialogueBook::standard();
    book.validate().map_err(|e| format!("dialogue book: {e}"))?;

    info!(seed = config.seed, radius = config.world_radius, "starting session");
    let sim = Simulation::standard("Labyrinth", config)
        .map_err(|e| format!("simulation init failed: {e}"))?;
    crate::tui::run(sim, &book, tick_every)
}
