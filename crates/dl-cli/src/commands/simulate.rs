use std::collections::VecDeque;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::warn;

use dl_core::{HexCoord, QuestStatus};
use dl_narrative::companion_appearance;
use dl_simulation::{SimEventKind, Simulation};

use super::{load_config, meter_bar};

const NOTABLE: [&str; 7] = [
    "stage_advanced",
    "sanity_threshold",
    "companion_departed",
    "quest_completed",
    "quest_abandoned",
    "path_completed",
    "path_blocked",
];

pub fn run(
    ticks: u64,
    seed: Option<u64>,
    walk: &[HexCoord],
    config: Option<&Path>,
    all_events: bool,
    json: bool,
) -> Result<(), String> {
    let config = load_config(config, seed)?;
    let seed = config.seed;
    let mut sim = Simulation::standard("Labyrinth", config)
        .map_err(|e| format!("simulation init failed: {e}"))?;

    let mut waypoints: VecDeque<HexCoord> = walk.iter().copied().collect();
    for _ in 0..ticks {
        start_next_leg(&mut sim, &mut waypoints);
        sim.tick().map_err(|e| format!("simulation error: {e}"))?;
    }

    if json {
        let out = serde_json::to_string_pretty(&sim.snapshot())
            .map_err(|e| format!("cannot serialize snapshot: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let state = sim.state();
    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        state.meta.name,
        format!("({ticks} ticks, seed={seed})").dimmed()
    );
    println!(
        "  Stage {} after {:.0}s, {} events logged",
        state.stage().name().bold(),
        sim.clock().elapsed_secs(),
        sim.events().len()
    );
    println!(
        "  Player at {}, walked {} hexes, sanity {}",
        state.player.position,
        state.player.distance_traveled,
        meter_bar(state.player.sanity.value())
    );
    println!();

    if all_events {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = sim
            .events()
            .events()
            .iter()
            .filter(|e| NOTABLE.contains(&e.kind.label()))
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in notable {
                let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
                println!(
                    "  {tick_label} {}",
                    colorize_event(&event.kind, &event.description)
                );
            }
            println!();
        }
    }

    println!("  {}", "Companions".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Archetype", "Morale", "Trauma", "Look", "Status"]);
    for companion in state.companions() {
        let look = companion_appearance(companion, state.stage())
            .map(|a| format!("{} {} @ {:.2}", a.color, a.animation.name(), a.opacity))
            .unwrap_or_else(|| "--".to_string());
        let status = if companion.active {
            "with you".to_string()
        } else {
            "departed".red().to_string()
        };
        table.add_row(vec![
            companion.name.clone(),
            companion.archetype.to_string(),
            meter_bar(companion.morale.value()),
            format!("{:.0}", companion.trauma.value()),
            look,
            status,
        ]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Quests".bold().underline());
    if let Some(quest) = &state.active_quest {
        println!(
            "  {} {} ({}/{} tasks)",
            "ACTIVE".cyan().bold(),
            quest.title,
            quest.tasks_done(),
            quest.tasks.len()
        );
        for task in &quest.tasks {
            let mark = if task.done { "x" } else { " " };
            println!("    [{mark}] {}", task.description);
        }
    }
    for quest in &state.quest_log {
        let label = match quest.status {
            QuestStatus::Completed => "DONE".green().bold(),
            QuestStatus::Abandoned => "LOST".red().bold(),
            QuestStatus::Active => "ACTIVE".cyan().bold(),
        };
        println!("  {label}   {} ({})", quest.title, quest.stage);
    }
    println!();

    Ok(())
}

/// Start walking to the next reachable waypoint once the last leg is done.
fn start_next_leg(sim: &mut Simulation, waypoints: &mut VecDeque<HexCoord>) {
    let Some((movement, state)) = sim.movement_and_state() else {
        return;
    };
    if movement.is_moving() {
        return;
    }
    while let Some(target) = waypoints.pop_front() {
        match movement.travel_to(state, target) {
            Ok(_) => break,
            Err(e) => warn!(%target, error = %e, "skipping waypoint"),
        }
    }
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::StageAdvanced { .. } => description.magenta().bold(),
        SimEventKind::CompanionDeparted { .. } => description.red().bold(),
        SimEventKind::SanityThreshold { .. } => description.yellow(),
        SimEventKind::MoraleChanged { delta, .. } if *delta < 0.0 => description.yellow(),
        SimEventKind::MoraleChanged { .. } => description.green(),
        SimEventKind::QuestCompleted { .. } => description.green().bold(),
        SimEventKind::QuestAssigned { .. } | SimEventKind::QuestTaskCompleted { .. } => {
            description.cyan()
        }
        SimEventKind::QuestAbandoned { .. } | SimEventKind::PathBlocked { .. } => description.red(),
        SimEventKind::PlayerMoved { .. } | SimEventKind::PathCompleted { .. } => description.blue(),
    }
}
