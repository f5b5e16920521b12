use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use dl_core::{NarrativeStage, Rgb};
use dl_narrative::{MonsterKind, StagePreset};
use dl_simulation::StageThresholds;

pub fn run() -> Result<(), String> {
    let thresholds = StageThresholds::default();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Stage", "Sky", "Fog", "Accent", "Light", "Track", "Monsters", "Moves on after",
    ]);

    for preset in StagePreset::all() {
        let monsters: Vec<&str> = MonsterKind::roster(preset.stage)
            .iter()
            .map(|m| m.name())
            .collect();
        table.add_row(vec![
            Cell::new(preset.stage.name()),
            swatch(preset.sky),
            swatch(preset.fog),
            swatch(preset.accent),
            Cell::new(format!("{:.2}", preset.light_intensity)),
            Cell::new(preset.audio_track),
            Cell::new(if monsters.is_empty() {
                "-".to_string()
            } else {
                monsters.join(", ")
            }),
            Cell::new(advance_rule(&thresholds, preset.stage)),
        ]);
    }

    println!("  {}", "Stages".bold().underline());
    println!();
    println!("{table}");
    Ok(())
}

fn swatch(color: Rgb) -> Cell {
    Cell::new(color.to_string()).fg(Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    })
}

fn advance_rule(thresholds: &StageThresholds, stage: NarrativeStage) -> String {
    let i = stage.index();
    if stage.is_final() {
        return "-".into();
    }
    format!(
        "{}s, sanity <= {}, or {} hexes walked",
        thresholds.time_in_stage[i], thresholds.sanity_at_or_below[i], thresholds.distance_traveled[i]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horror_has_no_advance_rule() {
        let t = StageThresholds::default();
        assert_eq!(advance_rule(&t, NarrativeStage::Horror), "-");
        assert_eq!(
            advance_rule(&t, NarrativeStage::Peace),
            "180s, sanity <= 85, or 12 hexes walked"
        );
    }
}
