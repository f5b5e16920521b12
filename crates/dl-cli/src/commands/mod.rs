pub mod map;
pub mod path;
pub mod play;
pub mod simulate;
pub mod stages;

use std::fs;
use std::path::Path;

use colored::Colorize;
use dl_simulation::SimConfig;

/// Load settings from an optional JSON file, then apply the seed override.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            SimConfig::from_json(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// A ten-segment bar for a 0-100 meter, colored by how low it is.
pub fn meter_bar(value: f64) -> String {
    let filled = (value / 10.0).round().clamp(0.0, 10.0) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled));
    let pct = value.round() as u32;

    if value <= 20.0 {
        format!("[{}] {:>3}", bar.red(), pct)
    } else if value <= 50.0 {
        format!("[{}] {:>3}", bar.yellow(), pct)
    } else {
        format!("[{}] {:>3}", bar.green(), pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_segments() {
        colored::control::set_override(false);
        assert_eq!(meter_bar(100.0), "[##########] 100");
        assert_eq!(meter_bar(34.0), "[###-------]  34");
        assert_eq!(meter_bar(0.0), "[----------]   0");
    }

    #[test]
    fn seed_overrides_default() {
        let config = load_config(None, Some(9)).unwrap();
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/labyrinth.json")), None).unwrap_err();
        assert!(err.contains("cannot read"));
    }
}
