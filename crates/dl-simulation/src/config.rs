use dl_core::NarrativeStage;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::stage::AdvanceTrigger;

/// Per-stage triggers for moving the story forward.
///
/// Each array is indexed by the current stage, Peace through Terror.
/// Horror has no entry because nothing follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageThresholds {
    /// Seconds spent in a stage before it gives way.
    pub time_in_stage: [f64; 4],
    /// Sanity at or below which the next stage begins.
    pub sanity_at_or_below: [f64; 4],
    /// Total hexes walked at which the next stage begins.
    pub distance_traveled: [u32; 4],
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            time_in_stage: [180.0, 240.0, 300.0, 360.0],
            sanity_at_or_below: [85.0, 65.0, 45.0, 25.0],
            distance_traveled: [12, 30, 55, 90],
        }
    }
}

impl StageThresholds {
    /// The first trigger that fires for `stage`, if any.
    ///
    /// Checked in order: time, sanity, distance.
    pub fn trigger(
        &self,
        stage: NarrativeStage,
        time_in_stage: f64,
        sanity: f64,
        distance: u32,
    ) -> Option<AdvanceTrigger> {
        let i = stage.index();
        if i >= self.time_in_stage.len() {
            return None;
        }
        if time_in_stage >= self.time_in_stage[i] {
            Some(AdvanceTrigger::Time)
        } else if sanity <= self.sanity_at_or_below[i] {
            Some(AdvanceTrigger::Sanity)
        } else if distance >= self.distance_traveled[i] {
            Some(AdvanceTrigger::Distance)
        } else {
            None
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World-generation seed.
    pub seed: u64,
    /// Session seconds per simulation tick.
    pub seconds_per_tick: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Radius of the generated hex world.
    pub world_radius: u32,
    /// Hexes the player walks per tick while following a route.
    pub steps_per_tick: f64,
    /// When the story advances.
    pub thresholds: StageThresholds,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            seconds_per_tick: 1.0,
            max_events: 0,
            world_radius: 12,
            steps_per_tick: 1.0,
            thresholds: StageThresholds::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the systems cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if !positive(self.seconds_per_tick) {
            return Err(SimError::InvalidConfig(
                "seconds_per_tick must be positive".into(),
            ));
        }
        if !positive(self.steps_per_tick) {
            return Err(SimError::InvalidConfig(
                "steps_per_tick must be positive".into(),
            ));
        }
        if self.world_radius < 2 {
            return Err(SimError::InvalidConfig(
                "world_radius must be at least 2".into(),
            ));
        }
        Ok(())
    }

    /// Set the world seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of session seconds per simulation tick.
    pub fn with_seconds_per_tick(mut self, seconds: f64) -> Self {
        self.seconds_per_tick = seconds;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the world radius.
    pub fn with_world_radius(mut self, radius: u32) -> Self {
        self.world_radius = radius;
        self
    }

    /// Set the walking speed in hexes per tick.
    pub fn with_steps_per_tick(mut self, steps: f64) -> Self {
        self.steps_per_tick = steps;
        self
    }

    /// Replace the stage thresholds.
    pub fn with_thresholds(mut self, thresholds: StageThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
