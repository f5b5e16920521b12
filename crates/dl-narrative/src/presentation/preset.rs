//! Per-stage palettes, lighting, and audio.

use dl_core::{NarrativeStage, Rgb, TileKind};
use serde::Serialize;

/// Everything a renderer needs to restyle the scene for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StagePreset {
    /// Stage this preset belongs to.
    pub stage: NarrativeStage,
    /// Sky color.
    pub sky: Rgb,
    /// Fog color.
    pub fog: Rgb,
    /// Ambient light color.
    pub ambient: Rgb,
    /// Highlight color for paths and markers.
    pub accent: Rgb,
    /// Exponential fog density.
    pub fog_density: f64,
    /// Directional light intensity, 0 to 1.
    pub light_intensity: f64,
    /// Looping music track.
    pub audio_track: &'static str,
    /// Tint applied to interface panels.
    pub ui_tint: Rgb,
}

impl StagePreset {
    /// The preset for a stage.
    pub const fn for_stage(stage: NarrativeStage) -> StagePreset {
        match stage {
            NarrativeStage::Peace => StagePreset {
                stage,
                sky: Rgb::new(0x87, 0xce, 0xeb),
                fog: Rgb::new(0xe6, 0xf0, 0xff),
                ambient: Rgb::new(0xff, 0xf4, 0xd6),
                accent: Rgb::new(0x4c, 0xaf, 0x50),
                fog_density: 0.005,
                light_intensity: 1.0,
                audio_track: "peaceful_village",
                ui_tint: Rgb::new(0xf5, 0xf0, 0xe1),
            },
            NarrativeStage::Unease => StagePreset {
                stage,
                sky: Rgb::new(0x9f, 0xb8, 0xc8),
                fog: Rgb::new(0xc8, 0xcf, 0xd6),
                ambient: Rgb::new(0xe8, 0xdc, 0xc0),
                accent: Rgb::new(0xc9, 0xa2, 0x27),
                fog_density: 0.012,
                light_intensity: 0.85,
                audio_track: "uneasy_whispers",
                ui_tint: Rgb::new(0xe0, 0xd6, 0xc0),
            },
            NarrativeStage::Dread => StagePreset {
                stage,
                sky: Rgb::new(0x5a, 0x64, 0x70),
                fog: Rgb::new(0x7a, 0x7f, 0x85),
                ambient: Rgb::new(0xa8, 0x9f, 0x91),
                accent: Rgb::new(0x8b, 0x45, 0x13),
                fog_density: 0.025,
                light_intensity: 0.6,
                audio_track: "dread_drones",
                ui_tint: Rgb::new(0xb0, 0xa5, 0x90),
            },
            NarrativeStage::Terror => StagePreset {
                stage,
                sky: Rgb::new(0x3a, 0x2a, 0x2a),
                fog: Rgb::new(0x4a, 0x35, 0x35),
                ambient: Rgb::new(0x6b, 0x4a, 0x4a),
                accent: Rgb::new(0x8b, 0x00, 0x00),
                fog_density: 0.045,
                light_intensity: 0.4,
                audio_track: "terror_heartbeat",
                ui_tint: Rgb::new(0x8a, 0x60, 0x60),
            },
            NarrativeStage::Horror => StagePreset {
                stage,
                sky: Rgb::new(0x0d, 0x05, 0x05),
                fog: Rgb::new(0x1a, 0x0a, 0x0a),
                ambient: Rgb::new(0x2a, 0x10, 0x10),
                accent: Rgb::new(0xff, 0x20, 0x20),
                fog_density: 0.07,
                light_intensity: 0.2,
                audio_track: "horror_silence",
                ui_tint: Rgb::new(0x5a, 0x20, 0x20),
            },
        }
    }

    /// Presets for every stage, in order.
    pub fn all() -> [StagePreset; 5] {
        NarrativeStage::ALL.map(StagePreset::for_stage)
    }
}

/// Base color of a terrain kind before stage grading.
fn base_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Grass => Rgb::new(0x6a, 0xa8, 0x4f),
        TileKind::Forest => Rgb::new(0x2f, 0x6b, 0x2f),
        TileKind::Swamp => Rgb::new(0x55, 0x6b, 0x3a),
        TileKind::Stone => Rgb::new(0x8a, 0x8a, 0x8a),
        TileKind::Ash => Rgb::new(0x5e, 0x58, 0x55),
        TileKind::Bone => Rgb::new(0xd8, 0xd0, 0xb8),
        TileKind::Water => Rgb::new(0x3a, 0x7c, 0xc4),
        TileKind::Chasm => Rgb::new(0x22, 0x1c, 0x1c),
        TileKind::Void => Rgb::new(0, 0, 0),
    }
}

/// Render color of a tile: the terrain's base color, drained of saturation
/// and light as the stage deepens.
pub fn tile_color(kind: TileKind, stage: NarrativeStage) -> Rgb {
    let depth = stage.index() as f64;
    base_color(kind).desaturate(depth * 0.15).darken(depth * 0.12)
}
