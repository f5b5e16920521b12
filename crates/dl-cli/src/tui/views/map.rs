use std::collections::HashSet;

use dl_core::HexCoord;
use dl_narrative::{StagePreset, tile_color};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::rgb;
use crate::hexmap::{layout, tile_glyph};
use crate::tui::app::App;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let stage = app.stage();
    let preset = StagePreset::for_stage(stage);
    let block = Block::default()
        .title(format!(" The Labyrinth: {stage} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(preset.accent)));
    app.map_area = block.inner(area);

    let preview: HashSet<HexCoord> = app
        .preview()
        .map(|p| p.steps.iter().copied().collect())
        .unwrap_or_default();
    let route: HashSet<HexCoord> = app.route().into_iter().collect();

    let state = app.sim.state();
    let player = state.player.position;
    let accent = Style::default().fg(rgb(preset.accent)).bold();

    let lines: Vec<Line> = layout(&state.world)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| {
                    let Some(coord) = cell else {
                        return Span::raw(" ");
                    };
                    let Some(tile) = state.world.tile(coord) else {
                        return Span::raw(" ");
                    };
                    let (glyph, mut style) = if coord == player {
                        ('@', Style::default().fg(Color::White).bold())
                    } else if preview.contains(&coord) {
                        ('*', accent)
                    } else if route.contains(&coord) {
                        ('o', accent)
                    } else {
                        (
                            tile_glyph(tile.kind),
                            Style::default().fg(rgb(tile_color(tile.kind, stage))),
                        )
                    };
                    if coord == app.cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(glyph.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let map = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(rgb(preset.fog.darken(0.85))));
    frame.render_widget(map, area);
}
