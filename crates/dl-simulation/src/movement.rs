use std::collections::VecDeque;

use dl_core::{DlError, GameState, HexCoord, HexWorld, NarrativeStage};
use serde::Serialize;
use tracing::debug;

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::system::System;

/// A computed route that has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathPreview {
    /// Where the path starts.
    pub from: HexCoord,
    /// Where the path ends.
    pub to: HexCoord,
    /// Hexes to step onto, in order. The start hex is not included.
    pub steps: Vec<HexCoord>,
    /// Sum of the move costs of every step.
    pub cost: u32,
}

impl PathPreview {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether start and end are the same hex.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the path passes over `hex`.
    pub fn contains(&self, hex: HexCoord) -> bool {
        self.steps.contains(&hex)
    }
}

/// A confirmed route the player is walking.
#[derive(Debug, Clone)]
pub struct Route {
    destination: HexCoord,
    remaining: VecDeque<HexCoord>,
    progress: f64,
}

impl Route {
    fn new(preview: PathPreview) -> Self {
        Self {
            destination: preview.to,
            remaining: preview.steps.into(),
            progress: 0.0,
        }
    }

    /// Final hex of the route.
    pub fn destination(&self) -> HexCoord {
        self.destination
    }

    /// Hexes still to walk.
    pub fn remaining(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.remaining.iter().copied()
    }

    /// Number of hexes still to walk.
    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }
}

/// A* over the hex grid, bounded by the world radius.
///
/// Step cost is the move cost of the hex being entered; the heuristic is hex
/// distance, which never overestimates because the cheapest tile costs 1.
pub fn find_path(world: &HexWorld, from: HexCoord, to: HexCoord) -> SimResult<PathPreview> {
    if !world.contains(from) {
        return Err(DlError::OutOfBounds(from).into());
    }
    if !world.contains(to) {
        return Err(DlError::OutOfBounds(to).into());
    }
    if !world.is_walkable(to) {
        return Err(DlError::Impassable(to).into());
    }
    if from == to {
        return Ok(PathPreview {
            from,
            to,
            steps: Vec::new(),
            cost: 0,
        });
    }

    let (steps, cost) = astar(from, to, world.radius(), |hex| world.move_cost(hex))
        .ok_or(SimError::NoPath { from, to })?;
    debug!(%from, %to, steps = steps.len(), cost, "path found");
    Ok(PathPreview {
        from,
        to,
        steps,
        cost,
    })
}

/// A* core over hexes within `radius` of the origin. `cost` returns `None`
/// for hexes that cannot be entered. The returned path leaves out `from`.
fn astar(
    from: HexCoord,
    to: HexCoord,
    radius: u32,
    cost: impl Fn(HexCoord) -> Option<u32>,
) -> Option<(Vec<HexCoord>, u32)> {
    let (mut path, total) = pathfinding::prelude::astar(
        &from,
        |&hex| {
            hex.neighbors()
                .into_iter()
                .filter(|n| n.length() <= radius)
                .filter_map(|n| cost(n).map(|c| (n, c)))
                .collect::<Vec<_>>()
        },
        |&hex| hex.distance(to),
        |&hex| hex == to,
    )?;
    path.remove(0);
    Some((path, total))
}

fn record_step(steps: &mut Vec<(NarrativeStage, u32)>, stage: NarrativeStage) {
    match steps.last_mut() {
        Some((last, count)) if *last == stage => *count += 1,
        _ => steps.push((stage, 1)),
    }
}

/// Click-to-move for the player: preview, confirm, then walk the route tick by tick.
#[derive(Debug)]
pub struct MovementSystem {
    steps_per_tick: f64,
    preview: Option<PathPreview>,
    route: Option<Route>,
    steps_taken: Vec<(NarrativeStage, u32)>,
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MovementSystem {
    /// Create a movement system walking `steps_per_tick` hexes per tick.
    pub fn new(steps_per_tick: f64) -> Self {
        Self {
            steps_per_tick,
            preview: None,
            route: None,
            steps_taken: Vec::new(),
        }
    }

    /// Compute a path from the player to `target` and hold it as the preview.
    ///
    /// Replaces any earlier preview. On error the preview is cleared.
    pub fn preview(&mut self, state: &GameState, target: HexCoord) -> SimResult<&PathPreview> {
        self.preview = None;
        let path = find_path(&state.world, state.player.position, target)?;
        Ok(self.preview.insert(path))
    }

    /// Commit the preview as the active route. Returns the number of steps.
    ///
    /// If the player moved since the preview was made, the path is
    /// recomputed from where they stand now.
    pub fn confirm(&mut self, state: &GameState) -> SimResult<usize> {
        let mut preview = self.preview.take().ok_or(SimError::NoPreview)?;
        if preview.from != state.player.position {
            preview = find_path(&state.world, state.player.position, preview.to)?;
        }
        let len = preview.len();
        self.route = if preview.is_empty() {
            None
        } else {
            Some(Route::new(preview))
        };
        Ok(len)
    }

    /// Discard the pending preview, returning it.
    pub fn cancel(&mut self) -> Option<PathPreview> {
        self.preview.take()
    }

    /// Preview and confirm in one go.
    pub fn travel_to(&mut self, state: &GameState, target: HexCoord) -> SimResult<usize> {
        self.preview(state, target)?;
        self.confirm(state)
    }

    /// Abandon the active route. The player stays where they are.
    pub fn stop(&mut self) {
        self.route = None;
    }

    /// The pending preview, if any.
    pub fn pending_preview(&self) -> Option<&PathPreview> {
        self.preview.as_ref()
    }

    /// The route being walked, if any.
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Whether the player is walking a route.
    pub fn is_moving(&self) -> bool {
        self.route.is_some()
    }

    /// Hexes walked since the last drain, with the stage they were walked in.
    /// Consumed by the orchestrator.
    pub fn drain_steps_taken(&mut self) -> Vec<(NarrativeStage, u32)> {
        std::mem::take(&mut self.steps_taken)
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let Some(route) = self.route.as_mut() else {
            return Ok(());
        };

        route.progress += self.steps_per_tick;

        while route.progress >= 1.0 {
            let Some(&next) = route.remaining.front() else {
                break;
            };
            let here = ctx.state.player.position;
            if here.distance(next) != 1 || !ctx.state.world.is_walkable(next) {
                debug!(at = %here, blocked = %next, "route blocked");
                ctx.emit(
                    SimEventKind::PathBlocked {
                        at: here,
                        blocked: next,
                    },
                    format!("The way to {next} is closed"),
                );
                self.route = None;
                return Ok(());
            }

            route.remaining.pop_front();
            route.progress -= 1.0;
            ctx.state.player.step_to(next);
            record_step(&mut self.steps_taken, ctx.state.stage());
            ctx.emit(
                SimEventKind::PlayerMoved {
                    from: here,
                    to: next,
                },
                format!("Moved {here} -> {next}"),
            );
        }

        if route.remaining.is_empty() {
            let at = route.destination;
            ctx.emit(
                SimEventKind::PathCompleted { at },
                format!("Arrived at {at}"),
            );
            self.route = None;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
