use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::meter::Meter;

/// The player's position and state of mind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current hex.
    pub position: HexCoord,
    /// Sanity, 0 to 100. Nothing in the game restores it.
    pub sanity: Meter,
    /// Total hexes walked this session.
    pub distance_traveled: u32,
}

impl PlayerState {
    /// A player standing at `position` with a clear head.
    pub fn new(position: HexCoord) -> Self {
        Self {
            position,
            sanity: Meter::full(),
            distance_traveled: 0,
        }
    }

    /// Record a single step onto an adjacent hex.
    pub fn step_to(&mut self, next: HexCoord) {
        self.position = next;
        self.distance_traveled += 1;
    }

    /// Lose sanity. Returns the new value.
    pub fn lose_sanity(&mut self, amount: f64) -> f64 {
        self.sanity.drain(amount)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(HexCoord::ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counts_distance() {
        let mut p = PlayerState::default();
        p.step_to(HexCoord::new(1, 0));
        p.step_to(HexCoord::new(2, 0));
        assert_eq!(p.position, HexCoord::new(2, 0));
        assert_eq!(p.distance_traveled, 2);
    }

    #[test]
    fn sanity_only_goes_down() {
        let mut p = PlayerState::default();
        assert_eq!(p.lose_sanity(30.0), 70.0);
        assert_eq!(p.lose_sanity(-50.0), 70.0);
        assert_eq!(p.lose_sanity(200.0), 0.0);
    }
}
