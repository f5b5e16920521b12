//! Bounded psychological scalars (morale, trauma, sanity).
//!
//! The value is kept private so every write goes through a clamping method;
//! readers never see anything outside `0..=100`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A scalar clamped to `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Meter(f64);

impl Meter {
    /// Lower bound.
    pub const MIN: f64 = 0.0;
    /// Upper bound.
    pub const MAX: f64 = 100.0;

    /// Create a meter, clamping the initial value.
    pub fn new(value: f64) -> Self {
        Self(Self::clamp(value))
    }

    /// A meter at its maximum.
    pub fn full() -> Self {
        Self(Self::MAX)
    }

    /// A meter at its minimum.
    pub fn empty() -> Self {
        Self(Self::MIN)
    }

    /// Current value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Apply a signed delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: f64) -> f64 {
        self.0 = Self::clamp(self.0 + delta);
        self.0
    }

    /// Decrease by a non-negative amount. Negative amounts are ignored.
    pub fn drain(&mut self, amount: f64) -> f64 {
        self.adjust(-amount.max(0.0))
    }

    /// Fraction of the range that is filled, `0.0..=1.0`.
    pub fn fraction(self) -> f64 {
        self.0 / Self::MAX
    }

    /// Whether the meter has hit the floor.
    pub fn is_depleted(self) -> bool {
        self.0 <= Self::MIN
    }

    fn clamp(value: f64) -> f64 {
        if value.is_nan() {
            return Self::MIN;
        }
        value.clamp(Self::MIN, Self::MAX)
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::full()
    }
}

impl<'de> Deserialize<'de> for Meter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Meter::new)
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps() {
        assert_eq!(Meter::new(150.0).value(), 100.0);
        assert_eq!(Meter::new(-20.0).value(), 0.0);
        assert_eq!(Meter::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn adjust_never_goes_negative() {
        let mut m = Meter::new(10.0);
        assert_eq!(m.adjust(-25.0), 0.0);
        assert!(m.is_depleted());
        assert_eq!(m.adjust(-5.0), 0.0);
    }

    #[test]
    fn adjust_caps_at_max() {
        let mut m = Meter::new(95.0);
        assert_eq!(m.adjust(30.0), 100.0);
    }

    #[test]
    fn drain_ignores_negative_amounts() {
        let mut m = Meter::new(40.0);
        assert_eq!(m.drain(-10.0), 40.0);
        assert_eq!(m.drain(15.0), 25.0);
    }

    #[test]
    fn fraction_and_display() {
        let m = Meter::new(37.6);
        assert!((m.fraction() - 0.376).abs() < 1e-9);
        assert_eq!(m.to_string(), "38");
    }

    #[test]
    fn deserialize_clamps_out_of_range_values() {
        let m: Meter = serde_json::from_str("250.0").unwrap();
        assert_eq!(m.value(), 100.0);
        let m: Meter = serde_json::from_str("-3").unwrap();
        assert_eq!(m.value(), 0.0);
    }
}
