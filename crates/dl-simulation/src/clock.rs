/// Tracks simulation time: a monotonic tick counter and elapsed session seconds.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    seconds_per_tick: f64,
    elapsed_secs: f64,
}

impl SimClock {
    /// Create a new clock at tick 0 with the given tick duration.
    pub fn new(seconds_per_tick: f64) -> Self {
        Self {
            tick: 0,
            seconds_per_tick,
            elapsed_secs: 0.0,
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.elapsed_secs += self.seconds_per_tick;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total session seconds since the simulation started.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Return the configured number of seconds per tick.
    pub fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = SimClock::new(1.0);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = SimClock::new(0.5);
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick(), 3);
        assert!((clock.elapsed_secs() - 1.5).abs() < f64::EPSILON);
    }
}
