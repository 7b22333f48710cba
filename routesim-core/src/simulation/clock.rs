use std::fmt;

use chrono::NaiveTime;

use crate::Millis;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Simulated wall clock shown to callers. Purely a display value, vehicle
/// motion runs on ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimClock {
    accumulated_ms: Millis,
    seconds: u32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds elapsed milliseconds. Once a full second has accumulated the
    /// clock moves one second and the remainder is dropped.
    pub fn advance(&mut self, elapsed_ms: Millis) {
        self.accumulated_ms += elapsed_ms;
        if self.accumulated_ms >= 1000 {
            self.accumulated_ms = 0;
            self.seconds = (self.seconds + 1) % SECONDS_PER_DAY;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seconds since midnight
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.seconds, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time().format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(seconds: u32) -> SimClock {
        SimClock {
            accumulated_ms: 0,
            seconds,
        }
    }

    #[test]
    fn test_one_second_per_thousand_ms() {
        let mut clock = SimClock::new();
        for _ in 0..19 {
            clock.advance(50);
        }
        assert_eq!(clock.seconds(), 0);
        clock.advance(50);
        assert_eq!(clock.seconds(), 1);
        assert_eq!(clock.to_string(), "00:00:01");
    }

    #[test]
    fn test_remainder_is_dropped() {
        let mut clock = SimClock::new();
        for _ in 0..4 {
            clock.advance(300);
        }
        // 1200 ms accumulated, 200 ms lost on rollover
        assert_eq!(clock.seconds(), 1);
        for _ in 0..3 {
            clock.advance(300);
        }
        assert_eq!(clock.seconds(), 1);
    }

    #[test]
    fn test_rollover() {
        let mut clock = clock_at(59);
        clock.advance(1000);
        assert_eq!(clock.to_string(), "00:01:00");

        let mut clock = clock_at(59 * 60 + 59);
        clock.advance(1000);
        assert_eq!(clock.to_string(), "01:00:00");

        let mut clock = clock_at(SECONDS_PER_DAY - 1);
        assert_eq!(clock.to_string(), "23:59:59");
        clock.advance(1000);
        assert_eq!(clock.to_string(), "00:00:00");
    }

    #[test]
    fn test_reset() {
        let mut clock = clock_at(3600);
        clock.advance(400);
        clock.reset();
        assert_eq!(clock, SimClock::new());
    }
}
