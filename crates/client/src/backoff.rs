// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff with jitter for reconnection scheduling.
//!
//! The jitter source is injectable so tests can make reconnect timing
//! deterministic instead of reading a global random function.

use std::time::Duration;

use rand::Rng;

/// Source of jitter for backoff delays.
pub trait JitterSource: Send {
    /// Returns a value in `[0.0, 1.0)`.
    fn sample(&mut self) -> f64;
}

/// Default jitter source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Exponential backoff between a floor and a ceiling.
///
/// Each delay carries up to 25% multiplicative jitter so a fleet of clients
/// reconnecting after the same outage does not stampede the server.
pub struct Backoff {
    floor: Duration,
    ceiling: Duration,
    current: Duration,
    jitter: Box<dyn JitterSource>,
}

impl Backoff {
    /// Creates a backoff with the default random jitter source.
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self::with_jitter(floor, ceiling, Box::new(ThreadRngJitter))
    }

    /// Creates a backoff with a custom jitter source (for testing).
    pub fn with_jitter(floor: Duration, ceiling: Duration, jitter: Box<dyn JitterSource>) -> Self {
        Backoff {
            floor,
            ceiling,
            current: floor,
            jitter,
        }
    }

    /// Returns the next delay and doubles the base, capped at the ceiling.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current;
        self.current = (self.current * 2).min(self.ceiling);
        let jittered = base.mul_f64(1.0 + 0.25 * self.jitter.sample());
        jittered.min(self.ceiling)
    }

    /// Resets the delay to its floor. Called after a successful open.
    pub fn reset(&mut self) {
        self.current = self.floor;
    }

    /// The configured floor delay.
    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// The configured ceiling delay.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }
}

impl std::fmt::Debug for Backoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backoff")
            .field("floor", &self.floor)
            .field("ceiling", &self.ceiling)
            .field("current", &self.current)
            .finish()
    }
}
