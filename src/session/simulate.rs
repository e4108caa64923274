use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Location;

pub const DEFAULT_HOME: Location = Location { lat: 34.0522, lon: -118.2437 };

// Fixes land within +/- half of this many degrees of home
const SPREAD_DEGREES: f64 = 0.01;
// Chance of staying put between samples while a timer runs
const STAY_PROBABILITY: f64 = 0.3;

/// Generates fake GPS fixes around a home point.
pub struct LocationSimulator {
    home: Location,
    rng: StdRng,
}

impl LocationSimulator {
    pub fn new(home: Location) -> Self {
        Self { home, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(home: Location, seed: u64) -> Self {
        Self { home, rng: StdRng::seed_from_u64(seed) }
    }

    /// Produce the next fix. While a timer runs the user sometimes stays on
    /// the previous fix, which is what lets stopped time build up.
    pub fn next_fix(&mut self, previous: Option<Location>, timer_active: bool) -> Location {
        let should_move = !timer_active || self.rng.gen::<f64>() >= STAY_PROBABILITY;

        match previous {
            Some(prev) if !should_move => prev,
            _ => Location {
                lat: self.home.lat + (self.rng.gen::<f64>() - 0.5) * SPREAD_DEGREES,
                lon: self.home.lon + (self.rng.gen::<f64>() - 0.5) * SPREAD_DEGREES,
            },
        }
    }
}
