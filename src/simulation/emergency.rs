//! Emergency vehicle dispatch and preemption tracking
//!
//! Dispatches a priority vehicle with a small per-tick probability after a
//! cooldown, and tracks whether one is currently transiting. The `active`
//! flag is driven by vehicle liveness, not a timer, so preemption clears
//! exactly when the emergency vehicle leaves the simulation area.

use rand::rngs::StdRng;
use rand::Rng;

use super::config::SimConfig;
use super::types::{Direction, LANES_PER_APPROACH};
use super::vehicle::Vehicle;

/// Probabilistic emergency dispatch with liveness-based preemption state
#[derive(Debug)]
pub struct EmergencyPreemption {
    active: bool,
    ticks_since_last: u32,
    rng: StdRng,
}

impl EmergencyPreemption {
    pub fn new(rng: StdRng) -> Self {
        Self {
            active: false,
            ticks_since_last: 0,
            rng,
        }
    }

    /// Roll for a new dispatch this tick
    ///
    /// Returns the direction and lane of a proposed emergency vehicle when
    /// the roll succeeds. The cooldown resets on every successful roll; the
    /// caller must confirm with [`confirm_dispatch`](Self::confirm_dispatch)
    /// once the vehicle passes the spacing-safety check and is admitted.
    pub fn tick(&mut self, config: &SimConfig) -> Option<(Direction, u8)> {
        let mut dispatch = None;

        if !self.active
            && self.ticks_since_last > config.emergency_cooldown
            && self.rng.random_bool(config.emergency_probability)
        {
            let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
            let lane = self.rng.random_range(0..LANES_PER_APPROACH);
            self.ticks_since_last = 0;
            dispatch = Some((direction, lane));
        }

        self.ticks_since_last += 1;
        dispatch
    }

    /// Mark a dispatched vehicle as admitted
    pub fn confirm_dispatch(&mut self) {
        self.active = true;
    }

    /// Recompute `active` from vehicle liveness: true while any priority
    /// vehicle is still present
    pub fn refresh(&mut self, vehicles: &[Vehicle]) {
        self.active = vehicles.iter().any(|vehicle| vehicle.priority);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
