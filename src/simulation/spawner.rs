//! Vehicle generation with spacing-safety admission
//!
//! Each tick the spawner rolls for one new vehicle of a uniformly chosen
//! class, direction, and lane, subject to a hard cap on active vehicles.
//! Admission is decided by the caller against the spacing-safety check;
//! rejected spawns are dropped silently.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::SimConfig;
use super::types::{Direction, VehicleClass, LANES_PER_APPROACH};
use super::vehicle::Vehicle;

/// Attributes for a vehicle the spawner proposes this tick
#[derive(Debug, Clone, Copy)]
pub struct SpawnAttributes {
    pub class: VehicleClass,
    pub direction: Direction,
    pub lane: u8,
    pub will_turn: bool,
}

/// Probabilistic generator of regular (non-emergency) vehicles
#[derive(Debug)]
pub struct VehicleSpawner {
    rng: StdRng,
}

impl VehicleSpawner {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Roll for a new vehicle; `None` when the cap is reached or the roll
    /// fails
    pub fn tick(&mut self, active_vehicles: usize, config: &SimConfig) -> Option<SpawnAttributes> {
        if active_vehicles >= config.max_vehicles {
            return None;
        }
        if !self.rng.random_bool(config.spawn_probability) {
            return None;
        }

        let class = *VehicleClass::SPAWNABLE.choose(&mut self.rng)?;
        let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
        let lane = self.rng.random_range(0..LANES_PER_APPROACH);
        let will_turn = self.rng.random_bool(config.turn_probability);

        Some(SpawnAttributes {
            class,
            direction,
            lane,
            will_turn,
        })
    }
}

/// Spacing-safety check: a candidate may only be admitted when no existing
/// same-direction, same-lane vehicle is within twice the minimum gap of its
/// position
pub fn spacing_clear(vehicles: &[Vehicle], candidate: &Vehicle, gap: f32) -> bool {
    vehicles.iter().all(|existing| {
        existing.direction != candidate.direction
            || existing.lane != candidate.lane
            || existing.position.distance(&candidate.position) >= gap * 2.0
    })
}
