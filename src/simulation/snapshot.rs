//! Copy-out views of simulation state for external consumers
//!
//! Rendering and dashboard hosts read these owned values between ticks;
//! they never hold references into live simulation state.

use super::types::{Direction, Position, VehicleClass, VehicleId};

/// One vehicle as seen by an external consumer
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub direction: Direction,
    pub lane: u8,
    pub position: Position,
    pub crossed: bool,
    pub priority: bool,
    pub will_turn: bool,
    pub wait_time: u32,
}

/// Signal state: which direction holds the non-red phase, and the applied plan
#[derive(Debug, Clone, PartialEq)]
pub struct SignalView {
    pub current_green: Direction,
    pub yellow_active: bool,
    pub green_times: [u32; 4],
    pub cycle_length: u32,
}

/// Weather intensities and the derived speed modifier
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub rain: f32,
    pub fog: f32,
    pub wind: f32,
    pub speed_modifier: f32,
}

/// Rolling aggregate statistics
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    /// Vehicles that have passed their stop line since the simulation started
    pub total_crossed: u64,
    /// Mean wait of queued vehicles, averaged over the last few samples
    pub average_wait: f32,
    /// Crossed vehicles per elapsed tick
    pub throughput: f32,
}

/// A full copy-out snapshot of the simulation taken between ticks
#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    pub tick: u64,
    pub vehicles: Vec<VehicleView>,
    pub signal: SignalView,
    pub weather: WeatherView,
    pub stats: StatsView,
    pub emergency_active: bool,
}
