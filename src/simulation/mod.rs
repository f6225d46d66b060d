//! Standalone intersection simulation core
//!
//! This module contains all the simulation logic: vehicle kinematics, the
//! signal controller state machine, weather, emergency preemption, the
//! advisory interface with its fallback policy, and the tick driver. It has
//! no rendering dependencies and can be driven from a console host or tests.

mod advisory;
mod config;
mod emergency;
mod signal;
mod snapshot;
mod spawner;
mod stats;
mod types;
mod vehicle;
mod weather;
mod world;

pub use advisory::{
    parse_waiting_counts, AdvisoryClient, AdvisoryRequest, AdvisoryService, LocalQueueAdvisor,
};
pub use config::{SignalTiming, SimConfig};
pub use emergency::EmergencyPreemption;
pub use signal::{SignalController, TimingPlan};
pub use snapshot::{SignalView, SimSnapshot, StatsView, VehicleView, WeatherView};
pub use spawner::{spacing_clear, SpawnAttributes, VehicleSpawner};
pub use stats::SimStats;
pub use types::{
    Direction, Position, VehicleClass, VehicleId, AREA_HEIGHT, AREA_WIDTH, EXIT_MARGIN,
    LANES_PER_APPROACH,
};
pub use vehicle::Vehicle;
pub use weather::WeatherModel;
pub use world::SimWorld;
