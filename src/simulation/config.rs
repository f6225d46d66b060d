//! Simulation tunables
//!
//! All rates, gaps, and timing bounds live here so hosts and tests can build
//! worlds with custom behavior. Defaults match the reference intersection.

use std::time::Duration;

/// Signal timing bounds and defaults, in ticks
#[derive(Debug, Clone)]
pub struct SignalTiming {
    /// Green time used by the fallback plan
    pub default_green: u32,
    /// Yellow duration per direction
    pub yellow: u32,
    /// Lower clamp for advisory green times
    pub min_green: u32,
    /// Upper clamp for advisory green times
    pub max_green: u32,
    /// Base green time before the per-vehicle advisory adjustment
    pub base_green: u32,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            default_green: 20,
            yellow: 5,
            min_green: 10,
            max_green: 60,
            base_green: 20,
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Clearance between a stopped vehicle and its stop line; spawn spacing
    /// requires twice this distance
    pub gap: f32,
    /// Minimum following gap while moving
    pub moving_gap: f32,
    /// How far past the stop line a vehicle must travel to count as crossed
    pub crossing_margin: f32,
    /// Per-tick probability of generating a regular vehicle
    pub spawn_probability: f64,
    /// Hard cap on simultaneously active vehicles
    pub max_vehicles: usize,
    /// Probability that a spawned vehicle intends to turn
    pub turn_probability: f64,
    /// Per-tick probability of dispatching an emergency vehicle
    pub emergency_probability: f64,
    /// Minimum ticks between emergency dispatch attempts
    pub emergency_cooldown: u32,
    /// Ticks between full weather redraws
    pub weather_interval: u32,
    /// Upper bound on fog intensity
    pub max_fog: f32,
    /// Upper bound on wind intensity
    pub max_wind: f32,
    /// Hard bound on one advisory request
    pub advisory_timeout: Duration,
    /// Trailing window for per-direction flow rates, in ticks
    pub flow_window: u64,
    /// Number of samples in the rolling wait-time average
    pub wait_samples: usize,
    /// Simulated ticks per hour of day
    pub ticks_per_hour: u64,
    /// Hour of day at tick zero
    pub start_hour: u8,
    /// Signal timing bounds
    pub signal: SignalTiming,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gap: 15.0,
            moving_gap: 15.0,
            crossing_margin: 50.0,
            spawn_probability: 0.3,
            max_vehicles: 50,
            turn_probability: 0.4,
            emergency_probability: 0.001,
            emergency_cooldown: 200,
            weather_interval: 100,
            max_fog: 0.8,
            max_wind: 0.6,
            advisory_timeout: Duration::from_millis(200),
            flow_window: 60,
            wait_samples: 10,
            ticks_per_hour: 3600,
            start_hour: 8,
            signal: SignalTiming::default(),
        }
    }
}
