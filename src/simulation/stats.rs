//! Rolling simulation statistics
//!
//! Tracks crossings for throughput and per-direction flow rates, and a
//! rolling average of queued-vehicle wait times for the dashboard snapshot.

use std::collections::VecDeque;

use super::types::Direction;
use super::vehicle::Vehicle;

/// Aggregate counters and rolling windows
#[derive(Debug, Default)]
pub struct SimStats {
    total_crossed: u64,
    /// (tick, direction) per crossing, pruned to the flow window
    crossings: VecDeque<(u64, Direction)>,
    /// Mean wait of queued vehicles, one sample per tick
    wait_samples: VecDeque<f32>,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a vehicle passed its stop line this tick
    pub fn record_crossing(&mut self, tick: u64, direction: Direction) {
        self.total_crossed += 1;
        self.crossings.push_back((tick, direction));
    }

    /// Sample the mean wait of vehicles still queued, keeping the last
    /// `window` samples; ticks with no queued vehicles contribute nothing
    pub fn sample_waits(&mut self, vehicles: &[Vehicle], window: usize) {
        let mut total = 0u64;
        let mut queued = 0u64;
        for vehicle in vehicles {
            if !vehicle.crossed {
                total += u64::from(vehicle.wait_time);
                queued += 1;
            }
        }
        if queued > 0 {
            self.wait_samples.push_back(total as f32 / queued as f32);
            while self.wait_samples.len() > window {
                self.wait_samples.pop_front();
            }
        }
    }

    /// Per-direction crossings per tick over the trailing `window` ticks
    pub fn flow_rates(&mut self, now: u64, window: u64) -> [f32; 4] {
        while let Some(&(tick, _)) = self.crossings.front() {
            if now.saturating_sub(tick) >= window {
                self.crossings.pop_front();
            } else {
                break;
            }
        }

        let mut rates = [0.0f32; 4];
        for &(_, direction) in &self.crossings {
            rates[direction.index()] += 1.0;
        }
        for rate in &mut rates {
            *rate /= window as f32;
        }
        rates
    }

    /// Vehicles that have crossed since the simulation started
    pub fn total_crossed(&self) -> u64 {
        self.total_crossed
    }

    /// Rolling average of the queued-vehicle wait samples
    pub fn average_wait(&self) -> f32 {
        if self.wait_samples.is_empty() {
            return 0.0;
        }
        self.wait_samples.iter().sum::<f32>() / self.wait_samples.len() as f32
    }

    /// Crossed vehicles per elapsed tick
    pub fn throughput(&self, elapsed_ticks: u64) -> f32 {
        self.total_crossed as f32 / elapsed_ticks.max(1) as f32
    }
}
