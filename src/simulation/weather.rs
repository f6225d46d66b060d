//! Weather conditions affecting vehicle speed
//!
//! Three independent intensities (rain, fog, wind) are redrawn on a fixed
//! cadence and reduce to a single multiplicative speed modifier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SimConfig;

/// Maximum speed reduction from full-intensity rain
const RAIN_SLOWDOWN: f32 = 0.3;

/// Maximum speed reduction from full-intensity fog
const FOG_SLOWDOWN: f32 = 0.2;

/// Maximum speed reduction from full-intensity wind
const WIND_SLOWDOWN: f32 = 0.1;

/// Current weather over the intersection, each intensity in [0, 1]
#[derive(Debug)]
pub struct WeatherModel {
    rain: f32,
    fog: f32,
    wind: f32,
    ticks_since_update: u32,
    rng: StdRng,
}

impl WeatherModel {
    /// Start with clear conditions
    pub fn new(rng: StdRng) -> Self {
        Self {
            rain: 0.0,
            fog: 0.0,
            wind: 0.0,
            ticks_since_update: 0,
            rng,
        }
    }

    /// Pin the intensities to fixed values; used by hosts that want to force
    /// specific conditions rather than sample them
    pub fn fixed(rain: f32, fog: f32, wind: f32) -> Self {
        Self {
            rain,
            fog,
            wind,
            ticks_since_update: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Advance one tick; every `weather_interval` ticks all three
    /// intensities are redrawn at once, other ticks leave them unchanged
    pub fn tick(&mut self, config: &SimConfig) {
        self.ticks_since_update += 1;
        if self.ticks_since_update >= config.weather_interval {
            self.rain = self.rng.random::<f32>();
            self.fog = self.rng.random::<f32>() * config.max_fog;
            self.wind = self.rng.random::<f32>() * config.max_wind;
            self.ticks_since_update = 0;
        }
    }

    /// Multiplier applied to every vehicle's base speed, in (0, 1]
    ///
    /// The most restrictive single factor dominates; simultaneous adverse
    /// conditions do not compound beyond the worst single effect.
    pub fn speed_modifier(&self) -> f32 {
        let rain_effect = 1.0 - self.rain * RAIN_SLOWDOWN;
        let fog_effect = 1.0 - self.fog * FOG_SLOWDOWN;
        let wind_effect = 1.0 - self.wind * WIND_SLOWDOWN;
        rain_effect.min(fog_effect).min(wind_effect)
    }

    /// Current (rain, fog, wind) intensities
    pub fn intensities(&self) -> (f32, f32, f32) {
        (self.rain, self.fog, self.wind)
    }
}
