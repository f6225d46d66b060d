//! Weather model validation
//!
//! Covers the redraw cadence, the intensity caps, and the min-factor speed
//! modifier semantics.

use rand::rngs::StdRng;
use rand::SeedableRng;

use intersection_sim::simulation::{SimConfig, WeatherModel};

#[test]
fn test_speed_modifier_stays_in_unit_interval() {
    // Even at maximum intensities the worst single factor is a 30% cut.
    let worst = WeatherModel::fixed(1.0, 1.0, 1.0);
    let modifier = worst.speed_modifier();
    assert!(modifier > 0.0 && modifier <= 1.0);

    let clear = WeatherModel::fixed(0.0, 0.0, 0.0);
    assert_eq!(clear.speed_modifier(), 1.0);
}

#[test]
fn test_most_restrictive_factor_dominates_without_compounding() {
    // rain 1.0 -> 0.7, fog 1.0 -> 0.8, wind 1.0 -> 0.9; the modifier is the
    // minimum factor, not the product of all three.
    let weather = WeatherModel::fixed(1.0, 1.0, 1.0);
    assert!((weather.speed_modifier() - 0.7).abs() < 1e-6);

    let foggy = WeatherModel::fixed(0.0, 1.0, 0.0);
    assert!((foggy.speed_modifier() - 0.8).abs() < 1e-6);
}

#[test]
fn test_modifier_is_monotonic_in_each_intensity() {
    let steps = [0.0f32, 0.25, 0.5, 0.75, 1.0];

    for window in steps.windows(2) {
        let (low, high) = (window[0], window[1]);

        assert!(
            WeatherModel::fixed(high, 0.3, 0.3).speed_modifier()
                <= WeatherModel::fixed(low, 0.3, 0.3).speed_modifier(),
            "more rain never speeds vehicles up"
        );
        assert!(
            WeatherModel::fixed(0.3, high, 0.3).speed_modifier()
                <= WeatherModel::fixed(0.3, low, 0.3).speed_modifier(),
            "more fog never speeds vehicles up"
        );
        assert!(
            WeatherModel::fixed(0.3, 0.3, high).speed_modifier()
                <= WeatherModel::fixed(0.3, 0.3, low).speed_modifier(),
            "more wind never speeds vehicles up"
        );
    }
}

#[test]
fn test_intensities_update_only_on_the_interval() {
    let config = SimConfig::default();
    let mut weather = WeatherModel::new(StdRng::seed_from_u64(7));

    for _ in 0..(config.weather_interval - 1) {
        weather.tick(&config);
        assert_eq!(
            weather.intensities(),
            (0.0, 0.0, 0.0),
            "intensities are untouched between redraws"
        );
    }

    weather.tick(&config);
    assert_ne!(
        weather.intensities(),
        (0.0, 0.0, 0.0),
        "the interval tick redraws all three intensities"
    );
}

#[test]
fn test_fog_and_wind_stay_below_their_caps() {
    let config = SimConfig::default();
    let mut weather = WeatherModel::new(StdRng::seed_from_u64(99));

    for _ in 0..20 {
        for _ in 0..config.weather_interval {
            weather.tick(&config);
        }
        let (rain, fog, wind) = weather.intensities();
        assert!((0.0..=1.0).contains(&rain));
        assert!(fog <= config.max_fog, "fog is capped below full intensity");
        assert!(wind <= config.max_wind, "wind is capped below full intensity");
        assert!(weather.speed_modifier() > 0.0 && weather.speed_modifier() <= 1.0);
    }
}
