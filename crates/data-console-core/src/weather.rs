// crates/data-console-core/src/weather.rs
// ============================================================================
// Module: Synthetic Weather
// Description: Deterministic-shape, randomized-value weather generator.
// Purpose: Serve weather lookups without a network dependency.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Weather data is intentionally synthetic: temperature in 20-35 degrees
//! Celsius (two decimals), humidity in 40-80 percent, and a condition drawn
//! from a fixed set. Only the city name is validated; no normalization is
//! applied to it.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ServiceError;
use crate::validate::validate_city;

/// Inclusive lower bound for synthetic temperatures (Celsius).
const MIN_TEMPERATURE: f64 = 20.0;
/// Exclusive upper bound for synthetic temperatures (Celsius).
const MAX_TEMPERATURE: f64 = 35.0;
/// Inclusive humidity range in percent.
const HUMIDITY_RANGE: std::ops::RangeInclusive<u8> = 40 ..= 80;

/// Fixed set of synthetic weather conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Clear skies.
    Sunny,
    /// Overcast.
    Cloudy,
    /// Precipitation.
    Rainy,
}

impl WeatherCondition {
    /// Returns all synthetic conditions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sunny, Self::Cloudy, Self::Rainy]
    }

    /// Returns the display label for the condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
        }
    }
}

/// Weather lookup result for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City the report was generated for.
    pub city: String,
    /// Temperature in degrees Celsius, rounded to two decimals.
    pub temperature_celsius: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Current condition.
    pub condition: WeatherCondition,
}

/// Generates a synthetic weather report for a city.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the city name is malformed.
pub fn get_weather(city: &str) -> Result<WeatherReport, ServiceError> {
    validate_city(city)?;
    let mut rng = rand::thread_rng();
    let raw_temperature: f64 = rng.gen_range(MIN_TEMPERATURE .. MAX_TEMPERATURE);
    let condition = WeatherCondition::all()
        .choose(&mut rng)
        .copied()
        .unwrap_or(WeatherCondition::Sunny);
    Ok(WeatherReport {
        city: city.to_string(),
        temperature_celsius: (raw_temperature * 100.0).round() / 100.0,
        humidity: rng.gen_range(HUMIDITY_RANGE),
        condition,
    })
}
