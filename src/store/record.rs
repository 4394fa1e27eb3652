//! Forecast record type and the Celsius to Fahrenheit conversion.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Divisor used by the Celsius to Fahrenheit conversion (approximately 5/9)
const FAHRENHEIT_DIVISOR: f64 = 0.5556;

/// Offset added after scaling Celsius to Fahrenheit
const FAHRENHEIT_OFFSET: f64 = 32.0;

/// One stored weather forecast.
///
/// The Fahrenheit temperature is never persisted; it is derived from
/// `temperature_c` every time the record is serialized.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub summary: Option<String>,
}

impl ForecastRecord {
    pub fn new(date: NaiveDate, temperature_c: i32, summary: impl Into<String>) -> Self {
        Self {
            date,
            temperature_c,
            summary: Some(summary.into()),
        }
    }

    /// Temperature in degrees Fahrenheit, derived from `temperature_c`.
    pub fn temperature_f(&self) -> i32 {
        celsius_to_fahrenheit(self.temperature_c)
    }
}

/// Convert Celsius to Fahrenheit as `32 + c / 0.5556`, rounding half to even.
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    round_half_even(FAHRENHEIT_OFFSET + f64::from(celsius) / FAHRENHEIT_DIVISOR)
}

/// Round to the nearest integer, ties going to the even neighbour.
///
/// Values outside the `i32` range saturate to `i32::MIN`/`i32::MAX`, which
/// happens for Celsius inputs beyond roughly ±1.19e9.
fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

impl Serialize for ForecastRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ForecastRecord", 4)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("temperatureC", &self.temperature_c)?;
        state.serialize_field("temperatureF", &self.temperature_f())?;
        state.serialize_field("summary", &self.summary)?;
        state.end()
    }
}
