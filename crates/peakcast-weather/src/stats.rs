//! Summary statistics over a 24-hour forecast.

use serde::Serialize;

use crate::types::WeatherSeries;

/// Summary of a non-empty series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastStats {
    pub min_temp: f64,
    pub max_temp: f64,
    /// Mean temperature, 1 decimal
    pub avg_temp: f64,
    /// `None` when no sample carries a wind speed
    pub max_wind: Option<f64>,
    /// Sum of precipitation, 1 decimal
    pub total_precip: f64,
    pub snow_hours: usize,
}

impl ForecastStats {
    /// Compute statistics; `None` for an empty series.
    pub fn from_series(series: &WeatherSeries) -> Option<Self> {
        let first = series.first()?;

        let mut min_temp = first.temp_c;
        let mut max_temp = first.temp_c;
        let mut temp_sum = 0.0;
        let mut precip_sum = 0.0;
        let mut max_wind: Option<f64> = None;
        let mut snow_hours = 0;

        for sample in series {
            min_temp = min_temp.min(sample.temp_c);
            max_temp = max_temp.max(sample.temp_c);
            temp_sum += sample.temp_c;
            precip_sum += sample.precip_mm;
            if let Some(wind) = sample.wind_speed_kmh {
                max_wind = Some(max_wind.map_or(wind, |m| m.max(wind)));
            }
            if sample.snow_likely {
                snow_hours += 1;
            }
        }

        Some(Self {
            min_temp,
            max_temp,
            avg_temp: round1(temp_sum / series.len() as f64),
            max_wind,
            total_precip: round1(precip_sum),
            snow_hours,
        })
    }
}

/// Round half away from zero to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
