//! Advanced weather view: stat cards, chart series and the full hourly table.
//!
//! Pure derivation from a Loaded card; deriving twice from the same state
//! gives the same view and never touches the network.

use peakcast_weather::{Band, ForecastStats, Mountain, WeatherSample, WeatherSeries};
use thiserror::Error;

use crate::card_state::CardState;
use crate::display::{fmt_num, fmt_opt, SNOW_MARKER};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("weather for {mountain_id} is {status}, not loaded")]
    NotLoaded {
        mountain_id: String,
        status: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// Header, raw statistics and their display cards.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsBlock {
    pub title: String,
    pub subtitle: String,
    pub stats: ForecastStats,
    pub cards: Vec<StatCard>,
}

/// One precipitation bar; `snow_likely` only picks the bar color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipBar {
    pub mm: f64,
    pub snow_likely: bool,
}

/// Inputs for the charting collaborator, index-aligned with `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_gust: Vec<Option<f64>>,
    pub precipitation: Vec<PrecipBar>,
}

impl ChartSeries {
    pub fn from_series(series: &WeatherSeries) -> Self {
        Self {
            labels: series.iter().map(|s| s.hour_label().to_string()).collect(),
            temperature: series.iter().map(|s| s.temp_c).collect(),
            wind_speed: series.iter().map(|s| s.wind_speed_kmh).collect(),
            wind_gust: series.iter().map(|s| s.wind_gust_kmh).collect(),
            precipitation: series
                .iter()
                .map(|s| PrecipBar {
                    mm: s.precip_mm,
                    snow_likely: s.snow_likely,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub time: String,
    pub weather: String,
    pub temp: String,
    pub wind: String,
    pub direction: String,
    pub gust: String,
    pub precip: String,
    pub humidity: String,
    pub clouds: String,
}

impl DetailRow {
    pub fn from_sample(sample: &WeatherSample) -> Self {
        let snow = if sample.snow_likely { SNOW_MARKER } else { "" };
        Self {
            time: sample.hour_label().to_string(),
            weather: format!("{}{}", sample.weather_description, snow),
            temp: format!("{}°C", fmt_num(sample.temp_c)),
            wind: format!("{} km/h", fmt_opt(sample.wind_speed_kmh)),
            direction: sample.wind_direction.clone(),
            gust: format!("{} km/h", fmt_opt(sample.wind_gust_kmh)),
            precip: format!("{} mm", fmt_num(sample.precip_mm)),
            humidity: format!("{}%", fmt_opt(sample.humidity)),
            clouds: format!("{}%", fmt_opt(sample.cloud_cover)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedView {
    pub stats: StatsBlock,
    pub charts: ChartSeries,
    /// All 24 hours, untruncated
    pub table: Vec<DetailRow>,
}

impl AdvancedView {
    /// Derive the view for `mountain` from a Loaded card state.
    pub fn derive(mountain: &Mountain, state: &CardState) -> Result<Self, DetailError> {
        let not_loaded = || DetailError::NotLoaded {
            mountain_id: state.mountain_id().to_string(),
            status: state.status().name(),
        };

        let series = state.series().ok_or_else(not_loaded)?;
        let stats = ForecastStats::from_series(series).ok_or_else(not_loaded)?;
        let band = state.active_band();

        Ok(Self {
            stats: StatsBlock {
                title: format!("{} - Advanced Weather", mountain.name),
                subtitle: subtitle(mountain, band),
                cards: stat_cards(&stats),
                stats,
            },
            charts: ChartSeries::from_series(series),
            table: series.iter().map(DetailRow::from_sample).collect(),
        })
    }
}

fn subtitle(mountain: &Mountain, band: Band) -> String {
    format!(
        "{} elevation: {} m • 24-hour forecast",
        band.title(),
        fmt_num(mountain.elevation(band))
    )
}

fn stat_cards(stats: &ForecastStats) -> Vec<StatCard> {
    let mut cards = vec![
        StatCard {
            label: "Temperature Range",
            value: format!("{}° to {}°C", fmt_num(stats.min_temp), fmt_num(stats.max_temp)),
        },
        StatCard {
            label: "Average Temp",
            value: format!("{:.1}°C", stats.avg_temp),
        },
        StatCard {
            label: "Max Wind",
            value: match stats.max_wind {
                Some(wind) => format!("{} km/h", fmt_num(wind)),
                None => "No wind data".to_string(),
            },
        },
        StatCard {
            label: "Total Precipitation",
            value: format!("{:.1} mm", stats.total_precip),
        },
    ];

    if stats.snow_hours > 0 {
        cards.push(StatCard {
            label: "Snow Likely",
            value: format!("{} hours", stats.snow_hours),
        });
    }

    cards
}
