use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of hourly samples in a non-empty forecast
pub const FORECAST_HOURS: usize = 24;

/// Format of the `time` field as sent by the server (local wall clock, minute precision)
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Elevation tier at which a forecast is sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    #[default]
    Base,
    Mid,
    Summit,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Base, Band::Mid, Band::Summit];

    /// Query-string value used by the weather endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Mid => "mid",
            Self::Summit => "summit",
        }
    }

    /// Capitalized name for headings
    pub fn title(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Mid => "Mid",
            Self::Summit => "Summit",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "mid" => Ok(Self::Mid),
            "summit" => Ok(Self::Summit),
            other => Err(format!("unknown band: {}", other)),
        }
    }
}

/// Elevation of one band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    pub elev_m: f64,
}

/// Per-band elevations of a mountain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub base: BandInfo,
    pub mid: BandInfo,
    pub summit: BandInfo,
}

impl Bands {
    pub fn get(&self, band: Band) -> &BandInfo {
        match band {
            Band::Base => &self.base,
            Band::Mid => &self.mid,
            Band::Summit => &self.summit,
        }
    }
}

/// Catalog descriptor of a tracked mountain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mountain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub massif: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    pub bands: Bands,
}

impl Mountain {
    /// Elevation in meters of the given band
    pub fn elevation(&self, band: Band) -> f64 {
        self.bands.get(band).elev_m
    }

    /// "Massif • Province" line, skipping absent parts
    pub fn subtitle(&self) -> String {
        [self.massif.as_deref(), self.province.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// One hourly forecast record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Local wall-clock timestamp, e.g. `2024-01-01T06:00`
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub wind_speed_kmh: Option<f64>,
    #[serde(default)]
    pub wind_gust_kmh: Option<f64>,
    pub precip_mm: f64,
    pub snow_likely: bool,
    #[serde(default)]
    pub weather_description: String,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
}

impl WeatherSample {
    /// `HH:MM` taken verbatim from characters 11..16 of `time`.
    ///
    /// No timezone handling: the server's wall-clock label is kept as-is.
    /// Falls back to the whole string when it is too short.
    pub fn hour_label(&self) -> &str {
        self.time.get(11..16).unwrap_or(&self.time)
    }
}

/// Reasons a received sample list is not a valid series
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("expected 0 or {expected} samples, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("unparseable time {0:?}")]
    BadTime(String),

    #[error("samples not ascending at index {index}: {previous} then {current}")]
    NotAscending {
        index: usize,
        previous: String,
        current: String,
    },
}

/// Hourly forecast: either empty (no coverage) or exactly 24 samples in non-decreasing time order.
///
/// The order received from the server is kept; a series is never re-sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct WeatherSeries(Vec<WeatherSample>);

impl WeatherSeries {
    /// Validate server samples into a series
    pub fn new(samples: Vec<WeatherSample>) -> Result<Self, SeriesError> {
        if samples.is_empty() {
            return Ok(Self::empty());
        }
        if samples.len() != FORECAST_HOURS {
            return Err(SeriesError::BadLength {
                expected: FORECAST_HOURS,
                actual: samples.len(),
            });
        }

        let mut previous: Option<NaiveDateTime> = None;
        for (index, sample) in samples.iter().enumerate() {
            let current = NaiveDateTime::parse_from_str(&sample.time, TIME_FORMAT)
                .map_err(|_| SeriesError::BadTime(sample.time.clone()))?;
            if let Some(prev) = previous {
                // repeated wall-clock hours happen when DST ends
                if current < prev {
                    return Err(SeriesError::NotAscending {
                        index,
                        previous: samples[index - 1].time.clone(),
                        current: sample.time.clone(),
                    });
                }
            }
            previous = Some(current);
        }

        Ok(Self(samples))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Current/nearest hour
    pub fn first(&self) -> Option<&WeatherSample> {
        self.0.first()
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherSample> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a WeatherSeries {
    type Item = &'a WeatherSample;
    type IntoIter = std::slice::Iter<'a, WeatherSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
