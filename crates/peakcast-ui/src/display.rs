//! Rendering-agnostic display sink and the view models it receives.
//!
//! A renderer implements [`DisplaySink`]; [`render_snapshot`] translates an
//! immutable [`CardSnapshot`] into sink calls.

use chrono::{Local, NaiveTime};
use peakcast_weather::{Band, Mountain, WeatherSample, WeatherSeries, FORECAST_HOURS};

use crate::card_state::CardStatus;
use crate::controller::CardSnapshot;
use crate::detail::{AdvancedView, ChartSeries, DetailRow, StatsBlock};

pub const SNOW_MARKER: &str = " ❄️";

/// Rows shown in the compact table unless configured otherwise
pub const DEFAULT_SUMMARY_ROWS: usize = 8;

/// Handle given to the error view; hand it back to the collection to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAction {
    pub mountain_id: String,
    pub band: Band,
}

/// One badge per band in the card header.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationBadge {
    pub band: Band,
    pub icon: &'static str,
    /// e.g. `Base: 1800 m`
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardHeader {
    pub title: String,
    pub subtitle: String,
    pub badges: Vec<ElevationBadge>,
}

impl CardHeader {
    pub fn from_mountain(mountain: &Mountain) -> Self {
        let badges = Band::ALL
            .into_iter()
            .map(|band| ElevationBadge {
                band,
                icon: band_icon(band),
                label: format!("{}: {} m", band.title(), fmt_num(mountain.elevation(band))),
            })
            .collect();

        Self {
            title: mountain.name.clone(),
            subtitle: mountain.subtitle(),
            badges,
        }
    }
}

fn band_icon(band: Band) -> &'static str {
    match band {
        Band::Base => "📍",
        Band::Mid => "⛰️",
        Band::Summit => "🏔️",
    }
}

/// Headline of a loaded card, built from the first (current) sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub headline: String,
    pub meta: String,
    pub snow_likely: bool,
}

impl SummaryView {
    pub fn from_sample(sample: &WeatherSample, updated: NaiveTime, timezone_label: &str) -> Self {
        let gust = sample
            .wind_gust_kmh
            .map(|g| format!(" (gust {})", fmt_num(g)))
            .unwrap_or_default();
        let snow = if sample.snow_likely { SNOW_MARKER } else { "" };

        Self {
            headline: format!(
                "{}°C • {} km/h{}",
                fmt_num(sample.temp_c),
                fmt_opt(sample.wind_speed_kmh),
                gust
            ),
            meta: format!(
                "{} mm{} • Updated {} • TZ: {}",
                fmt_num(sample.precip_mm),
                snow,
                updated.format("%H:%M"),
                timezone_label
            ),
            snow_likely: sample.snow_likely,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub time: String,
    pub temp: String,
    pub wind: String,
    pub gust: String,
    pub precip: String,
    pub snow_likely: bool,
}

impl SummaryRow {
    pub fn from_sample(sample: &WeatherSample) -> Self {
        let snow = if sample.snow_likely { SNOW_MARKER } else { "" };
        Self {
            time: sample.hour_label().to_string(),
            temp: format!("{}°C{}", fmt_num(sample.temp_c), snow),
            wind: format!("{} km/h", fmt_opt(sample.wind_speed_kmh)),
            gust: format!("{} km/h", fmt_opt(sample.wind_gust_kmh)),
            precip: format!("{} mm", fmt_num(sample.precip_mm)),
            snow_likely: sample.snow_likely,
        }
    }
}

/// First rows of the forecast, as shown on the card itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
    pub footer: String,
}

impl SummaryTable {
    pub fn from_series(series: &WeatherSeries, max_rows: usize) -> Self {
        let rows: Vec<SummaryRow> = series
            .iter()
            .take(max_rows)
            .map(SummaryRow::from_sample)
            .collect();
        let footer = format!("Showing next {} of {} hours", rows.len(), FORECAST_HOURS);
        Self { rows, footer }
    }
}

/// Presentation options applied when rendering snapshots.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub summary_rows: usize,
    pub timezone_label: String,
    /// Stamp for the "Updated" label; the local clock at render time when unset
    pub updated_at: Option<NaiveTime>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            summary_rows: DEFAULT_SUMMARY_ROWS,
            timezone_label: "Europe/Madrid".to_string(),
            updated_at: None,
        }
    }
}

impl From<&peakcast_core::CardsConfig> for RenderOptions {
    fn from(cards: &peakcast_core::CardsConfig) -> Self {
        Self {
            summary_rows: cards.summary_rows,
            timezone_label: cards.timezone_label.clone(),
            updated_at: None,
        }
    }
}

/// UI collaborator. Implementations own all visual concerns.
pub trait DisplaySink {
    fn show_header(&mut self, header: &CardHeader);
    fn show_loading(&mut self);
    fn show_summary(&mut self, summary: &SummaryView);
    fn show_table(&mut self, table: &SummaryTable);
    fn show_empty(&mut self);
    fn show_error(&mut self, message: &str, retry: RetryAction);
    fn show_advanced(&mut self, stats: &StatsBlock, charts: &ChartSeries, table: &[DetailRow]);
}

/// Drive `sink` from one snapshot. Idle cards render nothing.
pub fn render_snapshot(snapshot: &CardSnapshot, options: &RenderOptions, sink: &mut dyn DisplaySink) {
    match &snapshot.status {
        CardStatus::Idle => {}
        CardStatus::Loading => sink.show_loading(),
        CardStatus::Loaded(series) => {
            if let Some(first) = series.first() {
                let updated = options.updated_at.unwrap_or_else(|| Local::now().time());
                sink.show_summary(&SummaryView::from_sample(
                    first,
                    updated,
                    &options.timezone_label,
                ));
            }
            sink.show_table(&SummaryTable::from_series(series, options.summary_rows));
        }
        CardStatus::Empty => sink.show_empty(),
        CardStatus::Failed { message, hint } => {
            let text = format!("{} ({})", message, hint);
            sink.show_error(
                &text,
                RetryAction {
                    mountain_id: snapshot.mountain.id.clone(),
                    band: snapshot.band,
                },
            );
        }
    }
}

/// Card title, subtitle and elevation badges; independent of the card's state.
pub fn render_header(mountain: &Mountain, sink: &mut dyn DisplaySink) {
    sink.show_header(&CardHeader::from_mountain(mountain));
}

/// Hand a derived advanced view to the sink.
pub fn render_advanced(view: &AdvancedView, sink: &mut dyn DisplaySink) {
    sink.show_advanced(&view.stats, &view.charts, &view.table);
}

/// Shortest decimal form: `10`, `-2.5`, `0.2`.
pub fn fmt_num(value: f64) -> String {
    // -0.0 prints as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}", value)
}

/// Like [`fmt_num`] with `-` for absent readings.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_num).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_sample() -> WeatherSample {
        WeatherSample {
            time: "2024-01-01T06:00".to_string(),
            temp_c: -2.5,
            wind_speed_kmh: Some(10.0),
            wind_gust_kmh: Some(18.0),
            precip_mm: 0.2,
            snow_likely: true,
            weather_description: "Light snow".to_string(),
            wind_direction: "NW".to_string(),
            humidity: Some(85.0),
            cloud_cover: None,
        }
    }

    fn stamp() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 5, 0).unwrap()
    }

    fn mountain() -> Mountain {
        Mountain {
            id: "aneto".to_string(),
            name: "Aneto".to_string(),
            massif: Some("Maladeta".to_string()),
            province: Some("Huesca".to_string()),
            bands: peakcast_weather::Bands {
                base: peakcast_weather::BandInfo { elev_m: 1800.0 },
                mid: peakcast_weather::BandInfo { elev_m: 2600.0 },
                summit: peakcast_weather::BandInfo { elev_m: 3404.0 },
            },
        }
    }

    #[derive(Default)]
    struct Headers(Vec<CardHeader>);

    impl DisplaySink for Headers {
        fn show_header(&mut self, header: &CardHeader) {
            self.0.push(header.clone());
        }
        fn show_loading(&mut self) {}
        fn show_summary(&mut self, _summary: &SummaryView) {}
        fn show_table(&mut self, _table: &SummaryTable) {}
        fn show_empty(&mut self) {}
        fn show_error(&mut self, _message: &str, _retry: RetryAction) {}
        fn show_advanced(&mut self, _stats: &StatsBlock, _charts: &ChartSeries, _table: &[DetailRow]) {}
    }

    #[test]
    fn summary_of_literal_sample() {
        let summary = SummaryView::from_sample(&literal_sample(), stamp(), "Europe/Madrid");
        assert_eq!(summary.headline, "-2.5°C • 10 km/h (gust 18)");
        assert_eq!(summary.meta, "0.2 mm ❄️ • Updated 14:05 • TZ: Europe/Madrid");
        assert!(summary.snow_likely);
    }

    #[test]
    fn summary_without_wind_readings() {
        let mut sample = literal_sample();
        sample.wind_speed_kmh = None;
        sample.wind_gust_kmh = None;
        sample.snow_likely = false;

        let summary = SummaryView::from_sample(&sample, stamp(), "UTC");
        assert_eq!(summary.headline, "-2.5°C • - km/h");
        assert!(!summary.meta.contains(SNOW_MARKER));
    }

    #[test]
    fn summary_row_uses_verbatim_time_label() {
        let row = SummaryRow::from_sample(&literal_sample());
        assert_eq!(row.time, "06:00");
        assert_eq!(row.temp, "-2.5°C ❄️");
        assert_eq!(row.wind, "10 km/h");
        assert_eq!(row.gust, "18 km/h");
        assert_eq!(row.precip, "0.2 mm");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(-2.5), "-2.5");
        assert_eq!(fmt_opt(None), "-");
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_opt(Some(-0.0)), "0");

        let mut sample = literal_sample();
        sample.temp_c = -0.0;
        let summary = SummaryView::from_sample(&sample, stamp(), "UTC");
        assert!(summary.headline.starts_with("0°C"), "{}", summary.headline);
        assert_eq!(SummaryRow::from_sample(&sample).temp, "0°C ❄️");
    }

    #[test]
    fn header_has_one_badge_per_band() {
        let header = CardHeader::from_mountain(&mountain());
        assert_eq!(header.title, "Aneto");
        assert_eq!(header.subtitle, "Maladeta • Huesca");

        let labels: Vec<&str> = header.badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Base: 1800 m", "Mid: 2600 m", "Summit: 3404 m"]);
        assert_eq!(header.badges[2].icon, "🏔️");
    }

    #[test]
    fn render_header_hands_header_to_sink() {
        let mut sink = Headers::default();
        render_header(&mountain(), &mut sink);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].badges[0].band, Band::Base);
    }
}
