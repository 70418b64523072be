//! End-to-end card scenarios through MountainCollection.
//!
//! The gated fetcher parks every request until the test answers it, so the
//! order in which responses arrive is fully controlled.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;
use peakcast_ui::{
    render_header, render_snapshot, CardHeader, CardStatus, ChartSeries, DetailRow, DisplaySink,
    MountainCollection, RenderOptions, Resolution, RetryAction, StatsBlock, SummaryTable,
    SummaryView,
};
use peakcast_weather::{
    Band, BandInfo, Bands, FetchError, Mountain, WeatherFetcher, WeatherSample, WeatherSeries,
};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

struct PendingCall {
    mountain_id: String,
    band: Band,
    reply: oneshot::Sender<Result<WeatherSeries, FetchError>>,
}

impl PendingCall {
    fn answer(self, result: Result<WeatherSeries, FetchError>) {
        let _ = self.reply.send(result);
    }
}

struct GatedFetcher {
    calls: mpsc::UnboundedSender<PendingCall>,
}

#[async_trait]
impl WeatherFetcher for GatedFetcher {
    async fn fetch(&self, mountain_id: &str, band: Band) -> Result<WeatherSeries, FetchError> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall {
                mountain_id: mountain_id.to_string(),
                band,
                reply,
            })
            .map_err(|_| FetchError::Network("harness gone".to_string()))?;
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("request dropped".to_string())))
    }
}

fn gated() -> (MountainCollection, mpsc::UnboundedReceiver<PendingCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let coll = MountainCollection::new(Arc::new(GatedFetcher { calls: tx }), Handle::current());
    (coll, rx)
}

fn mountain(id: &str) -> Mountain {
    Mountain {
        id: id.to_string(),
        name: "Aneto".to_string(),
        massif: Some("Maladeta".to_string()),
        province: Some("Huesca".to_string()),
        bands: Bands {
            base: BandInfo { elev_m: 1800.0 },
            mid: BandInfo { elev_m: 2600.0 },
            summit: BandInfo { elev_m: 3404.0 },
        },
    }
}

/// 24 hours starting 06:00, first sample matching the documented example.
fn forecast(temp_c: f64) -> WeatherSeries {
    let samples = (0..24u32)
        .map(|i| {
            let hour = 6 + i;
            let time = if hour < 24 {
                format!("2024-01-01T{:02}:00", hour)
            } else {
                format!("2024-01-02T{:02}:00", hour - 24)
            };
            WeatherSample {
                time,
                temp_c,
                wind_speed_kmh: Some(10.0),
                wind_gust_kmh: Some(18.0),
                precip_mm: 0.2,
                snow_likely: temp_c <= 0.0,
                weather_description: "Light snow".to_string(),
                wind_direction: "NW".to_string(),
                humidity: Some(88.0),
                cloud_cover: Some(100.0),
            }
        })
        .collect();
    WeatherSeries::new(samples).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Header(CardHeader),
    Loading,
    Summary(SummaryView),
    Table(SummaryTable),
    Empty,
    Error(String, RetryAction),
    Advanced(usize),
}

#[derive(Default)]
struct RecordingSink {
    shown: Vec<Shown>,
}

impl DisplaySink for RecordingSink {
    fn show_header(&mut self, header: &CardHeader) {
        self.shown.push(Shown::Header(header.clone()));
    }

    fn show_loading(&mut self) {
        self.shown.push(Shown::Loading);
    }

    fn show_summary(&mut self, summary: &SummaryView) {
        self.shown.push(Shown::Summary(summary.clone()));
    }

    fn show_table(&mut self, table: &SummaryTable) {
        self.shown.push(Shown::Table(table.clone()));
    }

    fn show_empty(&mut self) {
        self.shown.push(Shown::Empty);
    }

    fn show_error(&mut self, message: &str, retry: RetryAction) {
        self.shown.push(Shown::Error(message.to_string(), retry));
    }

    fn show_advanced(&mut self, _stats: &StatsBlock, _charts: &ChartSeries, table: &[DetailRow]) {
        self.shown.push(Shown::Advanced(table.len()));
    }
}

#[tokio::test]
async fn superseded_band_resolving_late_is_discarded() {
    let (mut coll, mut calls) = gated();
    let snapshots = coll.track(mountain("aneto"));

    calls.recv().await.unwrap().answer(Ok(forecast(4.0)));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Loaded);

    coll.select_band("aneto", Band::Mid).unwrap();
    let mid = calls.recv().await.unwrap();
    coll.select_band("aneto", Band::Summit).unwrap();
    let summit = calls.recv().await.unwrap();
    assert_eq!(mid.band, Band::Mid);
    assert_eq!(summit.band, Band::Summit);

    // mid (older token) completes while summit is still outstanding
    mid.answer(Ok(forecast(9.0)));
    let done = coll.process_next().await.unwrap();
    assert_eq!(done.band, Band::Mid);
    assert_eq!(done.resolution, Resolution::Stale);
    {
        let snap = snapshots.borrow();
        assert_eq!(snap.band, Band::Summit);
        assert_eq!(snap.status, CardStatus::Loading);
    }

    summit.answer(Ok(forecast(-6.0)));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Loaded);

    let card = coll.card("aneto").unwrap();
    assert_eq!(card.state().active_band(), Band::Summit);
    assert_eq!(card.state().series().unwrap().first().unwrap().temp_c, -6.0);
}

#[tokio::test]
async fn older_request_resolving_after_newer_one_does_not_overwrite() {
    let (mut coll, mut calls) = gated();
    coll.track(mountain("aneto"));
    let base = calls.recv().await.unwrap();

    coll.select_band("aneto", Band::Summit).unwrap();
    let summit = calls.recv().await.unwrap();

    summit.answer(Ok(forecast(-6.0)));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Loaded);

    base.answer(Ok(forecast(12.0)));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Stale);

    let state = coll.card("aneto").unwrap().state();
    assert_eq!(state.active_band(), Band::Summit);
    assert_eq!(state.series().unwrap().first().unwrap().temp_c, -6.0);
}

#[tokio::test]
async fn empty_forecast_shows_no_data_not_error() {
    let (mut coll, mut calls) = gated();
    let snapshots = coll.track(mountain("tozal"));
    calls.recv().await.unwrap().answer(Ok(forecast(3.0)));
    coll.process_next().await.unwrap();

    coll.select_band("tozal", Band::Summit).unwrap();
    let call = calls.recv().await.unwrap();
    assert_eq!(call.mountain_id, "tozal");
    call.answer(Ok(WeatherSeries::empty()));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Empty);

    let mut sink = RecordingSink::default();
    render_snapshot(&snapshots.borrow(), &RenderOptions::default(), &mut sink);
    assert_eq!(sink.shown, vec![Shown::Empty]);
    assert!(coll.card("tozal").unwrap().state().error_message().is_none());
}

#[tokio::test]
async fn server_error_then_retry_recovers() {
    let (mut coll, mut calls) = gated();
    let snapshots = coll.track(mountain("aneto"));
    coll.select_band("aneto", Band::Mid).unwrap();

    let first = calls.recv().await.unwrap();
    let second = calls.recv().await.unwrap();
    let (base, mid) = if first.band == Band::Base {
        (first, second)
    } else {
        (second, first)
    };

    // base is superseded; answer it anyway
    base.answer(Ok(forecast(1.0)));
    mid.answer(Err(FetchError::Server {
        status: 500,
        body: "internal error".to_string(),
    }));

    for _ in 0..2 {
        coll.process_next().await.unwrap();
    }

    let mut sink = RecordingSink::default();
    render_snapshot(&snapshots.borrow(), &RenderOptions::default(), &mut sink);
    let retry = match sink.shown.as_slice() {
        [Shown::Error(message, retry)] => {
            assert!(message.contains("500"), "message: {message}");
            retry.clone()
        }
        other => panic!("expected a single error, got {other:?}"),
    };
    assert_eq!(retry.band, Band::Mid);

    coll.retry(&retry.mountain_id).unwrap();
    let again = calls.recv().await.unwrap();
    assert_eq!(again.band, Band::Mid);
    again.answer(Ok(forecast(-2.5)));
    assert_eq!(coll.process_next().await.unwrap().resolution, Resolution::Loaded);

    let state = coll.card("aneto").unwrap().state();
    assert!(state.error_message().is_none());
    assert_eq!(state.active_band(), Band::Mid);
}

#[tokio::test]
async fn loaded_card_renders_summary_and_capped_table() {
    let (mut coll, mut calls) = gated();
    let snapshots = coll.track(mountain("aneto"));
    calls.recv().await.unwrap().answer(Ok(forecast(-2.5)));
    coll.process_next().await.unwrap();

    let options = RenderOptions {
        updated_at: NaiveTime::from_hms_opt(7, 30, 0),
        ..RenderOptions::default()
    };
    let mut sink = RecordingSink::default();
    render_header(coll.card("aneto").unwrap().mountain(), &mut sink);
    render_snapshot(&snapshots.borrow(), &options, &mut sink);

    let [Shown::Header(header), Shown::Summary(summary), Shown::Table(table)] =
        sink.shown.as_slice()
    else {
        panic!("unexpected render: {:?}", sink.shown);
    };
    assert!(summary.headline.contains("-2.5°C"));
    assert!(summary.headline.contains("10 km/h"));
    assert!(summary.headline.contains("gust 18"));
    assert!(summary.meta.contains("0.2 mm"));
    assert!(summary.meta.contains("Updated 07:30"));
    assert_eq!(header.badges.len(), 3);
    assert_eq!(header.badges[1].label, "Mid: 2600 m");
    assert!(summary.snow_likely);

    assert_eq!(table.rows.len(), 8);
    assert_eq!(table.rows[0].time, "06:00");
    assert_eq!(table.footer, "Showing next 8 of 24 hours");

    let view = coll.advanced_view("aneto").unwrap();
    assert_eq!(view.table.len(), 24);
    assert_eq!(view.charts.labels[18], "00:00");
    peakcast_ui::render_advanced(&view, &mut sink);
    assert_eq!(sink.shown.last(), Some(&Shown::Advanced(24)));
}

#[tokio::test]
async fn loading_state_renders_spinner() {
    let (mut coll, _calls) = gated();
    let snapshots = coll.track(mountain("aneto"));

    let mut sink = RecordingSink::default();
    render_snapshot(&snapshots.borrow(), &RenderOptions::default(), &mut sink);
    assert_eq!(sink.shown, vec![Shown::Loading]);
    assert!(coll.has_pending());
}

#[tokio::test]
async fn cards_complete_independently_in_any_order() {
    let (mut coll, mut calls) = gated();
    coll.track(mountain("aneto"));
    coll.track(mountain("posets"));

    let first = calls.recv().await.unwrap();
    let second = calls.recv().await.unwrap();
    let (aneto, posets) = if first.mountain_id == "aneto" {
        (first, second)
    } else {
        (second, first)
    };

    posets.answer(Err(FetchError::Network("connection reset".to_string())));
    aneto.answer(Ok(forecast(0.5)));

    while coll.has_pending() {
        coll.process_next().await.unwrap();
    }

    assert_eq!(coll.card("aneto").unwrap().state().status().name(), "loaded");
    assert_eq!(coll.card("posets").unwrap().state().status().name(), "failed");
}
