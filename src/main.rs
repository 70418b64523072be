use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use peakcast_ui::{
    render_advanced, render_header, render_snapshot, CardHeader, ChartSeries, DetailRow,
    DisplaySink, MountainCollection, RenderOptions, RetryAction, StatsBlock, SummaryTable,
    SummaryView,
};
use peakcast_weather::{Band, HttpWeatherClient};
use tokio::runtime::Handle;

/// `aneto` or `aneto:summit`; the band defaults to base.
fn parse_target(arg: &str) -> Result<(String, Band)> {
    match arg.split_once(':') {
        Some((id, band)) if !id.is_empty() => {
            let band = band
                .parse::<Band>()
                .map_err(|e| anyhow::anyhow!("{} in {:?}", e, arg))?;
            Ok((id.to_string(), band))
        }
        Some(_) => anyhow::bail!("missing mountain id in {:?}", arg),
        None => Ok((arg.to_string(), Band::Base)),
    }
}

fn target_arg(mountain_id: &str, band: Band) -> String {
    match band {
        Band::Base => mountain_id.to_string(),
        other => format!("{}:{}", mountain_id, other),
    }
}

/// Plain-text renderer for one card.
struct ConsoleSink;

impl DisplaySink for ConsoleSink {
    fn show_header(&mut self, header: &CardHeader) {
        if header.subtitle.is_empty() {
            println!("{}", header.title);
        } else {
            println!("{} ({})", header.title, header.subtitle);
        }
        let badges: Vec<String> = header
            .badges
            .iter()
            .map(|b| format!("{} {}", b.icon, b.label))
            .collect();
        println!("  {}", badges.join("  "));
    }

    fn show_loading(&mut self) {
        println!("  Loading weather data...");
    }

    fn show_summary(&mut self, summary: &SummaryView) {
        println!("  {}", summary.headline);
        println!("  {}", summary.meta);
    }

    fn show_table(&mut self, table: &SummaryTable) {
        println!("  {:<6} {:<12} {:<10} {:<10} {}", "Time", "Temp", "Wind", "Gust", "Precip");
        for row in &table.rows {
            println!(
                "  {:<6} {:<12} {:<10} {:<10} {}",
                row.time, row.temp, row.wind, row.gust, row.precip
            );
        }
        println!("  {}", table.footer);
    }

    fn show_empty(&mut self) {
        println!("  No weather data available");
    }

    fn show_error(&mut self, message: &str, retry: RetryAction) {
        println!("  {}", message);
        println!("  Retry: peakcast {}", target_arg(&retry.mountain_id, retry.band));
    }

    fn show_advanced(&mut self, stats: &StatsBlock, _charts: &ChartSeries, table: &[DetailRow]) {
        println!("  {}", stats.title);
        println!("  {}", stats.subtitle);
        for card in &stats.cards {
            println!("    {}: {}", card.label, card.value);
        }
        println!("  {} hourly rows", table.len());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    peakcast_core::init()?;

    let mut app = peakcast_core::App::new()?;
    let config = app.shared_config();

    let client = HttpWeatherClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )
    .context("Failed to build weather client")?;

    // `id[:band]` targets on the command line, otherwise the user's tracked list on base
    let mut targets = std::env::args()
        .skip(1)
        .map(|arg| parse_target(&arg))
        .collect::<Result<Vec<_>>>()?;
    if targets.is_empty() {
        targets = client
            .list_my_mountains()
            .await
            .context("Failed to list tracked mountains")?
            .into_iter()
            .map(|id| (id, Band::Base))
            .collect();
    }

    let mut collection = MountainCollection::new(Arc::new(client.clone()), Handle::current());
    for (id, band) in &targets {
        match client.fetch_mountain(id).await {
            Ok(mountain) => {
                collection.track(mountain);
                if *band != Band::Base {
                    collection.select_band(id, *band)?;
                }
            }
            Err(e) => tracing::warn!("Skipping mountain {}: {}", id, e),
        }
    }

    if collection.is_empty() {
        println!("No mountains to show.");
        return app.shutdown();
    }

    while collection.has_pending() {
        if collection.process_next().await.is_none() {
            break;
        }
    }

    let options = RenderOptions::from(&config.cards);
    let mut sink = ConsoleSink;
    for id in collection.ids() {
        let Some(card) = collection.card(id) else {
            continue;
        };
        render_header(card.mountain(), &mut sink);
        render_snapshot(&card.snapshot(), &options, &mut sink);
        if let Ok(view) = card.advanced_view() {
            render_advanced(&view, &mut sink);
        }
        println!();
    }

    app.shutdown()
}
