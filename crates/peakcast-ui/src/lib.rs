//! Mountain cards for Peakcast.
//!
//! Per-card state machine and controller, the display sink contract, the
//! advanced detail view, and the collection that drives one card per
//! tracked mountain.

pub mod card_state;
pub mod collection;
pub mod controller;
pub mod detail;
pub mod display;
pub mod services;

pub use card_state::{CardState, CardStatus, RequestToken, Resolution};
pub use collection::{CollectionError, Completion, MountainCollection};
pub use controller::{CardSnapshot, FetchRequest, MountainCardController};
pub use detail::{AdvancedView, ChartSeries, DetailError, DetailRow, PrecipBar, StatCard, StatsBlock};
pub use display::{
    render_advanced, render_header, render_snapshot, CardHeader, DisplaySink, ElevationBadge,
    RenderOptions, RetryAction, SummaryRow, SummaryTable, SummaryView,
};
