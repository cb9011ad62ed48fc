//! FILENAME: core/drill-engine/src/lib.rs
//! TradeScope Drilldown Engine
//!
//! Headless core for the trade-in drilldown dashboard. It turns raw CSV
//! records into aggregated hierarchy levels (Region -> Market -> DM ->
//! Type -> raw rows) and drives navigation over them with no display
//! dependency: the controller emits serializable render instructions and
//! a presentation adapter draws them.
//!
//! Layers:
//! - `fields`: alias-tolerant column resolution (what a record MEANS)
//! - `parse`: currency / date / device parsing (total, never fails)
//! - `aggregate`: grouping one dimension into ordered totals
//! - `hierarchy`: the fixed drill order and next-dimension policy
//! - `filter`: inclusive date-range row filtering
//! - `nav`: the back-navigation frame stack
//! - `view`: renderable output (the presentation adapter contract)
//! - `controller`: the state machine tying it all together

pub mod aggregate;
pub mod controller;
pub mod error;
pub mod fields;
pub mod filter;
pub mod hierarchy;
pub mod nav;
pub mod parse;
pub mod view;

pub use aggregate::{aggregate, aggregate_rows, max_cost, Group, RowId, UNKNOWN_KEY};
pub use controller::DrilldownController;
pub use error::DrillError;
pub use fields::{resolve_field, Field, Record};
pub use filter::{date_bounds, DateFilter};
pub use hierarchy::{detect_key, next_dimension, Level, RenderMode};
pub use nav::{Frame, NavStack};
pub use parse::{count_device, format_currency, parse_currency, parse_date_dmy};
pub use view::{
    BackInstruction, BlockId, DetailRow, DetailView, PerfBand, RenderInstruction, Summary,
    TableRow, TableView,
};
