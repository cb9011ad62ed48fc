//! FILENAME: core/drill-engine/src/view.rs
//! Renderable output - what a presentation adapter displays.
//!
//! The controller never touches a display surface. It emits the
//! serializable instructions below; the adapter is the only layer that
//! turns them into a screen.

use serde::{Deserialize, Serialize};

use crate::aggregate::{max_cost, Group};
use crate::fields::{Field, Record};
use crate::hierarchy::Level;
use crate::parse::{format_currency, parse_currency};

/// Stable identifier for one rendered block. Monotonic per controller.
pub type BlockId = u64;

// ============================================================================
// PERFORMANCE BANDS
// ============================================================================

/// Three-tier color band for a performance bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfBand {
    High,
    Mid,
    Low,
}

impl PerfBand {
    /// >= 70% high, >= 40% mid, else low.
    pub fn from_pct(pct: u8) -> Self {
        if pct >= 70 {
            PerfBand::High
        } else if pct >= 40 {
            PerfBand::Mid
        } else {
            PerfBand::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerfBand::High => "high",
            PerfBand::Mid => "mid",
            PerfBand::Low => "low",
        }
    }
}

// ============================================================================
// TABLE VIEWS
// ============================================================================

/// One aggregated group, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    pub count: usize,
    pub device_count: usize,
    /// Distinct "Days" values seen in the group.
    pub day_count: usize,
    pub total_cost: f64,
    /// Bar fill, 0..=100, scaled against the level's max cost.
    pub pct: u8,
    pub band: PerfBand,
}

/// One aggregation block: a titled table of groups with bar metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub block_id: BlockId,
    pub level: Level,
    pub title: String,
    /// The column the block was grouped on, as displayed in the header.
    pub dimension_label: String,
    pub group_count: usize,
    pub total_cost: f64,
    pub max_cost: f64,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Builds the renderable table for one aggregated level.
    pub fn from_groups(
        block_id: BlockId,
        level: Level,
        title: String,
        dimension_label: String,
        groups: &[Group],
    ) -> Self {
        let max = max_cost(groups);
        let rows: Vec<TableRow> = groups
            .iter()
            .map(|group| {
                let pct = ((group.total_cost / max) * 100.0)
                    .round()
                    .clamp(0.0, 100.0) as u8;
                TableRow {
                    key: group.key.clone(),
                    count: group.count,
                    device_count: group.device_count,
                    day_count: group.day_set.len(),
                    total_cost: group.total_cost,
                    pct,
                    band: PerfBand::from_pct(pct),
                }
            })
            .collect();

        TableView {
            block_id,
            level,
            title,
            dimension_label,
            group_count: groups.len(),
            total_cost: groups.iter().map(|g| g.total_cost).sum(),
            max_cost: max,
            rows,
        }
    }
}

// ============================================================================
// RAW DETAIL VIEWS
// ============================================================================

/// One raw trade-in row at the terminal level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub processed_date: String,
    pub market: String,
    pub dm_name: String,
    pub device_type: String,
    /// Pre-formatted cost ("$1,234.5").
    pub cost: String,
}

impl DetailRow {
    pub fn from_record(record: &Record) -> Self {
        DetailRow {
            processed_date: Field::ProcessedDate.resolve(record).to_string(),
            market: Field::Market.resolve(record).to_string(),
            dm_name: Field::DmName.resolve(record).to_string(),
            device_type: Field::DeviceType.resolve(record).to_string(),
            cost: format_currency(parse_currency(Field::Cost.resolve(record))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub block_id: BlockId,
    pub title: String,
    pub row_count: usize,
    pub rows: Vec<DetailRow>,
}

// ============================================================================
// SUMMARY CARDS
// ============================================================================

/// Totals over the filtered record set, shown above the drill views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub row_count: usize,
    pub device_count: usize,
    pub total_cost: f64,
}

// ============================================================================
// INSTRUCTIONS
// ============================================================================

/// What the presentation adapter should do after a drill action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RenderInstruction {
    /// Replace the whole page with this step view.
    Replace { view: TableView },
    /// Append a nested aggregation block under `parent`. When `replaces`
    /// is set, the adapter detaches that block (and anything stacked
    /// after it) first.
    Append {
        parent: BlockId,
        replaces: Option<BlockId>,
        view: TableView,
    },
    /// Append raw member rows under `parent`.
    AppendRaw {
        parent: BlockId,
        replaces: Option<BlockId>,
        view: DetailView,
    },
    /// Duplicate request - nothing to draw.
    Ignored,
}

/// What the adapter should do after `back()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BackInstruction {
    /// Detach exactly this block; ancestors stay untouched.
    RemoveBlock { block_id: BlockId },
    /// Replace the page with this rebuilt step view.
    Rebuild { view: TableView },
    /// History exhausted - the page was fully refreshed from the dataset.
    Refresh { view: TableView },
}
