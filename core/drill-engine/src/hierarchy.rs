//! FILENAME: core/drill-engine/src/hierarchy.rs
//! Hierarchy policy - the fixed Region -> Market -> DM -> Type -> raw
//! drill order, and the rule for picking the next grouping column.

use serde::{Deserialize, Serialize};

use crate::aggregate::RowId;
use crate::fields::Record;

// ============================================================================
// LEVELS
// ============================================================================

/// One level of the drill hierarchy. `Raw` is terminal: it shows member
/// rows rather than another aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Region,
    Market,
    Dm,
    Type,
    Raw,
}

/// How a view at a level is attached to the page: a full replace or an
/// appended block under its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Step,
    Stacked,
}

impl Level {
    /// Fixed drill order, shallow to deep.
    pub const ORDER: [Level; 5] = [
        Level::Region,
        Level::Market,
        Level::Dm,
        Level::Type,
        Level::Raw,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Level::Region => "Region Summary",
            Level::Market => "Markets",
            Level::Dm => "DMs",
            Level::Type => "Types",
            Level::Raw => "Detailed",
        }
    }

    pub fn render_mode(self) -> RenderMode {
        match self {
            Level::Region | Level::Market => RenderMode::Step,
            Level::Dm | Level::Type | Level::Raw => RenderMode::Stacked,
        }
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::Region => Some(Level::Market),
            Level::Market => Some(Level::Dm),
            Level::Dm => Some(Level::Type),
            Level::Type => Some(Level::Raw),
            Level::Raw => None,
        }
    }

    /// Position within [`Level::ORDER`].
    pub fn depth(self) -> usize {
        match self {
            Level::Region => 0,
            Level::Market => 1,
            Level::Dm => 2,
            Level::Type => 3,
            Level::Raw => 4,
        }
    }

    /// Canonical grouping column for this level, plus alternate spellings
    /// seen in the wild. Region is only consulted through `detect_key` at
    /// load time; Raw has no dimension.
    fn dimension_candidates(self) -> &'static [&'static str] {
        match self {
            Level::Region => &["Regions", "Region"],
            Level::Market => &["Market", "Market Name"],
            Level::Dm => &["DM NAME", "DM Name"],
            Level::Type => &["Type"],
            Level::Raw => &[],
        }
    }
}

// ============================================================================
// NEXT-DIMENSION POLICY
// ============================================================================

/// Picks the grouping column for the level after `level`, probing the
/// given rows for the canonical spelling and falling back to known
/// alternates. `None` means drilling stops here and the next view is raw
/// member rows - never an error.
pub fn next_dimension(level: Level, dataset: &[Record], rows: &[RowId]) -> Option<String> {
    let next = level.next()?;
    for candidate in next.dimension_candidates() {
        let present = rows
            .iter()
            .filter_map(|&row| dataset.get(row))
            .any(|record| record.has_column_ci(candidate));
        if present {
            return Some((*candidate).to_string());
        }
    }
    None
}

/// Probes the whole dataset once for the first candidate column present
/// (case-insensitively). An empty dataset returns the first candidate
/// unconditionally.
pub fn detect_key(dataset: &[Record], candidates: &[&str]) -> String {
    let first = candidates.first().copied().unwrap_or_default();
    if dataset.is_empty() {
        return first.to_string();
    }
    for candidate in candidates {
        if dataset.iter().any(|record| record.has_column_ci(candidate)) {
            return (*candidate).to_string();
        }
    }
    first.to_string()
}
