//! FILENAME: core/drill-engine/src/fields.rs
//! Field resolution - alias-tolerant access to loosely-typed CSV columns.
//!
//! Source exports disagree on column spelling ("COST" vs "Cost", "Market"
//! vs "Market Name"). Every semantic read goes through the one alias table
//! below so aggregation never breaks on capitalization drift.

use serde::{Deserialize, Serialize};

// ============================================================================
// RECORD
// ============================================================================

/// One row of the source CSV: ordered (column, value) pairs.
///
/// Column order is preserved from the source header row; CSV export relies
/// on it. Values are kept verbatim - trimming and parsing happen at read
/// time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    columns: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            columns: Vec::new(),
        }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Record { columns: pairs }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Exact-key lookup.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Whether any column matches `name` case-insensitively.
    pub fn has_column_ci(&self, name: &str) -> bool {
        self.columns
            .iter()
            .any(|(col, _)| col.eq_ignore_ascii_case(name))
    }

    /// Column names in source order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// LOGICAL FIELDS
// ============================================================================

/// Every semantic field the dashboard reads, with its accepted spellings.
/// This is the single alias configuration table; nothing else hard-codes
/// column names except the hierarchy's dimension candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Cost,
    ProcessedDate,
    Region,
    Market,
    DmName,
    DeviceType,
    Days,
    Imei,
    ShippingStatus,
}

impl Field {
    /// Accepted column spellings, most likely first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Cost => &["COST", "Cost", "cost"],
            Field::ProcessedDate => &["Processed Date", "ProcessedDate", "Processed_Date"],
            Field::Region => &["Regions", "Region", "regions", "REGIONS"],
            Field::Market => &["Market", "Market Name"],
            Field::DmName => &["DM NAME", "DM Name"],
            Field::DeviceType => &["Type", "TYPE"],
            Field::Days => &["Days", "DAYS", "days"],
            Field::Imei => &["IMEI", "Imei", "imei", "IMEI #"],
            Field::ShippingStatus => &["Shipping Status", "ShippingStatus", "Shipping_Status"],
        }
    }

    pub fn resolve(self, record: &Record) -> &str {
        resolve_field(record, self.aliases())
    }
}

/// Resolves a logical field against a record.
///
/// For each alias in order: an exact key with a non-empty value wins, then
/// the first case-insensitive key with a non-empty value. Returns the empty
/// string when no alias matches. Pure and deterministic.
pub fn resolve_field<'a>(record: &'a Record, aliases: &[&str]) -> &'a str {
    for alias in aliases {
        if let Some(value) = record.get(alias) {
            if !value.is_empty() {
                return value;
            }
        }
        for (column, value) in record.pairs() {
            if column.eq_ignore_ascii_case(alias) && !value.is_empty() {
                return value;
            }
        }
    }
    ""
}
