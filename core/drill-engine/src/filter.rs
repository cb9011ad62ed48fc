//! FILENAME: core/drill-engine/src/filter.rs
//! Inclusive date-range filtering over the process date.

use chrono::NaiveDate;

use crate::aggregate::RowId;
use crate::fields::{Field, Record};
use crate::parse::parse_date_dmy;

/// Optional date bounds. `from` is an inclusive start; `to` is inclusive
/// through the end of that day (date-level comparison). Both absent means
/// no filtering at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateFilter { from, to }
    }

    pub fn is_empty(self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Row ids passing the filter, in source order. With no bounds this is
    /// the identity; once any bound is set, rows without a parseable
    /// process date are excluded.
    pub fn apply(self, dataset: &[Record]) -> Vec<RowId> {
        if self.is_empty() {
            return (0..dataset.len()).collect();
        }
        dataset
            .iter()
            .enumerate()
            .filter_map(|(row, record)| {
                let date = parse_date_dmy(Field::ProcessedDate.resolve(record))?;
                if let Some(from) = self.from {
                    if date < from {
                        return None;
                    }
                }
                if let Some(to) = self.to {
                    if date > to {
                        return None;
                    }
                }
                Some(row)
            })
            .collect()
    }
}

/// Earliest and latest process dates in the dataset; seeds the filter
/// inputs. `None` when no row has a parseable date.
pub fn date_bounds(dataset: &[Record]) -> Option<(NaiveDate, NaiveDate)> {
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for record in dataset {
        if let Some(date) = parse_date_dmy(Field::ProcessedDate.resolve(record)) {
            bounds = Some(match bounds {
                None => (date, date),
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
            });
        }
    }
    bounds
}
