//! FILENAME: app/src/session.rs
//! Session state: owns the controller and the screen, maps user
//! commands onto engine calls, and handles dataset loading.

use chrono::NaiveDate;
use log::{info, warn};

use drill_engine::{date_bounds, DateFilter, DrillError, DrilldownController, Record};

use crate::render::{render_summary, Screen};

/// Loads a dataset from a URL or local path. Failures degrade to an
/// empty dataset with a warning so the session stays usable.
async fn load_records(location: &str) -> Vec<Record> {
    let loaded = if location.starts_with("http://") || location.starts_with("https://") {
        dataset::fetch_csv(location).await
    } else {
        dataset::read_csv_file(location)
    };
    match loaded {
        Ok(records) => {
            info!("loaded {} records from {}", records.len(), location);
            records
        }
        Err(err) => {
            warn!("failed to load {}: {}", location, err);
            println!("warning: could not load {} ({}); starting empty", location, err);
            Vec::new()
        }
    }
}

pub struct Session {
    controller: DrilldownController,
    screen: Screen,
    // Monotonic load token; a reload that finishes after a newer one
    // started must not clobber the newer dataset.
    load_seq: u64,
}

impl Session {
    pub async fn start(location: Option<&str>) -> Session {
        let records = match location {
            Some(loc) => load_records(loc).await,
            None => Vec::new(),
        };
        let mut session = Session {
            controller: DrilldownController::new(records),
            screen: Screen::new(),
            load_seq: 0,
        };
        let instruction = session.controller.refresh();
        session.screen.apply(instruction);
        session
    }

    /// Replaces the dataset from a new location. The view resets to the
    /// root level with filters cleared.
    pub async fn load(&mut self, location: &str) {
        self.load_seq += 1;
        let token = self.load_seq;
        let records = load_records(location).await;
        if token != self.load_seq {
            info!("discarding stale load of {}", location);
            return;
        }
        let instruction = self.controller.replace_dataset(records);
        self.screen.apply(instruction);
    }

    /// Opens row `n` (1-based) of the deepest visible block.
    pub fn open(&mut self, row: usize) {
        let Some((block_id, key)) = self.screen.row_at(row) else {
            println!("no such row; the deepest view has no row {}", row);
            return;
        };
        match self.controller.select(block_id, &key) {
            Ok(instruction) => self.screen.apply(instruction),
            Err(DrillError::RawBlock(_)) => {
                println!("detail rows cannot be expanded further");
            }
            Err(err) => {
                warn!("select failed: {}", err);
                println!("cannot open that row: {}", err);
            }
        }
    }

    pub fn back(&mut self) {
        let instruction = self.controller.back();
        self.screen.apply_back(instruction);
    }

    /// Sets the processed-date window. Either bound may be "-" for open.
    pub fn filter(&mut self, from: &str, to: &str) {
        let from = match parse_bound(from) {
            Ok(bound) => bound,
            Err(raw) => {
                println!("bad date {:?}; use YYYY-MM-DD or -", raw);
                return;
            }
        };
        let to = match parse_bound(to) {
            Ok(bound) => bound,
            Err(raw) => {
                println!("bad date {:?}; use YYYY-MM-DD or -", raw);
                return;
            }
        };
        let instruction = self.controller.set_filter(DateFilter::new(from, to));
        self.screen.apply(instruction);
    }

    pub fn reset_filter(&mut self) {
        let instruction = self.controller.reset_filter();
        self.screen.apply(instruction);
    }

    pub fn print_summary(&self) {
        print!("{}", render_summary(&self.controller.summary()));
        if let Some((earliest, latest)) = date_bounds(self.controller.dataset()) {
            println!("Date range in data: {} to {}", earliest, latest);
        }
        let filter = self.controller.filter();
        if !filter.is_empty() {
            println!(
                "Active filter: {} to {}",
                bound_text(filter.from),
                bound_text(filter.to)
            );
        }
    }

    /// Exports the filtered record set as CSV.
    pub fn export(&self, path: &str) {
        let records = self.controller.filtered_records();
        match dataset::export_csv_file(&records, path) {
            Ok(()) => println!("exported {} rows to {}", records.len(), path),
            Err(err) => {
                warn!("export to {} failed: {}", path, err);
                println!("export failed: {}", err);
            }
        }
    }

    /// Reprints every visible block.
    pub fn redraw(&self) {
        self.screen.print_all();
    }
}

fn parse_bound(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| raw.to_string())
}

fn bound_text(bound: Option<NaiveDate>) -> String {
    match bound {
        Some(date) => date.to_string(),
        None => "open".to_string(),
    }
}
