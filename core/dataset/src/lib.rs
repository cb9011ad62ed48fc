//! FILENAME: core/dataset/src/lib.rs
//! TradeScope Dataset Source
//!
//! Retrieval and serialization glue around the drill engine: fetch or
//! read a CSV, hand back `Record`s, and export a filtered set. The engine
//! never knows where its data came from; a failed load degrades to an
//! empty dataset at the caller, never a crash.

mod csv_source;
mod error;
mod export;

pub use csv_source::{fetch_csv, parse_csv, read_csv_file};
pub use error::SourceError;
pub use export::{export_csv, export_csv_file};
