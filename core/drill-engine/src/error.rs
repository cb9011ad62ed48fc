//! FILENAME: core/drill-engine/src/error.rs

use thiserror::Error;

use crate::view::BlockId;

/// The only fallible surface of the core: a drill request referencing
/// state that does not exist. Everything else degrades in place.
#[derive(Error, Debug)]
pub enum DrillError {
    #[error("no rendered block with id {0}")]
    UnknownBlock(BlockId),

    #[error("block {block} has no group keyed '{key}'")]
    UnknownGroup { block: BlockId, key: String },

    #[error("block {0} shows raw rows and cannot be drilled further")]
    RawBlock(BlockId),
}
