//! Error types for grid access and dungeon generation

use thiserror::Error;

use crate::options::DungeonLayout;

/// Errors surfaced by grid operations and the generation pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DungeonError {
    /// The coordinate pair does not address a cell of this grid
    #[error("cell ({row}, {col}) is out of range for a {rows}x{columns} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    /// Entities can only be placed in open space
    #[error("entities can only be placed in open space, and ({row}, {col}) is not open")]
    InvalidPlacement { row: usize, col: usize },

    /// The selected layout has no carving algorithm
    #[error("dungeon layout {0} is not implemented")]
    UnsupportedLayout(DungeonLayout),
}
