//! Dungeon grid storage and entity placement

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::errors::DungeonError;

/// Opaque id of a placed entity, resolved against external catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// One placed entity: position, id, and the entity flag it set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPlacement {
    pub row: usize,
    pub col: usize,
    pub id: EntityId,
    /// The flag ORed into the cell, [`Cell::MONSTER`] or [`Cell::ITEM`]
    pub kind: Cell,
}

/// Rectangular grid of cell flags plus the ordered entity list
///
/// Cells are addressed as `row * rows + col`: the stride is the row count.
/// On square grids every cell is addressable exactly once. On non-square
/// grids some in-range coordinate pairs fall past the buffer (rejected as
/// out of range, tall grids) or share an index (wide grids); that addressing
/// is part of the contract and is not corrected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    placements: Vec<EntityPlacement>,
}

impl Grid {
    /// Create a grid of `rows * columns` cells, all [`Cell::NOTHING`]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::NOTHING; rows * columns],
            placements: Vec::new(),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, DungeonError> {
        if row < self.rows && col < self.columns {
            let idx = row * self.rows + col;
            if idx < self.cells.len() {
                return Ok(idx);
            }
        }
        Err(DungeonError::OutOfRange {
            row,
            col,
            rows: self.rows,
            columns: self.columns,
        })
    }

    /// Read one cell
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, DungeonError> {
        Ok(self.cells[self.index(row, col)?])
    }

    /// Overwrite one cell with a new flag union
    pub fn update(&mut self, row: usize, col: usize, value: Cell) -> Result<(), DungeonError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// OR flags into a cell, keeping what is already there
    pub(crate) fn merge(&mut self, row: usize, col: usize, flags: Cell) -> Result<(), DungeonError> {
        let idx = self.index(row, col)?;
        self.cells[idx] |= flags;
        Ok(())
    }

    /// Remove flags from a cell, keeping the rest
    pub(crate) fn clear_flags(
        &mut self,
        row: usize,
        col: usize,
        flags: Cell,
    ) -> Result<(), DungeonError> {
        let idx = self.index(row, col)?;
        self.cells[idx] &= !flags;
        Ok(())
    }

    /// Place an entity: record the placement and set its flag on the cell
    ///
    /// Fails with [`DungeonError::InvalidPlacement`] unless the target cell
    /// is open space; a failed call leaves both the cell and the placement
    /// list untouched.
    pub fn place_entity(
        &mut self,
        row: usize,
        col: usize,
        id: EntityId,
        kind: Cell,
    ) -> Result<(), DungeonError> {
        let idx = self.index(row, col)?;
        if !self.cells[idx].is_open_space() {
            return Err(DungeonError::InvalidPlacement { row, col });
        }
        self.placements.push(EntityPlacement { row, col, id, kind });
        self.cells[idx] |= kind;
        Ok(())
    }

    /// All placements in insertion order
    pub fn entity_placements(&self) -> &[EntityPlacement] {
        &self.placements
    }
}
