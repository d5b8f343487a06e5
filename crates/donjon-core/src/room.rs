//! Room placement and labeling
//!
//! Rooms live on a half-resolution lattice: lattice cell `(i, j)` is grid
//! cell `(2i+1, 2j+1)`, so carved rooms come out with odd dimensions and a
//! one-cell perimeter ring always fits between neighbors.

use donjon_rng::DungeonRng;

use crate::cell::Cell;
use crate::errors::DungeonError;
use crate::grid::Grid;
use crate::options::{Options, RoomLayout};

/// Hard cap on rooms per level; the room id field holds 10 bits
pub(crate) const MAX_ROOMS: usize = 999;

/// A carved room: 1-based id plus inclusive interior bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Room {
    pub id: u16,
    pub north: usize,
    pub south: usize,
    pub west: usize,
    pub east: usize,
}

impl Room {
    /// Interior height in lattice units
    pub fn lattice_height(&self) -> usize {
        (self.south - self.north) / 2 + 1
    }

    /// Interior width in lattice units
    pub fn lattice_width(&self) -> usize {
        (self.east - self.west) / 2 + 1
    }

    /// Whether the interior covers this grid cell
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.north && row <= self.south && col >= self.west && col <= self.east
    }
}

/// Which room's interior holds this cell, if any
pub(crate) fn room_at(rooms: &[Room], row: usize, col: usize) -> Option<&Room> {
    rooms.iter().find(|room| room.contains(row, col))
}

/// Carve rooms according to the configured room layout
pub(crate) fn emplace_rooms(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
) -> Result<Vec<Room>, DungeonError> {
    match options.room_layout {
        RoomLayout::Packed => pack_rooms(options, grid, rng),
        RoomLayout::Scattered => scatter_rooms(options, grid, rng),
    }
}

/// Dense anchor walk: try a room at every lattice position
fn pack_rooms(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
) -> Result<Vec<Room>, DungeonError> {
    let n_i = grid.rows() / 2;
    let n_j = grid.columns() / 2;
    let mut rooms = Vec::new();

    for i in 0..n_i {
        for j in 0..n_j {
            let (row, col) = lattice_cell(i, j);
            if grid.get(row, col)?.intersects(Cell::ROOM) {
                continue;
            }
            // edge anchors only half the time, which keeps the border ragged
            if (i == 0 || j == 0) && rng.one_in(2) {
                continue;
            }
            emplace_room(options, grid, rng, &mut rooms, Some((i, j)))?;
        }
    }
    Ok(rooms)
}

/// Random anchors, as many attempts as the area affords
fn scatter_rooms(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
) -> Result<Vec<Room>, DungeonError> {
    let area = grid.rows() * grid.columns();
    let attempts = (area / (options.room_max * options.room_max).max(1)).max(1);
    let mut rooms = Vec::new();

    for _ in 0..attempts {
        emplace_room(options, grid, rng, &mut rooms, None)?;
    }
    Ok(rooms)
}

/// Try one room; silently declines when it cannot be placed
fn emplace_room(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
    rooms: &mut Vec<Room>,
    anchor: Option<(usize, usize)>,
) -> Result<(), DungeonError> {
    if rooms.len() >= MAX_ROOMS {
        return Ok(());
    }
    let n_i = grid.rows() / 2;
    let n_j = grid.columns() / 2;
    if n_i == 0 || n_j == 0 {
        return Ok(());
    }

    let (i, j, height, width) = set_room(options, n_i, n_j, rng, anchor);
    if height == 0 || width == 0 {
        return Ok(());
    }

    let north = i * 2 + 1;
    let west = j * 2 + 1;
    let south = (i + height) * 2 - 1;
    let east = (j + width) * 2 - 1;
    // the perimeter ring must fit inside the grid
    if south + 1 >= grid.rows() || east + 1 >= grid.columns() {
        return Ok(());
    }
    if !sound_room(grid, north, west, south, east)? {
        return Ok(());
    }

    for row in north..=south {
        for col in west..=east {
            grid.merge(row, col, Cell::ROOM)?;
        }
    }
    for col in (west - 1)..=(east + 1) {
        ring(grid, north - 1, col)?;
        ring(grid, south + 1, col)?;
    }
    for row in north..=south {
        ring(grid, row, west - 1)?;
        ring(grid, row, east + 1)?;
    }

    rooms.push(Room {
        id: (rooms.len() + 1) as u16,
        north,
        south,
        west,
        east,
    });
    Ok(())
}

/// Size a room in lattice units, shrunk to fit when anchored
fn set_room(
    options: &Options,
    n_i: usize,
    n_j: usize,
    rng: &mut DungeonRng,
    anchor: Option<(usize, usize)>,
) -> (usize, usize, usize, usize) {
    let base = (options.room_min + 1) / 2;
    let radix = options.room_max.saturating_sub(options.room_min) / 2 + 1;

    match anchor {
        Some((i, j)) => {
            let h_radix = radix.min(n_i.saturating_sub(base + i));
            let w_radix = radix.min(n_j.saturating_sub(base + j));
            let height = base + rng.rn2(h_radix as u32) as usize;
            let width = base + rng.rn2(w_radix as u32) as usize;
            (i, j, height, width)
        }
        None => {
            let height = base + rng.rn2(radix as u32) as usize;
            let width = base + rng.rn2(radix as u32) as usize;
            let i = rng.rn2(n_i.saturating_sub(height) as u32) as usize;
            let j = rng.rn2(n_j.saturating_sub(width) as u32) as usize;
            (i, j, height, width)
        }
    }
}

/// A room may only claim ground that is neither blocked nor already a room
fn sound_room(
    grid: &Grid,
    north: usize,
    west: usize,
    south: usize,
    east: usize,
) -> Result<bool, DungeonError> {
    for row in north..=south {
        for col in west..=east {
            if grid.get(row, col)?.intersects(Cell::BLOCK_ROOM) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Mark one ring cell, unless a neighboring room already opened it
fn ring(grid: &mut Grid, row: usize, col: usize) -> Result<(), DungeonError> {
    if !grid.get(row, col)?.intersects(Cell::ROOM | Cell::ENTRANCE) {
        grid.merge(row, col, Cell::PERIMETER)?;
    }
    Ok(())
}

/// Write each room's id into the room id field of its interior cells
pub(crate) fn label_rooms(grid: &mut Grid, rooms: &[Room]) -> Result<(), DungeonError> {
    for room in rooms {
        for row in room.north..=room.south {
            for col in room.west..=room.east {
                let cell = grid.get(row, col)?;
                grid.update(row, col, cell.with_room_id(room.id))?;
            }
        }
    }
    Ok(())
}

pub(crate) fn lattice_cell(i: usize, j: usize) -> (usize, usize) {
    (i * 2 + 1, j * 2 + 1)
}
