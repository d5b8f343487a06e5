//! Room openings: sills, door types, and room-pair bookkeeping
//!
//! A sill is a perimeter ring cell that can be punched through: the cell two
//! steps out from the room edge must exist and be clear, because that is
//! where the corridor walk will pass. Opened sills lose their wall flag and
//! become entrance cells carrying one door variant.

use std::collections::HashSet;

use donjon_rng::DungeonRng;

use crate::cell::Cell;
use crate::errors::DungeonError;
use crate::grid::Grid;
use crate::room::{Room, room_at};

/// An opened sill and the cell just beyond it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Door {
    pub row: usize,
    pub col: usize,
    pub out_row: usize,
    pub out_col: usize,
}

#[derive(Debug, Clone, Copy)]
struct Sill {
    row: usize,
    col: usize,
    out_row: usize,
    out_col: usize,
    /// Set when the outside cell belongs to another room
    out_id: Option<u16>,
}

/// Punch openings into every room's perimeter
pub(crate) fn open_rooms(
    grid: &mut Grid,
    rooms: &[Room],
    rng: &mut DungeonRng,
) -> Result<Vec<Door>, DungeonError> {
    let mut doors = Vec::new();
    let mut connected: HashSet<(u16, u16)> = HashSet::new();
    for room in rooms {
        open_room(grid, rooms, room, rng, &mut connected, &mut doors)?;
    }
    Ok(doors)
}

fn open_room(
    grid: &mut Grid,
    rooms: &[Room],
    room: &Room,
    rng: &mut DungeonRng,
    connected: &mut HashSet<(u16, u16)>,
    doors: &mut Vec<Door>,
) -> Result<(), DungeonError> {
    let mut sills = door_sills(grid, rooms, room)?;
    if sills.is_empty() {
        return Ok(());
    }

    // opening count scales with the room's footprint
    let t = (room.lattice_width() * room.lattice_height()).isqrt();
    let wanted = t + rng.rn2(t as u32) as usize;

    rng.shuffle(&mut sills);
    let mut opened = 0;
    for sill in sills {
        if opened >= wanted {
            break;
        }
        let cell = grid.get(sill.row, sill.col)?;
        if cell.is_door_space() {
            continue;
        }
        if let Some(out_id) = sill.out_id {
            // one door per room pair; the shared sill serves both rooms
            let key = (room.id.min(out_id), room.id.max(out_id));
            if !connected.insert(key) {
                continue;
            }
        }

        let through = (cell & !Cell::PERIMETER) | Cell::ENTRANCE | door_type(rng);
        grid.update(sill.row, sill.col, through)?;
        doors.push(Door {
            row: sill.row,
            col: sill.col,
            out_row: sill.out_row,
            out_col: sill.out_col,
        });
        opened += 1;
    }
    Ok(())
}

/// Candidate sills on all four walls, at lattice-aligned positions
fn door_sills(grid: &Grid, rooms: &[Room], room: &Room) -> Result<Vec<Sill>, DungeonError> {
    let mut sills = Vec::new();
    let max_row = match grid.rows() / 2 {
        0 => return Ok(sills),
        n_i => n_i * 2 - 1,
    };
    let max_col = match grid.columns() / 2 {
        0 => return Ok(sills),
        n_j => n_j * 2 - 1,
    };

    if room.north >= 3 {
        for col in (room.west..=room.east).step_by(2) {
            check_sill(grid, rooms, room.north - 1, col, room.north - 2, col, &mut sills)?;
        }
    }
    if room.south + 2 <= max_row {
        for col in (room.west..=room.east).step_by(2) {
            check_sill(grid, rooms, room.south + 1, col, room.south + 2, col, &mut sills)?;
        }
    }
    if room.west >= 3 {
        for row in (room.north..=room.south).step_by(2) {
            check_sill(grid, rooms, row, room.west - 1, row, room.west - 2, &mut sills)?;
        }
    }
    if room.east + 2 <= max_col {
        for row in (room.north..=room.south).step_by(2) {
            check_sill(grid, rooms, row, room.east + 1, row, room.east + 2, &mut sills)?;
        }
    }
    Ok(sills)
}

fn check_sill(
    grid: &Grid,
    rooms: &[Room],
    sill_row: usize,
    sill_col: usize,
    out_row: usize,
    out_col: usize,
    sills: &mut Vec<Sill>,
) -> Result<(), DungeonError> {
    let sill = grid.get(sill_row, sill_col)?;
    if !sill.intersects(Cell::PERIMETER) || sill.intersects(Cell::BLOCK_DOOR) {
        return Ok(());
    }
    let out = grid.get(out_row, out_col)?;
    if out.intersects(Cell::BLOCKED) {
        return Ok(());
    }
    let out_id = if out.intersects(Cell::ROOM) {
        room_at(rooms, out_row, out_col).map(|r| r.id)
    } else {
        None
    };
    sills.push(Sill {
        row: sill_row,
        col: sill_col,
        out_row,
        out_col,
        out_id,
    });
    Ok(())
}

/// Roll a door variant: mostly plain doors, arches next, portcullises rare
fn door_type(rng: &mut DungeonRng) -> Cell {
    match rng.rn2(110) {
        0..=14 => Cell::ARCH,
        15..=59 => Cell::DOOR,
        60..=74 => Cell::LOCKED,
        75..=89 => Cell::TRAPPED,
        90..=99 => Cell::SECRET,
        _ => Cell::PORTCULLIS,
    }
}
