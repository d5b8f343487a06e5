//! Level generation pipeline
//!
//! A level is built in fixed stages: mask the ground for the layout, place
//! and open rooms, label them, flood the rest with corridor, drop stairs,
//! populate, then clean up. Every stage draws from the same seeded stream,
//! so a seed plus options names one level exactly.

use donjon_rng::DungeonRng;

use crate::cell::Cell;
use crate::corridor;
use crate::door;
use crate::entity;
use crate::errors::DungeonError;
use crate::grid::Grid;
use crate::options::{DungeonLayout, Options};
use crate::room;

/// Generate a complete level from `options`
///
/// The same options always produce the same grid, placements included.
pub fn create_dungeon(options: &Options) -> Result<Grid, DungeonError> {
    let mut grid = Grid::new(options.rows, options.columns);
    let mut rng = DungeonRng::new(options.seed);

    initialize_cells(options, &mut grid)?;
    let rooms = room::emplace_rooms(options, &mut grid, &mut rng)?;
    let doors = door::open_rooms(&mut grid, &rooms, &mut rng)?;
    room::label_rooms(&mut grid, &rooms)?;
    corridor::emplace_corridors(options, &mut grid, &mut rng)?;
    emplace_stairs(options, &mut grid, &mut rng)?;
    entity::emplace_monsters(options, &mut grid);
    entity::emplace_items(options, &mut grid);
    corridor::clear_dungeon(options, &mut grid, &doors, &mut rng)?;

    Ok(grid)
}

/// Mask off ground the layout keeps out of play
fn initialize_cells(options: &Options, grid: &mut Grid) -> Result<(), DungeonError> {
    match options.dungeon_layout {
        DungeonLayout::Box => Ok(()),
        DungeonLayout::Round => round_mask(grid),
        DungeonLayout::Cross => Err(DungeonError::UnsupportedLayout(DungeonLayout::Cross)),
    }
}

/// Block everything outside the inscribed circle
fn round_mask(grid: &mut Grid) -> Result<(), DungeonError> {
    let center_row = (grid.rows() / 2) as i64;
    let center_col = (grid.columns() / 2) as i64;
    let radius = center_col;

    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            let dr = row as i64 - center_row;
            let dc = col as i64 - center_col;
            if dr * dr + dc * dc > radius * radius {
                grid.merge(row, col, Cell::BLOCKED)?;
            }
        }
    }
    Ok(())
}

/// Drop stairs on corridor dead ends
///
/// The first stair leads down, the second up, and any extras flip a coin.
/// When the maze offers fewer dead ends than asked for, the short count
/// stands.
fn emplace_stairs(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
) -> Result<(), DungeonError> {
    if options.add_stairs == 0 {
        return Ok(());
    }
    let mut ends = stair_ends(grid)?;
    rng.shuffle(&mut ends);

    for k in 0..options.add_stairs {
        let Some((row, col)) = ends.pop() else {
            break;
        };
        let flag = match k {
            0 => Cell::STAIR_DOWN,
            1 => Cell::STAIR_UP,
            _ => {
                if rng.rn2(2) == 0 {
                    Cell::STAIR_DOWN
                } else {
                    Cell::STAIR_UP
                }
            }
        };
        grid.merge(row, col, flag)?;
    }
    Ok(())
}

/// Corridor lattice cells with a single open neighbor
fn stair_ends(grid: &Grid) -> Result<Vec<(usize, usize)>, DungeonError> {
    let mut ends = Vec::new();
    for i in 0..grid.rows() / 2 {
        for j in 0..grid.columns() / 2 {
            let (row, col) = room::lattice_cell(i, j);
            if !grid.get(row, col)?.intersects(Cell::CORRIDOR) {
                continue;
            }
            if corridor::open_neighbors(grid, row, col).len() == 1 {
                ends.push((row, col));
            }
        }
    }
    Ok(ends)
}
