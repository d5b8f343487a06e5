//! Monster and item placement
//!
//! Population runs on its own random streams, derived from the level seed,
//! so redrawing the inhabitants never disturbs the architecture. Densities
//! scale with the grid area and each placement rolls an identifier from a
//! difficulty tier.

use donjon_rng::DungeonRng;

use crate::cell::Cell;
use crate::grid::{EntityId, Grid};
use crate::options::Options;

const MONSTER_SEED_OFFSET: u64 = 1;
const ITEM_SEED_OFFSET: u64 = 2;

const MONSTER_MIN: usize = 3;
const MONSTER_CELL_DIVISOR: usize = 100;
const ITEM_MIN: usize = 2;
const ITEM_CELL_DIVISOR: usize = 150;

/// Attempts allowed per wanted placement before giving up on a crowded map
const ATTEMPT_FACTOR: usize = 10;

pub(crate) fn monster_target(cells: usize) -> usize {
    (cells / MONSTER_CELL_DIVISOR).max(MONSTER_MIN)
}

pub(crate) fn item_target(cells: usize) -> usize {
    (cells / ITEM_CELL_DIVISOR).max(ITEM_MIN)
}

/// Scatter monsters over room floor
pub(crate) fn emplace_monsters(options: &Options, grid: &mut Grid) {
    let mut rng = DungeonRng::new(options.seed.wrapping_add(MONSTER_SEED_OFFSET));
    let target = monster_target(options.rows * options.columns);
    let budget = target * ATTEMPT_FACTOR;

    let mut placed = 0;
    let mut attempts = 0;
    while placed < target && attempts < budget {
        attempts += 1;
        let row = rng.rn2(grid.rows() as u32) as usize;
        let col = rng.rn2(grid.columns() as u32) as usize;
        let Ok(cell) = grid.get(row, col) else {
            continue;
        };
        if !cell.intersects(Cell::ROOM) {
            continue;
        }
        if cell.is_stairs() || cell.is_door_space() || cell.intersects(Cell::MONSTER) {
            continue;
        }
        let id = monster_id(&mut rng);
        if grid.place_entity(row, col, id, Cell::MONSTER).is_ok() {
            placed += 1;
        }
    }
}

/// Scatter items over room floor; items may share a cell with a monster's
/// guard post but not with another item
pub(crate) fn emplace_items(options: &Options, grid: &mut Grid) {
    let mut rng = DungeonRng::new(options.seed.wrapping_add(ITEM_SEED_OFFSET));
    let target = item_target(options.rows * options.columns);
    let budget = target * ATTEMPT_FACTOR;

    let mut placed = 0;
    let mut attempts = 0;
    while placed < target && attempts < budget {
        attempts += 1;
        let row = rng.rn2(grid.rows() as u32) as usize;
        let col = rng.rn2(grid.columns() as u32) as usize;
        let Ok(cell) = grid.get(row, col) else {
            continue;
        };
        if !cell.intersects(Cell::ROOM) {
            continue;
        }
        if cell.intersects(Cell::MONSTER) || cell.intersects(Cell::ITEM) {
            continue;
        }
        let id = item_id(&mut rng);
        if grid.place_entity(row, col, id, Cell::ITEM).is_ok() {
            placed += 1;
        }
    }
}

/// Roll a monster identifier from the tier picked by a d100
fn monster_id(rng: &mut DungeonRng) -> EntityId {
    let base = match rng.rn2(100) {
        0..=39 => 0,    // vermin
        40..=69 => 100, // small
        70..=89 => 200, // medium
        90..=96 => 300, // large
        _ => 400,       // huge
    };
    EntityId(base + rng.rn2(100))
}

fn item_id(rng: &mut DungeonRng) -> EntityId {
    EntityId(1000 + rng.rn2(1000))
}
