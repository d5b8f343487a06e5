//! Corridor tunneling and the cleanup passes
//!
//! Corridors are carved with a stack walk over the same half-resolution
//! lattice the rooms use, two cells per step. Every empty lattice cell seeds
//! a walk, so all unmasked ground outside the rooms fills with passage; the
//! straightness of the result is the only knob.

use std::collections::VecDeque;

use donjon_rng::DungeonRng;

use crate::cell::Cell;
use crate::door::Door;
use crate::errors::DungeonError;
use crate::grid::Grid;
use crate::options::Options;
use crate::room::lattice_cell;

/// Tunnel directions: north, east, south, west
const TUNNEL_DIRS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Cells a walker can stand on
const TRAVERSABLE: Cell = Cell::OPEN_SPACE
    .union(Cell::DOOR_SPACE)
    .union(Cell::ENTRANCE);

/// Ground a tunnel may not delve through: solid rock, walls, existing
/// passage, room interiors, and door sills
fn tunnel_blocked(cell: Cell) -> bool {
    cell.intersects(Cell::BLOCK_CORRIDOR.union(Cell::ROOM).union(Cell::DOOR_SPACE))
}

/// Maze-fill all open lattice ground with corridor
pub(crate) fn emplace_corridors(
    options: &Options,
    grid: &mut Grid,
    rng: &mut DungeonRng,
) -> Result<(), DungeonError> {
    let n_i = grid.rows() / 2;
    let n_j = grid.columns() / 2;
    let straight_chance = options.corridor_layout.straight_chance();

    for i in 0..n_i {
        for j in 0..n_j {
            let (row, col) = lattice_cell(i, j);
            if grid.get(row, col)? != Cell::NOTHING {
                continue;
            }
            tunnel(grid, rng, i, j, straight_chance)?;
        }
    }
    Ok(())
}

/// Stack walk carving two cells per step
///
/// With probability `straight_chance` a step keeps the heading that led
/// into the current cell; otherwise it picks uniformly among the open
/// directions, which is what makes a labyrinth wind.
fn tunnel(
    grid: &mut Grid,
    rng: &mut DungeonRng,
    start_i: usize,
    start_j: usize,
    straight_chance: u32,
) -> Result<(), DungeonError> {
    let mut stack: Vec<(usize, usize, Option<usize>)> = vec![(start_i, start_j, None)];

    while let Some(&(i, j, heading)) = stack.last() {
        let mut open_dirs = [0usize; 4];
        let mut q = 0;
        for dir in 0..4 {
            if can_delve(grid, i, j, dir)? {
                open_dirs[q] = dir;
                q += 1;
            }
        }
        if q == 0 {
            stack.pop();
            continue;
        }

        let dir = match heading {
            Some(last) if open_dirs[..q].contains(&last) && rng.percent(straight_chance) => last,
            _ => open_dirs[rng.rn2(q as u32) as usize],
        };

        let (row, col) = lattice_cell(i, j);
        let (di, dj) = TUNNEL_DIRS[dir];
        let next_i = (i as i32 + di) as usize;
        let next_j = (j as i32 + dj) as usize;
        let (next_row, next_col) = lattice_cell(next_i, next_j);
        let mid_row = (row as i32 + di) as usize;
        let mid_col = (col as i32 + dj) as usize;

        grid.merge(row, col, Cell::CORRIDOR)?;
        grid.merge(mid_row, mid_col, Cell::CORRIDOR)?;
        grid.merge(next_row, next_col, Cell::CORRIDOR)?;
        stack.push((next_i, next_j, Some(dir)));
    }
    Ok(())
}

/// Whether a two-step move from lattice cell (i, j) can be carved
fn can_delve(grid: &Grid, i: usize, j: usize, dir: usize) -> Result<bool, DungeonError> {
    let n_i = grid.rows() / 2;
    let n_j = grid.columns() / 2;
    let (di, dj) = TUNNEL_DIRS[dir];
    let next_i = i as i32 + di;
    let next_j = j as i32 + dj;
    if next_i < 0 || next_j < 0 || next_i >= n_i as i32 || next_j >= n_j as i32 {
        return Ok(false);
    }

    let (row, col) = lattice_cell(i, j);
    let (next_row, next_col) = lattice_cell(next_i as usize, next_j as usize);
    let mid = grid.get((row as i32 + di) as usize, (col as i32 + dj) as usize)?;
    let next = grid.get(next_row, next_col)?;
    Ok(!tunnel_blocked(mid) && !tunnel_blocked(next))
}

/// Orthogonal neighbors a walker could stand on
pub(crate) fn open_neighbors(grid: &Grid, row: usize, col: usize) -> Vec<(usize, usize)> {
    let mut found = Vec::with_capacity(4);
    for (dr, dc) in TUNNEL_DIRS {
        let r = row as i32 + dr;
        let c = col as i32 + dc;
        if r < 0 || c < 0 || r >= grid.rows() as i32 || c >= grid.columns() as i32 {
            continue;
        }
        let (r, c) = (r as usize, c as usize);
        if let Ok(cell) = grid.get(r, c) {
            if cell.intersects(TRAVERSABLE) {
                found.push((r, c));
            }
        }
    }
    found
}

/// Finalization: collapse dead ends, drop stranded corridor pockets, and
/// wall doors that no longer lead anywhere
pub(crate) fn clear_dungeon(
    options: &Options,
    grid: &mut Grid,
    doors: &[Door],
    rng: &mut DungeonRng,
) -> Result<(), DungeonError> {
    collapse_tunnels(grid, options.remove_deadends, rng)?;
    trim_disconnected(grid, doors)?;
    fix_doors(grid, doors)?;
    Ok(())
}

/// Walk every corridor lattice cell and, with the configured probability,
/// eat its tunnel back from the dead end to the first junction
fn collapse_tunnels(grid: &mut Grid, pct: u32, rng: &mut DungeonRng) -> Result<(), DungeonError> {
    if pct == 0 {
        return Ok(());
    }
    let all = pct >= 100;
    let n_i = grid.rows() / 2;
    let n_j = grid.columns() / 2;

    for i in 0..n_i {
        for j in 0..n_j {
            let (row, col) = lattice_cell(i, j);
            let cell = grid.get(row, col)?;
            if !cell.intersects(Cell::CORRIDOR) || cell.is_stairs() {
                continue;
            }
            if all || rng.percent(pct) {
                collapse(grid, row, col)?;
            }
        }
    }
    Ok(())
}

fn collapse(grid: &mut Grid, mut row: usize, mut col: usize) -> Result<(), DungeonError> {
    loop {
        let cell = grid.get(row, col)?;
        if !cell.intersects(Cell::CORRIDOR) || cell.is_stairs() {
            return Ok(());
        }
        let neighbors = open_neighbors(grid, row, col);
        if neighbors.len() > 1 {
            return Ok(());
        }
        grid.update(row, col, Cell::NOTHING)?;
        match neighbors.first() {
            Some(&(r, c)) => {
                row = r;
                col = c;
            }
            None => return Ok(()),
        }
    }
}

/// Flood from the entrance and zero every corridor cell the flood misses
fn trim_disconnected(grid: &mut Grid, doors: &[Door]) -> Result<(), DungeonError> {
    let start = match doors.first() {
        Some(door) => (door.row, door.col),
        None => match first_corridor(grid) {
            Some(at) => at,
            None => return Ok(()),
        },
    };

    let columns = grid.columns();
    let mut reached = vec![false; grid.rows() * columns];
    let mut queue = VecDeque::from([start]);
    reached[start.0 * columns + start.1] = true;

    while let Some((row, col)) = queue.pop_front() {
        for (r, c) in open_neighbors(grid, row, col) {
            if !reached[r * columns + c] {
                reached[r * columns + c] = true;
                queue.push_back((r, c));
            }
        }
    }

    for row in 0..grid.rows() {
        for col in 0..columns {
            let Ok(cell) = grid.get(row, col) else { continue };
            if cell.intersects(Cell::CORRIDOR) && !reached[row * columns + col] {
                grid.update(row, col, Cell::NOTHING)?;
            }
        }
    }
    Ok(())
}

fn first_corridor(grid: &Grid) -> Option<(usize, usize)> {
    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            if let Ok(cell) = grid.get(row, col) {
                if cell.intersects(Cell::CORRIDOR) {
                    return Some((row, col));
                }
            }
        }
    }
    None
}

/// Wall up sills whose outside was collapsed or trimmed away
fn fix_doors(grid: &mut Grid, doors: &[Door]) -> Result<(), DungeonError> {
    for door in doors {
        if grid.get(door.out_row, door.out_col)?.intersects(TRAVERSABLE) {
            continue;
        }
        grid.clear_flags(door.row, door.col, Cell::DOOR_SPACE | Cell::ENTRANCE)?;
        grid.merge(door.row, door.col, Cell::PERIMETER)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CorridorLayout;

    fn fill_options(layout: CorridorLayout, seed: u64) -> Options {
        Options {
            seed,
            rows: 21,
            columns: 21,
            corridor_layout: layout,
            ..Options::default()
        }
    }

    fn filled(layout: CorridorLayout, seed: u64) -> Grid {
        let opts = fill_options(layout, seed);
        let mut grid = Grid::new(opts.rows, opts.columns);
        let mut rng = DungeonRng::new(opts.seed);
        emplace_corridors(&opts, &mut grid, &mut rng).unwrap();
        grid
    }

    fn corridor_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                if grid.get(row, col).unwrap().intersects(Cell::CORRIDOR) {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    fn flood_count(grid: &Grid, start: (usize, usize)) -> usize {
        let columns = grid.columns();
        let mut reached = vec![false; grid.rows() * columns];
        let mut queue = VecDeque::from([start]);
        reached[start.0 * columns + start.1] = true;
        let mut count = 1;
        while let Some((row, col)) = queue.pop_front() {
            for (r, c) in open_neighbors(grid, row, col) {
                if !reached[r * columns + c] {
                    reached[r * columns + c] = true;
                    queue.push_back((r, c));
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_maze_fill_reaches_every_lattice_cell() {
        let grid = filled(CorridorLayout::Labyrinth, 42);
        for i in 0..10 {
            for j in 0..10 {
                let (row, col) = lattice_cell(i, j);
                assert!(grid.get(row, col).unwrap().intersects(Cell::CORRIDOR));
            }
        }
    }

    #[test]
    fn test_maze_is_fully_connected() {
        for layout in [
            CorridorLayout::Labyrinth,
            CorridorLayout::Bent,
            CorridorLayout::Straight,
        ] {
            let grid = filled(layout, 99);
            let cells = corridor_cells(&grid);
            assert!(!cells.is_empty());
            assert_eq!(flood_count(&grid, cells[0]), cells.len());
        }
    }

    #[test]
    fn test_corridors_avoid_blocked_ground() {
        let opts = fill_options(CorridorLayout::Bent, 5);
        let mut grid = Grid::new(opts.rows, opts.columns);
        for row in 0..opts.rows {
            for col in 0..7 {
                grid.merge(row, col, Cell::BLOCKED).unwrap();
            }
        }
        let mut rng = DungeonRng::new(opts.seed);
        emplace_corridors(&opts, &mut grid, &mut rng).unwrap();

        for (_, col) in corridor_cells(&grid) {
            assert!(col >= 7);
        }
    }

    #[test]
    fn test_corridors_stay_out_of_rooms() {
        let opts = fill_options(CorridorLayout::Labyrinth, 13);
        let mut grid = Grid::new(opts.rows, opts.columns);
        for row in 5..=9 {
            for col in 5..=9 {
                grid.merge(row, col, Cell::ROOM).unwrap();
            }
        }
        let mut rng = DungeonRng::new(opts.seed);
        emplace_corridors(&opts, &mut grid, &mut rng).unwrap();

        for row in 5..=9 {
            for col in 5..=9 {
                assert!(!grid.get(row, col).unwrap().intersects(Cell::CORRIDOR));
            }
        }
    }

    #[test]
    fn test_same_seed_same_corridors() {
        let a = filled(CorridorLayout::Bent, 1234);
        let b = filled(CorridorLayout::Bent, 1234);
        assert_eq!(a, b);

        let c = filled(CorridorLayout::Straight, 1234);
        assert_ne!(a, c);
    }

    #[test]
    fn test_full_collapse_erases_a_roomless_maze() {
        // a perfect maze is all dead ends, so collapsing at 100 percent
        // eats every corridor back to nothing
        let mut grid = filled(CorridorLayout::Labyrinth, 77);
        let mut rng = DungeonRng::new(77);
        collapse_tunnels(&mut grid, 100, &mut rng).unwrap();

        assert!(corridor_cells(&grid).is_empty());
    }

    #[test]
    fn test_zero_percent_collapse_is_a_no_op() {
        let mut grid = filled(CorridorLayout::Bent, 77);
        let before = grid.clone();
        let mut rng = DungeonRng::new(77);
        collapse_tunnels(&mut grid, 0, &mut rng).unwrap();

        assert_eq!(grid, before);
    }

    #[test]
    fn test_collapse_spares_stairs() {
        let mut grid = Grid::new(9, 9);
        // a short spur: (1,1)-(1,2)-(1,3), stair on the end
        for col in 1..=3 {
            grid.merge(1, col, Cell::CORRIDOR).unwrap();
        }
        grid.merge(1, 1, Cell::STAIR_UP).unwrap();
        let mut rng = DungeonRng::new(0);
        collapse_tunnels(&mut grid, 100, &mut rng).unwrap();

        assert!(grid.get(1, 1).unwrap().intersects(Cell::CORRIDOR));
        assert!(grid.get(1, 1).unwrap().is_stairs());
    }

    #[test]
    fn test_trim_removes_stranded_pocket() {
        let mut grid = Grid::new(15, 15);
        // connected run behind a door at (5,5)
        grid.update(5, 5, Cell::ENTRANCE | Cell::ARCH).unwrap();
        for col in 6..=9 {
            grid.merge(5, col, Cell::CORRIDOR).unwrap();
        }
        // stranded pocket nowhere near it
        for col in 11..=13 {
            grid.merge(11, col, Cell::CORRIDOR).unwrap();
        }
        let doors = vec![Door {
            row: 5,
            col: 5,
            out_row: 5,
            out_col: 6,
        }];
        trim_disconnected(&mut grid, &doors).unwrap();

        for col in 6..=9 {
            assert!(grid.get(5, col).unwrap().intersects(Cell::CORRIDOR));
        }
        for col in 11..=13 {
            assert_eq!(grid.get(11, col).unwrap(), Cell::NOTHING);
        }
    }

    #[test]
    fn test_fix_doors_walls_stranded_sills() {
        let mut grid = Grid::new(9, 9);
        grid.update(3, 3, Cell::ENTRANCE | Cell::DOOR).unwrap();
        // outside cell stays NOTHING, as after a collapse
        let doors = vec![Door {
            row: 3,
            col: 3,
            out_row: 3,
            out_col: 4,
        }];
        fix_doors(&mut grid, &doors).unwrap();

        let cell = grid.get(3, 3).unwrap();
        assert!(!cell.is_door_space());
        assert!(!cell.intersects(Cell::ENTRANCE));
        assert!(cell.intersects(Cell::PERIMETER));
    }

    #[test]
    fn test_fix_doors_keeps_live_sills() {
        let mut grid = Grid::new(9, 9);
        grid.update(3, 3, Cell::ENTRANCE | Cell::DOOR).unwrap();
        grid.update(3, 4, Cell::CORRIDOR).unwrap();
        let doors = vec![Door {
            row: 3,
            col: 3,
            out_row: 3,
            out_col: 4,
        }];
        fix_doors(&mut grid, &doors).unwrap();

        let cell = grid.get(3, 3).unwrap();
        assert!(cell.is_door_space());
        assert!(cell.intersects(Cell::ENTRANCE));
    }
}
