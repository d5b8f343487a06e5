//! Dungeon generator CLI
//!
//! Generates one level from the given options and prints it, either as an
//! ASCII map or as the JSON form of the grid.

use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use strum::IntoEnumIterator;

use donjon_core::{Cell, Grid, MapStyle, Options, create_dungeon};
use donjon_rng::DungeonRng;

/// Procedural dungeon level generator
#[derive(Parser, Debug)]
#[command(name = "donjon")]
#[command(author, version, about = "Generate a dungeon level", long_about = None)]
struct Args {
    /// Generation seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid rows
    #[arg(long = "rows", default_value_t = 39)]
    rows: usize,

    /// Grid columns
    #[arg(long = "columns", default_value_t = 39)]
    columns: usize,

    /// Dungeon layout (e.g. Box, Round)
    #[arg(short = 'd', long = "dungeon-layout", default_value = "Box")]
    dungeon_layout: String,

    /// Room layout (e.g. Packed, Scattered)
    #[arg(long = "room-layout", default_value = "Packed")]
    room_layout: String,

    /// Corridor layout (e.g. Labyrinth, Bent, Straight)
    #[arg(short = 'c', long = "corridor-layout", default_value = "Bent")]
    corridor_layout: String,

    /// Smallest room dimension in cells
    #[arg(long = "room-min", default_value_t = 3)]
    room_min: usize,

    /// Largest room dimension in cells
    #[arg(long = "room-max", default_value_t = 9)]
    room_max: usize,

    /// Percentage of corridor dead ends to remove
    #[arg(long = "remove-deadends", default_value_t = 50)]
    remove_deadends: u32,

    /// Number of stairs to place
    #[arg(long = "add-stairs", default_value_t = 2)]
    add_stairs: usize,

    /// Output format (text or json)
    #[arg(short = 'f', long = "format", default_value = "text")]
    format: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| DungeonRng::from_entropy().seed());
    let options = Options {
        seed,
        rows: args.rows,
        columns: args.columns,
        dungeon_layout: parse_style("dungeon layout", &args.dungeon_layout),
        room_min: args.room_min,
        room_max: args.room_max,
        room_layout: parse_style("room layout", &args.room_layout),
        corridor_layout: parse_style("corridor layout", &args.corridor_layout),
        remove_deadends: args.remove_deadends,
        add_stairs: args.add_stairs,
        map_style: MapStyle::Standard,
        cell_size: 18,
    };

    let grid = match create_dungeon(&options) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("donjon: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.format.as_str() {
        "text" => {
            // keep stdout clean for piping; the seed goes to stderr so a
            // good map can be regenerated
            eprintln!("seed: {}", seed);
            print!("{}", render_text(&grid));
        }
        "json" => match serde_json::to_string_pretty(&grid) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("donjon: {}", e);
                return ExitCode::FAILURE;
            }
        },
        other => {
            eprintln!("donjon: unknown format '{}', expected text or json", other);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Parse a layout style by case-insensitive prefix, listing the valid
/// values on failure
fn parse_style<T>(kind: &str, s: &str) -> T
where
    T: IntoEnumIterator + FromStr + std::fmt::Display,
{
    if let Ok(style) = s.parse::<T>() {
        return style;
    }
    let lower = s.to_lowercase();
    for style in T::iter() {
        if style.to_string().to_lowercase().starts_with(&lower) {
            return style;
        }
    }
    let valid: Vec<String> = T::iter().map(|v| v.to_string()).collect();
    eprintln!(
        "donjon: unknown {} '{}', expected one of: {}",
        kind,
        s,
        valid.join(", ")
    );
    std::process::exit(2);
}

/// One character per cell, entities over features over terrain
fn glyph(cell: Cell) -> char {
    if cell.intersects(Cell::MONSTER) {
        'm'
    } else if cell.intersects(Cell::ITEM) {
        '$'
    } else if cell.intersects(Cell::STAIR_DOWN) {
        '>'
    } else if cell.intersects(Cell::STAIR_UP) {
        '<'
    } else if cell.is_door_space() {
        '+'
    } else if cell.intersects(Cell::ROOM) {
        '.'
    } else if cell.intersects(Cell::CORRIDOR) {
        '#'
    } else {
        ' '
    }
}

fn render_text(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.columns() + 1) * grid.rows());
    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            out.push(match grid.get(row, col) {
                Ok(cell) => glyph(cell),
                // stride-quirk misses on non-square grids render as rock
                Err(_) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use donjon_core::{CorridorLayout, DungeonLayout, RoomLayout};

    #[test]
    fn test_parse_style_exact_and_prefix() {
        let exact: DungeonLayout = parse_style("dungeon layout", "Round");
        assert_eq!(exact, DungeonLayout::Round);
        let prefix: CorridorLayout = parse_style("corridor layout", "lab");
        assert_eq!(prefix, CorridorLayout::Labyrinth);
        let lower: RoomLayout = parse_style("room layout", "scattered");
        assert_eq!(lower, RoomLayout::Scattered);
    }

    #[test]
    fn test_glyph_precedence() {
        assert_eq!(glyph(Cell::ROOM), '.');
        assert_eq!(glyph(Cell::CORRIDOR), '#');
        assert_eq!(glyph(Cell::ROOM | Cell::MONSTER), 'm');
        assert_eq!(glyph(Cell::ROOM | Cell::ITEM), '$');
        assert_eq!(glyph(Cell::CORRIDOR | Cell::STAIR_DOWN), '>');
        assert_eq!(glyph(Cell::ENTRANCE | Cell::ARCH), '+');
        assert_eq!(glyph(Cell::NOTHING), ' ');
        assert_eq!(glyph(Cell::BLOCKED), ' ');
        assert_eq!(glyph(Cell::PERIMETER), ' ');
    }

    #[test]
    fn test_render_shape() {
        let options = Options {
            seed: 5,
            rows: 15,
            columns: 15,
            ..Options::default()
        };
        let grid = create_dungeon(&options).unwrap();
        let text = render_text(&grid);
        assert_eq!(text.lines().count(), 15);
        assert!(text.lines().all(|line| line.chars().count() == 15));
        assert!(text.contains('.'));
    }
}
