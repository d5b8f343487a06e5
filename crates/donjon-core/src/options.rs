//! Generation options and layout styles

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Overall footprint mask applied before any carving
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
pub enum DungeonLayout {
    /// Full rectangle, no mask
    #[default]
    Box,
    /// Cross-shaped mask; no carving algorithm is defined for it
    Cross,
    /// Circular playable area inscribed in the rectangle
    Round,
}

/// How rooms are distributed over the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
pub enum RoomLayout {
    /// Dense anchor walk over the whole lattice
    #[default]
    Packed,
    /// Random anchors, as many as the area affords
    Scattered,
}

/// How winding the corridor network is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
pub enum CorridorLayout {
    /// Maximally winding maze fill
    Labyrinth,
    /// Wandering corridors that still trend somewhere
    #[default]
    Bent,
    /// Long straight runs wherever possible
    Straight,
}

impl CorridorLayout {
    /// Percent chance a tunnel keeps its previous heading
    pub const fn straight_chance(self) -> u32 {
        match self {
            CorridorLayout::Labyrinth => 0,
            CorridorLayout::Bent => 50,
            CorridorLayout::Straight => 90,
        }
    }
}

/// Rendering profile hint carried through to consumers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
pub enum MapStyle {
    #[default]
    Standard,
}

/// Options for one generation run
///
/// Read-only for the lifetime of the run; every stage receives a shared
/// reference and the same value always regenerates the same dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Master seed; samplers derive their own streams from it
    pub seed: u64,

    // Grid footprint
    pub rows: usize,
    pub columns: usize,
    pub dungeon_layout: DungeonLayout,

    // Rooms, sizes in cells (carved sizes come out odd)
    pub room_min: usize,
    pub room_max: usize,
    pub room_layout: RoomLayout,

    // Corridors
    pub corridor_layout: CorridorLayout,
    /// Percentage of corridor dead ends collapsed during cleanup
    pub remove_deadends: u32,
    /// Number of stairs to place; the first two form a down/up pair
    pub add_stairs: usize,

    // Rendering hints, unused by generation
    pub map_style: MapStyle,
    pub cell_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 0,
            rows: 39,
            columns: 39,
            dungeon_layout: DungeonLayout::Box,
            room_min: 3,
            room_max: 9,
            room_layout: RoomLayout::Packed,
            corridor_layout: CorridorLayout::Bent,
            remove_deadends: 50,
            add_stairs: 2,
            map_style: MapStyle::Standard,
            cell_size: 18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.rows, 39);
        assert_eq!(opts.columns, 39);
        assert_eq!(opts.dungeon_layout, DungeonLayout::Box);
        assert_eq!(opts.room_min, 3);
        assert_eq!(opts.room_max, 9);
        assert_eq!(opts.corridor_layout, CorridorLayout::Bent);
        assert_eq!(opts.add_stairs, 2);
    }

    #[test]
    fn test_layout_names_round_trip() {
        assert_eq!("Round".parse::<DungeonLayout>(), Ok(DungeonLayout::Round));
        assert_eq!(DungeonLayout::Round.to_string(), "Round");
        assert_eq!(
            "Labyrinth".parse::<CorridorLayout>(),
            Ok(CorridorLayout::Labyrinth)
        );
        assert!("labyrinthine".parse::<CorridorLayout>().is_err());
    }

    #[test]
    fn test_straight_chance() {
        assert_eq!(CorridorLayout::Labyrinth.straight_chance(), 0);
        assert_eq!(CorridorLayout::Bent.straight_chance(), 50);
        assert_eq!(CorridorLayout::Straight.straight_chance(), 90);
    }

    #[test]
    fn test_serde_round_trip() {
        let opts = Options {
            seed: 99,
            dungeon_layout: DungeonLayout::Round,
            ..Options::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}
