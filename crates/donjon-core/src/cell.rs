//! Cell flags for the dungeon grid

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

const ROOM_ID_SHIFT: u32 = 6;
const LABEL_SHIFT: u32 = 24;

bitflags! {
    /// A single grid cell: an OR-union of terrain, feature, and entity flags
    ///
    /// Membership is tested with intersection, never equality, so carving
    /// stages can layer flags onto a cell without erasing what is already
    /// there. Bit 0x8 is unassigned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Cell: u32 {
        const NOTHING = 0x0;
        const BLOCKED = 0x1;
        const ROOM = 0x2;
        const CORRIDOR = 0x4;
        const PERIMETER = 0x10;
        const ENTRANCE = 0x20;
        /// 10-bit room id field, see [`Cell::room_id`]
        const ROOM_ID = 0xffc0;
        const ARCH = 0x10000;
        const DOOR = 0x20000;
        const LOCKED = 0x40000;
        const TRAPPED = 0x80000;
        const SECRET = 0x100000;
        const PORTCULLIS = 0x200000;
        const STAIR_DOWN = 0x400000;
        const STAIR_UP = 0x800000;
        /// 4-bit display label field, reserved for renderers
        const LABEL = 0xf000000;
        const MONSTER = 0x10000000;
        const ITEM = 0x20000000;

        /// Walkable carved terrain
        const OPEN_SPACE = Self::ROOM.bits() | Self::CORRIDOR.bits();
        /// Any door variant
        const DOOR_SPACE = Self::ARCH.bits()
            | Self::DOOR.bits()
            | Self::LOCKED.bits()
            | Self::TRAPPED.bits()
            | Self::SECRET.bits()
            | Self::PORTCULLIS.bits();
        /// Either stair direction
        const STAIRS = Self::STAIR_DOWN.bits() | Self::STAIR_UP.bits();
        /// Ground a new room may not claim
        const BLOCK_ROOM = Self::BLOCKED.bits() | Self::ROOM.bits();
        /// Ground a tunnel may not delve through
        const BLOCK_CORRIDOR = Self::BLOCKED.bits()
            | Self::PERIMETER.bits()
            | Self::CORRIDOR.bits();
        /// Ground a door may not occupy
        const BLOCK_DOOR = Self::BLOCKED.bits() | Self::DOOR_SPACE.bits();
    }
}

impl Cell {
    /// Check if this cell is carved open (room or corridor)
    pub const fn is_open_space(self) -> bool {
        self.intersects(Self::OPEN_SPACE)
    }

    /// Check if this cell holds any door variant
    pub const fn is_door_space(self) -> bool {
        self.intersects(Self::DOOR_SPACE)
    }

    /// Check if this cell holds a stair (either direction)
    pub const fn is_stairs(self) -> bool {
        self.intersects(Self::STAIRS)
    }

    /// Room id stored in this cell (0 = no room id assigned)
    pub const fn room_id(self) -> u16 {
        ((self.bits() & Self::ROOM_ID.bits()) >> ROOM_ID_SHIFT) as u16
    }

    /// Replace the room id field, leaving every other flag untouched
    pub const fn with_room_id(self, id: u16) -> Self {
        let cleared = self.bits() & !Self::ROOM_ID.bits();
        Self::from_bits_retain(cleared | (((id as u32) << ROOM_ID_SHIFT) & Self::ROOM_ID.bits()))
    }

    /// Display label stored in this cell
    pub const fn label(self) -> u8 {
        ((self.bits() & Self::LABEL.bits()) >> LABEL_SHIFT) as u8
    }

    /// Replace the label field, leaving every other flag untouched
    pub const fn with_label(self, label: u8) -> Self {
        let cleared = self.bits() & !Self::LABEL.bits();
        Self::from_bits_retain(cleared | (((label as u32) << LABEL_SHIFT) & Self::LABEL.bits()))
    }
}

// Manual serde impl: a cell travels as its raw u32 bit value
impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        // retain, not truncate: field bits must round-trip exactly
        Ok(Cell::from_bits_retain(bits))
    }
}
