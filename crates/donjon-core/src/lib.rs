//! donjon-core: Deterministic dungeon level generation
//!
//! This crate contains the full generation pipeline with no I/O
//! dependencies. It is designed to be pure and testable: the same
//! [`Options`] always produce the same [`Grid`], down to every monster
//! and item placement.
//!
//! Levels are built over a flat grid of bit-flag [`Cell`]s. Rooms are
//! carved on a half-resolution lattice, opened with doors, labeled, and
//! joined by a maze fill whose straightness is configurable. Stairs land
//! on corridor dead ends, entities are sprinkled from seed-derived
//! streams, and a cleanup pass collapses dead ends and walls off doors
//! that no longer lead anywhere.

mod cell;
mod corridor;
mod door;
mod entity;
mod errors;
mod generation;
mod grid;
mod options;
mod room;

pub use cell::Cell;
pub use errors::DungeonError;
pub use generation::create_dungeon;
pub use grid::{EntityId, EntityPlacement, Grid};
pub use options::{CorridorLayout, DungeonLayout, MapStyle, Options, RoomLayout};
