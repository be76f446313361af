//! Rejection taxonomy for simulation commands.
//!
//! Nothing in the simulation core aborts a tick. Operations that cannot be
//! applied return one of these values and leave state untouched; the session
//! logs them and moves on.

use crate::item::ItemId;
use thiserror::Error;

/// Reason a command was not applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    /// Grid access outside the world dimensions.
    #[error("cell ({col}, {row}) is outside the world")]
    OutOfBounds {
        /// Requested column.
        col: i32,
        /// Requested row.
        row: i32,
    },
    /// The target is farther than the interaction reach.
    #[error("target is {distance:.1} units away, reach is {reach:.1}")]
    OutOfReach {
        /// Distance from the body center to the target cell center.
        distance: f32,
        /// Maximum permitted distance.
        reach: f32,
    },
    /// Not enough of an item to place, craft or open a menu.
    #[error("need {required} {item}, have {held}")]
    InsufficientResource {
        /// Item that was short.
        item: ItemId,
        /// Amount required.
        required: u32,
        /// Amount held.
        held: u32,
    },
    /// The target does not accept this command (occupied cell, empty cell, bad index).
    #[error("invalid target: {0}")]
    InvalidTarget(&'static str),
}
