#![warn(missing_docs)]
//! 2D physics for tile worlds: collision resolution and the player body.

mod body;
mod collision;

pub use body::{BodySettings, FallDamagePolicy, KinematicBody, Landing, MovementTuning, StepOutcome};
pub use collision::{resolve_motion, Contacts, Resolution, DEFAULT_CLEARANCE};
