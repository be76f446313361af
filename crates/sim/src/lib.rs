#![warn(missing_docs)]
//! Authoritative single-player simulation: one session, stepped tick by tick.

mod config;
mod event;
mod session;
mod view;

pub use config::{SessionConfig, WorldSettings};
pub use event::{RespawnReason, SimEvent, TickReport};
pub use session::Session;
pub use view::{RenderView, SessionSummary};
