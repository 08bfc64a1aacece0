//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame physics step (timers driven by the elapsed time the host passes in)
//! - Seeded RNG only
//! - One full, fixed-order pass per `tick` call
//! - No rendering or platform dependencies

pub mod collision;
pub mod player;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use player::{Facing, Player, SizeTier};
pub use rect::Rect;
pub use state::{Body, Enemy, GameEvent, GamePhase, GameState, Pickup, PickupKind, Status};
pub use tick::{TickInput, tick};
