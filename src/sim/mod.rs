//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call
//! - Seeded RNG only
//! - Stable iteration order (by slot)
//! - No clock, audio or presentation dependencies

pub mod catalog;
pub mod demo;
pub mod spawn;
pub mod stars;
pub mod state;
pub mod targeting;
pub mod tick;

pub use catalog::{ShipCatalog, ShipClass};
pub use demo::DemoReel;
pub use spawn::{shatter, spawn_ship};
pub use stars::{Star, Starfield};
pub use state::{
    DebrisPool, Drift, Entity, EntityState, Explosion, Flight, GameEvent, GamePhase, GameState,
    Showcase,
};
pub use targeting::{Target, find_target};
pub use tick::{TickInput, tick};
