//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical step per tick
//! - Randomness only through an injected `Rolls` source
//! - Stable iteration order (rows by column, divers and projectiles by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod diving;
pub mod formation;
pub mod rolls;
pub mod state;
pub mod tick;

pub use collision::{Bounds, can_damage, collides, kinds_can_touch};
pub use formation::{Formation, FormationError, Slot};
pub use rolls::{Rolls, ScriptedRolls};
pub use state::{
    ColorTag, Enemy, EnemyBehavior, Entity, EntityId, EntityKind, GamePhase, GameState, Owner,
    Player, Projectile,
};
pub use tick::{TickInput, check_fleet, tick};
