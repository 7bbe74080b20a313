//! Formation Shooter - simulation core for a fixed-perspective arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, diving, tick)
//! - `engine`: Facade consumed by a presentation/input layer
//! - `settings`: Injected configuration (screen size, seed)

pub mod engine;
pub mod settings;
pub mod sim;

pub use engine::{Engine, Renderable, Status};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Default play area (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 45.0;
    pub const PLAYER_START_X: f32 = 385.0;
    pub const PLAYER_START_Y: f32 = 525.0;
    /// Gap between the player's top edge and the bottom of the screen
    pub const PLAYER_BOTTOM_OFFSET: f32 = SCREEN_HEIGHT - PLAYER_START_Y;
    /// Horizontal step per tick while a direction is held
    pub const PLAYER_STEP: f32 = 0.25;
    pub const STARTING_LIVES: u8 = 3;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 30.0;
    /// Base enemy speed; formation march and homing use speed / 1.5
    pub const ENEMY_SPEED: f32 = 0.2;
    pub const FORMATION_SPEED_DIVISOR: f32 = 1.5;

    /// Formation layout
    pub const FORMATION_ROWS: usize = 6;
    pub const FORMATION_COLUMNS: usize = 10;
    pub const FORMATION_ORIGIN_X: f32 = 50.0;
    pub const FORMATION_ORIGIN_Y: f32 = 70.0;
    pub const FORMATION_SPACING: f32 = 10.0;

    /// Smallest play area the fixed layout fits in (formation plus margins,
    /// and the player below the lowest row)
    pub const MIN_SCREEN_WIDTH: f32 =
        2.0 * FORMATION_ORIGIN_X + FORMATION_COLUMNS as f32 * (ENEMY_SIZE + FORMATION_SPACING);
    pub const MIN_SCREEN_HEIGHT: f32 = FORMATION_ORIGIN_Y
        + FORMATION_ROWS as f32 * (ENEMY_SIZE + FORMATION_SPACING)
        + PLAYER_BOTTOM_OFFSET;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 5.0;
    pub const PROJECTILE_HEIGHT: f32 = 15.0;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 0.5;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 0.2;

    /// Divers stop homing and firing once this close to the bottom edge
    pub const DIVE_FLOOR_DISTANCE: f32 = 200.0;

    /// Per-tick trigger probabilities
    pub const DIVE_PROBABILITY: f64 = 0.001;
    pub const DIVER_FIRE_PROBABILITY: f64 = 0.0003;
    pub const REPLACEMENT_PROBABILITY: f64 = 0.1;

    /// Points
    pub const FORMATION_KILL_POINTS: u64 = 10;
    pub const DIVER_KILL_POINTS: u64 = 20;
}
