//! Game state and core simulation types
//!
//! Everything the tick engine mutates lives here. The presentation layer
//! only reads it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use super::formation::{Formation, FormationError};
use crate::consts::*;

/// Stable identifier reported to the presentation layer
pub type EntityId = u32;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Run ended (terminal until reset)
    GameOver,
}

/// Variant tag used by the collision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Color tag handed to the renderer (enemies by row, player blue, shots red)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Yellow,
    Red,
    Purple,
    Turquoise,
    Blue,
}

impl ColorTag {
    /// Fleet color for a formation row
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => ColorTag::Yellow,
            1 => ColorTag::Red,
            2 => ColorTag::Purple,
            _ => ColorTag::Turquoise,
        }
    }
}

/// Shared capability set of everything on screen
pub trait Entity {
    fn kind(&self) -> EntityKind;
    fn pos(&self) -> Vec2;
    fn size(&self) -> Vec2;
    fn move_by(&mut self, delta: Vec2);

    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos(), self.size())
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }
}

impl Player {
    /// Start position for a play area: horizontally centered, a fixed
    /// offset above the bottom edge
    pub fn spawn(screen: Vec2) -> Self {
        Self {
            id: 0,
            pos: Vec2::new(
                (screen.x - PLAYER_WIDTH) / 2.0,
                screen.y - PLAYER_BOTTOM_OFFSET,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    /// Move horizontally, clamped to `[0, screen_width - width]`
    pub fn move_clamped(&mut self, dx: f32, screen_width: f32) {
        let max_x = (screen_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + dx).clamp(0.0, max_x);
    }

    /// Point projectiles leave from (top center)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }
}

impl Entity for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// What an enemy is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Marching left/right with the rest of the formation
    Formation,
    /// Fresh replacement sliding down to its row
    Entering,
    /// Detached attacker homing on the player
    Diving,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub color: ColorTag,
    row: usize,
    column: usize,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn new(id: EntityId, color: ColorTag, row: usize, column: usize) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            size: Vec2::splat(ENEMY_SIZE),
            color,
            row,
            column,
            behavior: EnemyBehavior::Formation,
        }
    }

    /// Formation row this enemy (and any replacement) belongs to
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Vertical gap between the enemy's bottom edge and the screen bottom
    pub fn distance_to_bottom(&self, screen_height: f32) -> f32 {
        screen_height - self.pos.y - self.size.y
    }

    /// Layout position for a formation slot
    pub fn slot_position(row: usize, column: usize) -> Result<Vec2, FormationError> {
        if row >= FORMATION_ROWS {
            return Err(FormationError::RowOutOfRange { row });
        }
        if column >= FORMATION_COLUMNS {
            return Err(FormationError::ColumnOutOfRange { row, column });
        }
        Ok(Vec2::new(
            FORMATION_ORIGIN_X + column as f32 * (ENEMY_SIZE + FORMATION_SPACING),
            FORMATION_ORIGIN_Y + row as f32 * (ENEMY_SIZE + FORMATION_SPACING),
        ))
    }

    /// Y coordinate an entering enemy stops at
    pub fn slot_y(&self) -> f32 {
        FORMATION_ORIGIN_Y + self.row as f32 * (self.size.y + FORMATION_SPACING)
    }
}

impl Entity for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Unit direction (or zero)
    pub direction: Vec2,
    pub speed: f32,
    owner: Owner,
}

impl Projectile {
    /// Spawn a projectile whose bounds are horizontally centered on `origin`
    /// and end at it vertically
    pub fn new(id: EntityId, origin: Vec2, direction: Vec2, speed: f32, owner: Owner) -> Self {
        let size = Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT);
        Self {
            id,
            pos: Vec2::new(origin.x - size.x / 2.0, origin.y - size.y),
            size,
            direction,
            speed,
            owner,
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Advance one tick along `direction * speed`
    pub fn advance(&mut self) {
        let step = self.direction * self.speed;
        self.move_by(step);
    }
}

impl Entity for Projectile {
    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// Monotonic id source shared by every spawn site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: EntityId,
}

impl Default for EntityIds {
    fn default() -> Self {
        // 0 is the player
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Play area size
    pub screen: Vec2,
    pub score: u64,
    pub lives: u8,
    pub fleets_destroyed: u32,
    /// Score recorded at the moment of game over
    pub final_score: Option<u64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub formation: Formation,
    /// Enemies that have left the formation (sorted by id)
    pub divers: Vec<Enemy>,
    /// Projectiles in flight (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Entities removed during the most recent tick
    #[serde(skip)]
    pub removed: Vec<EntityId>,
    pub ids: EntityIds,
}

impl GameState {
    /// Create a new run: full fleet, player at start, three lives
    pub fn new(seed: u64, screen: Vec2) -> Result<Self, FormationError> {
        let mut state = Self {
            seed,
            screen,
            score: 0,
            lives: STARTING_LIVES,
            fleets_destroyed: 0,
            final_score: None,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::spawn(screen),
            formation: Formation::new(),
            divers: Vec::new(),
            projectiles: Vec::new(),
            removed: Vec::new(),
            ids: EntityIds::default(),
        };

        let spawned = state.formation.build_fleet(&mut state.ids)?;
        log::debug!("Initial fleet of {} enemies (seed {})", spawned, seed);

        Ok(state)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn award(&mut self, points: u64) {
        self.score += points;
    }

    /// Lose one life; enters GameOver when none remain.
    /// Returns true if this call ended the run.
    pub fn lose_life(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.final_score = Some(self.score);
            log::info!(
                "Game over at tick {} - score {}, fleets destroyed {}",
                self.time_ticks,
                self.score,
                self.fleets_destroyed
            );
            return true;
        }
        log::debug!("Player hit, {} lives left", self.lives);
        false
    }

    /// Total enemies alive (formation + divers)
    pub fn enemy_count(&self) -> usize {
        self.formation.len() + self.divers.len()
    }
}
