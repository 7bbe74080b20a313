//! Enemy formation: grid layout, lockstep march and replacement spawns
//!
//! Rows hold their enemies ordered by column, so the first and last entry
//! of a row are its perimeter. The march direction is shared by the whole
//! formation and stored here rather than on each enemy.

use core::fmt;
use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rolls::Rolls;
use super::state::{ColorTag, Enemy, EnemyBehavior, EntityId, EntityIds};
use crate::consts::*;

/// Fatal layout errors raised while building a fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationError {
    RowOutOfRange { row: usize },
    ColumnOutOfRange { row: usize, column: usize },
}

impl fmt::Display for FormationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row } => {
                write!(f, "formation row {row} out of range (0..{FORMATION_ROWS})")
            }
            Self::ColumnOutOfRange { row, column } => write!(
                f,
                "formation column {column} in row {row} out of range (0..{FORMATION_COLUMNS})"
            ),
        }
    }
}

impl std::error::Error for FormationError {}

/// Columns populated in each row of a fresh fleet
pub fn row_columns(row: usize) -> Vec<usize> {
    match row {
        0 => vec![3, 6],
        1 => (2..8).collect(),
        2 => (1..9).collect(),
        3..=5 => (0..FORMATION_COLUMNS).collect(),
        _ => Vec::new(),
    }
}

/// Location of an enemy inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub index: usize,
}

/// The marching grid of enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    rows: Vec<Vec<Enemy>>,
    /// Shared horizontal direction (+1 right, -1 left)
    pub direction: f32,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    /// Empty grid marching right
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new(); FORMATION_ROWS],
            direction: 1.0,
        }
    }

    /// Replace the grid with a full fleet. Returns the number of enemies placed.
    pub fn build_fleet(&mut self, ids: &mut EntityIds) -> Result<usize, FormationError> {
        let mut rows = vec![Vec::new(); FORMATION_ROWS];
        for (row, enemies) in rows.iter_mut().enumerate() {
            for column in row_columns(row) {
                let mut enemy = Enemy::new(ids.next_id(), ColorTag::for_row(row), row, column);
                enemy.pos = Enemy::slot_position(row, column)?;
                enemies.push(enemy);
            }
        }
        self.rows = rows;
        Ok(self.len())
    }

    pub fn rows(&self) -> &[Vec<Enemy>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// True when every row has been cleared
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.rows.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.rows.iter_mut().flatten()
    }

    /// Insert an enemy into its own row, keeping the row ordered by column
    pub fn insert(&mut self, enemy: Enemy) -> Result<(), FormationError> {
        let row = enemy.row();
        let Some(enemies) = self.rows.get_mut(row) else {
            return Err(FormationError::RowOutOfRange { row });
        };
        let at = enemies.partition_point(|e| e.column() <= enemy.column());
        enemies.insert(at, enemy);
        Ok(())
    }

    /// First, and (for rows of two or more) last, enemy of every non-empty row
    pub fn dive_candidates(&self) -> Vec<Slot> {
        let mut candidates = Vec::new();
        for (row, enemies) in self.rows.iter().enumerate() {
            if enemies.is_empty() {
                continue;
            }
            candidates.push(Slot { row, index: 0 });
            if enemies.len() > 1 {
                candidates.push(Slot {
                    row,
                    index: enemies.len() - 1,
                });
            }
        }
        candidates
    }

    /// Detach the enemy at `slot` from the grid
    pub fn take(&mut self, slot: Slot) -> Option<Enemy> {
        let enemies = self.rows.get_mut(slot.row)?;
        (slot.index < enemies.len()).then(|| enemies.remove(slot.index))
    }

    /// Move every grid enemy one tick.
    ///
    /// Formation enemies step sideways in the shared direction; if any of them
    /// ends past an edge, the direction flips for everyone starting next tick.
    /// Entering enemies slide down until they reach their row.
    pub fn march(&mut self, screen_width: f32) {
        let step = self.direction * ENEMY_SPEED / FORMATION_SPEED_DIVISOR;
        let mut past_right = false;
        let mut past_left = false;

        for enemy in self.rows.iter_mut().flatten() {
            match enemy.behavior {
                EnemyBehavior::Formation => {
                    enemy.pos.x += step;
                    if enemy.pos.x > screen_width - enemy.size.x {
                        past_right = true;
                    } else if enemy.pos.x < 0.0 {
                        past_left = true;
                    }
                }
                EnemyBehavior::Entering => {
                    enemy.pos.y += ENEMY_SPEED;
                    if enemy.pos.y >= enemy.slot_y() {
                        enemy.behavior = EnemyBehavior::Formation;
                    }
                }
                // Divers never sit in the grid
                EnemyBehavior::Diving => {}
            }
        }

        if past_right {
            self.direction = -1.0;
        } else if past_left {
            self.direction = 1.0;
        }
    }

    /// Pull every enemy whose id is in `marked` out of the grid
    pub fn remove_marked(&mut self, marked: &HashSet<EntityId>) -> Vec<Enemy> {
        let mut removed = Vec::new();
        for enemies in &mut self.rows {
            let (gone, kept): (Vec<Enemy>, Vec<Enemy>) =
                enemies.drain(..).partition(|e| marked.contains(&e.id));
            *enemies = kept;
            removed.extend(gone);
        }
        removed
    }

    /// Roll for a replacement of a destroyed formation enemy.
    ///
    /// The newcomer keeps the row, column and color, starts at the top of the
    /// screen above the destroyed enemy and slides down into its row.
    pub fn spawn_replacement(
        &mut self,
        destroyed: &Enemy,
        ids: &mut EntityIds,
        rolls: &mut impl Rolls,
    ) -> Option<EntityId> {
        if !rolls.chance(REPLACEMENT_PROBABILITY) {
            return None;
        }

        let mut enemy = Enemy::new(
            ids.next_id(),
            destroyed.color,
            destroyed.row(),
            destroyed.column(),
        );
        enemy.pos = Vec2::new(destroyed.pos.x, 0.0);
        enemy.behavior = EnemyBehavior::Entering;
        let id = enemy.id;

        match self.insert(enemy) {
            Ok(()) => {
                log::trace!("Replacement {} entering row {}", id, destroyed.row());
                Some(id)
            }
            Err(err) => {
                log::error!("Dropped replacement spawn: {}", err);
                None
            }
        }
    }
}
