//! Fixed-step simulation tick
//!
//! One call advances every entity by one logical step. Collisions are
//! resolved mark-and-sweep: hits are collected while scanning and applied
//! afterwards, so no collection is mutated while it is being iterated and
//! the outcome of simultaneous overlaps is decided by scan order alone.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::{can_damage, collides};
use super::diving::{maybe_fire, maybe_trigger_dive, step_diver};
use super::rolls::Rolls;
use super::state::{Entity, EntityId, EntityKind, GameState, Owner, Projectile};
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held left
    pub move_left: bool,
    /// Held right
    pub move_right: bool,
    /// Fire one player projectile
    pub fire: bool,
}

impl TickInput {
    /// Fold intents that arrived since the last tick
    pub fn merge(&mut self, other: &TickInput) {
        self.move_left |= other.move_left;
        self.move_right |= other.move_right;
        self.fire |= other.fire;
    }
}

/// Outcome of the collision scan, applied after it completes
#[derive(Debug, Default)]
struct Marks {
    projectiles: HashSet<EntityId>,
    formation: HashSet<EntityId>,
    divers: HashSet<EntityId>,
    points: u64,
    player_hits: u32,
}

impl Marks {
    fn enemy_marked(&self, id: EntityId) -> bool {
        self.formation.contains(&id) || self.divers.contains(&id)
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, rolls: &mut impl Rolls) {
    state.removed.clear();

    if state.is_game_over() {
        return;
    }

    state.time_ticks += 1;

    apply_player_input(state, input);

    // Movement
    state.formation.march(state.screen.x);
    let target = state.player.pos;
    for diver in &mut state.divers {
        step_diver(diver, target, state.screen.y);
    }
    for projectile in &mut state.projectiles {
        projectile.advance();
    }

    // Collision scan
    let mut marks = Marks::default();
    resolve_projectile_hits(state, &mut marks);
    resolve_diver_contacts(state, &mut marks);
    mark_stray_projectiles(state, &mut marks);

    state.award(marks.points);
    for _ in 0..marks.player_hits {
        state.lose_life();
    }

    // Sweep
    state.projectiles.retain(|p| !marks.projectiles.contains(&p.id));
    state.divers.retain(|d| !marks.divers.contains(&d.id));
    let destroyed = state.formation.remove_marked(&marks.formation);

    let mut removed: Vec<EntityId> = marks
        .projectiles
        .iter()
        .chain(&marks.divers)
        .chain(&marks.formation)
        .copied()
        .collect();
    removed.sort_unstable();
    state.removed = removed;

    if state.is_game_over() {
        return;
    }

    // Behavioral triggers
    maybe_trigger_dive(&mut state.formation, &mut state.divers, rolls);
    let shots = maybe_fire(
        &state.divers,
        state.player.pos,
        &mut state.ids,
        rolls,
        state.screen.y,
    );
    state.projectiles.extend(shots);

    // Replacements, then level progression
    for enemy in &destroyed {
        state.formation.spawn_replacement(enemy, &mut state.ids, rolls);
    }

    check_fleet(state);
}

/// Move the player and spawn at most one player projectile
fn apply_player_input(state: &mut GameState, input: &TickInput) {
    if input.move_left {
        state.player.move_clamped(-PLAYER_STEP, state.screen.x);
    }
    if input.move_right {
        state.player.move_clamped(PLAYER_STEP, state.screen.x);
    }
    if input.fire {
        let shot = Projectile::new(
            state.ids.next_id(),
            state.player.muzzle(),
            Vec2::NEG_Y,
            PLAYER_PROJECTILE_SPEED,
            Owner::Player,
        );
        state.projectiles.push(shot);
    }
}

/// Projectile vs formation, divers and player.
///
/// A projectile stops at its first target and a target can only be
/// destroyed once per tick.
fn resolve_projectile_hits(state: &GameState, marks: &mut Marks) {
    for projectile in &state.projectiles {
        if can_damage(projectile.owner(), EntityKind::Enemy) {
            let formation_hit = state
                .formation
                .iter()
                .find(|e| !marks.enemy_marked(e.id) && collides(projectile, *e))
                .map(|e| e.id);
            if let Some(id) = formation_hit {
                marks.projectiles.insert(projectile.id);
                marks.formation.insert(id);
                marks.points += FORMATION_KILL_POINTS;
                continue;
            }

            let diver_hit = state
                .divers
                .iter()
                .find(|d| !marks.enemy_marked(d.id) && collides(projectile, *d))
                .map(|d| d.id);
            if let Some(id) = diver_hit {
                marks.projectiles.insert(projectile.id);
                marks.divers.insert(id);
                marks.points += DIVER_KILL_POINTS;
                continue;
            }
        }

        if can_damage(projectile.owner(), EntityKind::Player)
            && collides(projectile, &state.player)
        {
            marks.projectiles.insert(projectile.id);
            marks.player_hits += 1;
        }
    }
}

/// Divers ramming the player or leaving the bottom of the screen
fn resolve_diver_contacts(state: &GameState, marks: &mut Marks) {
    for diver in &state.divers {
        if marks.divers.contains(&diver.id) {
            continue;
        }
        if collides(diver, &state.player) {
            marks.divers.insert(diver.id);
            marks.player_hits += 1;
        } else if diver.pos.y > state.screen.y {
            marks.divers.insert(diver.id);
        }
    }
}

/// Projectiles that have left the play area entirely
fn mark_stray_projectiles(state: &GameState, marks: &mut Marks) {
    for projectile in &state.projectiles {
        if projectile.bounds().is_outside(state.screen.x, state.screen.y) {
            marks.projectiles.insert(projectile.id);
        }
    }
}

/// Rebuild the fleet once every row is empty
pub fn check_fleet(state: &mut GameState) -> bool {
    if !state.formation.is_empty() {
        return false;
    }

    state.fleets_destroyed += 1;
    match state.formation.build_fleet(&mut state.ids) {
        Ok(count) => {
            log::info!(
                "Fleet {} destroyed, {} enemies respawned",
                state.fleets_destroyed,
                count
            );
        }
        Err(err) => log::error!("Fleet respawn failed: {}", err),
    }
    true
}
