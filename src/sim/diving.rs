//! Diving attackers
//!
//! Perimeter enemies occasionally break away from the formation, home in on
//! the player and fire aimed shots. Once low enough they stop steering and
//! drop straight off the bottom of the screen. Diving is one-way: a diver is
//! only ever removed, it never rejoins the grid.

use glam::Vec2;

use super::formation::Formation;
use super::rolls::Rolls;
use super::state::{Enemy, EnemyBehavior, EntityId, EntityIds, Owner, Projectile};
use crate::consts::*;

/// Unit vector from `from` toward `to`; zero when the points coincide
#[inline]
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// True while a diver is high enough to steer and shoot
#[inline]
pub fn above_floor(diver: &Enemy, screen_height: f32) -> bool {
    diver.distance_to_bottom(screen_height) > DIVE_FLOOR_DISTANCE
}

/// Move a diver one tick toward `target` (the player's live position)
pub fn step_diver(diver: &mut Enemy, target: Vec2, screen_height: f32) {
    if above_floor(diver, screen_height) {
        let dir = aim(diver.pos, target);
        diver.pos += dir * (ENEMY_SPEED / FORMATION_SPEED_DIVISOR);
    } else {
        diver.pos.y += ENEMY_SPEED;
    }
}

/// Roll the global dive trigger; on success one perimeter enemy leaves the
/// grid and joins `divers`.
pub fn maybe_trigger_dive(
    formation: &mut Formation,
    divers: &mut Vec<Enemy>,
    rolls: &mut impl Rolls,
) -> Option<EntityId> {
    if !rolls.chance(DIVE_PROBABILITY) {
        return None;
    }

    let candidates = formation.dive_candidates();
    if candidates.is_empty() {
        return None;
    }

    let slot = candidates[rolls.pick(candidates.len())];
    let mut diver = formation.take(slot)?;
    diver.behavior = EnemyBehavior::Diving;
    log::debug!(
        "Enemy {} dives from row {} column {}",
        diver.id,
        diver.row(),
        diver.column()
    );
    let id = diver.id;
    divers.push(diver);
    Some(id)
}

/// Shot from the bottom center of `diver` toward `target`, if still allowed to fire
pub fn fire_at(
    diver: &Enemy,
    target: Vec2,
    ids: &mut EntityIds,
    screen_height: f32,
) -> Option<Projectile> {
    if !above_floor(diver, screen_height) {
        return None;
    }

    let origin = Vec2::new(diver.pos.x + diver.size.x / 2.0, diver.pos.y + diver.size.y);
    Some(Projectile::new(
        ids.next_id(),
        origin,
        aim(diver.pos, target),
        ENEMY_PROJECTILE_SPEED,
        Owner::Enemy,
    ))
}

/// Independent fire roll for every diver
pub fn maybe_fire(
    divers: &[Enemy],
    target: Vec2,
    ids: &mut EntityIds,
    rolls: &mut impl Rolls,
    screen_height: f32,
) -> Vec<Projectile> {
    let mut shots = Vec::new();
    for diver in divers {
        if rolls.chance(DIVER_FIRE_PROBABILITY)
            && let Some(shot) = fire_at(diver, target, ids, screen_height)
        {
            log::trace!("Diver {} fires projectile {}", diver.id, shot.id);
            shots.push(shot);
        }
    }
    shots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ColorTag;
    use crate::sim::ScriptedRolls;

    fn diver_at(x: f32, y: f32) -> Enemy {
        let mut enemy = Enemy::new(100, ColorTag::Purple, 2, 1);
        enemy.pos = Vec2::new(x, y);
        enemy.behavior = EnemyBehavior::Diving;
        enemy
    }

    #[test]
    fn test_aim_normalizes_and_handles_zero() {
        let dir = aim(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert_eq!(aim(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }

    #[test]
    fn test_diver_homes_on_player() {
        let mut diver = diver_at(100.0, 100.0);
        let target = Vec2::new(400.0, 500.0);
        step_diver(&mut diver, target, SCREEN_HEIGHT);

        let moved = diver.pos - Vec2::new(100.0, 100.0);
        assert!((moved.length() - ENEMY_SPEED / FORMATION_SPEED_DIVISOR).abs() < 1e-5);
        assert!(moved.x > 0.0 && moved.y > 0.0);
        // Same heading as the target
        assert!(moved.normalize().dot(aim(Vec2::new(100.0, 100.0), target)) > 0.9999);
    }

    #[test]
    fn test_diver_on_player_does_not_nan() {
        let mut diver = diver_at(385.0, 100.0);
        step_diver(&mut diver, Vec2::new(385.0, 100.0), SCREEN_HEIGHT);
        assert_eq!(diver.pos, Vec2::new(385.0, 100.0));
    }

    #[test]
    fn test_diver_falls_straight_near_bottom() {
        // distance to bottom = 600 - 380 - 30 = 190
        let mut diver = diver_at(100.0, 380.0);
        step_diver(&mut diver, Vec2::new(700.0, 525.0), SCREEN_HEIGHT);
        assert_eq!(diver.pos.x, 100.0);
        assert!((diver.pos.y - (380.0 + ENEMY_SPEED)).abs() < 1e-5);
    }

    #[test]
    fn test_floor_threshold_is_exclusive() {
        // distance to bottom exactly 200
        let diver = diver_at(100.0, 370.0);
        assert!(!above_floor(&diver, SCREEN_HEIGHT));
        assert!(above_floor(&diver_at(100.0, 369.0), SCREEN_HEIGHT));
    }

    #[test]
    fn test_dive_trigger_moves_enemy_out_of_grid() {
        let mut ids = EntityIds::default();
        let mut formation = Formation::new();
        formation.build_fleet(&mut ids).unwrap();
        let mut divers = Vec::new();

        // Miss the 0.001 gate
        let mut rolls = ScriptedRolls::never().with_rolls([0.001]);
        assert!(maybe_trigger_dive(&mut formation, &mut divers, &mut rolls).is_none());
        assert_eq!(formation.len(), 46);

        // Hit it and pick the second candidate: last of row 0 (column 6)
        let mut rolls = ScriptedRolls::never().with_rolls([0.0009]).with_picks([1]);
        let id = maybe_trigger_dive(&mut formation, &mut divers, &mut rolls).unwrap();
        assert_eq!(formation.len(), 45);
        assert_eq!(divers.len(), 1);
        assert_eq!(divers[0].id, id);
        assert_eq!(divers[0].column(), 6);
        assert_eq!(divers[0].behavior, EnemyBehavior::Diving);
        assert!(formation.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_dive_trigger_with_empty_formation() {
        let mut formation = Formation::new();
        let mut divers = Vec::new();
        let mut rolls = ScriptedRolls::always();
        assert!(maybe_trigger_dive(&mut formation, &mut divers, &mut rolls).is_none());
        assert!(divers.is_empty());
    }

    #[test]
    fn test_diver_fire_aimed_at_player() {
        let mut ids = EntityIds::default();
        let diver = diver_at(100.0, 100.0);
        let target = Vec2::new(385.0, 525.0);

        let shot = fire_at(&diver, target, &mut ids, SCREEN_HEIGHT).unwrap();
        assert_eq!(shot.owner(), Owner::Enemy);
        assert_eq!(shot.speed, ENEMY_PROJECTILE_SPEED);
        assert_eq!(shot.pos, Vec2::new(112.5, 115.0));
        assert!((shot.direction - aim(diver.pos, target)).length() < 1e-6);
    }

    #[test]
    fn test_low_divers_never_fire() {
        let mut ids = EntityIds::default();
        let divers = vec![diver_at(100.0, 400.0), diver_at(300.0, 450.0)];
        let shots = maybe_fire(
            &divers,
            Vec2::new(385.0, 525.0),
            &mut ids,
            &mut ScriptedRolls::always(),
            SCREEN_HEIGHT,
        );
        assert!(shots.is_empty());
    }

    #[test]
    fn test_fire_rolls_per_diver() {
        let mut ids = EntityIds::default();
        let divers = vec![diver_at(100.0, 100.0), diver_at(300.0, 120.0)];
        let mut rolls = ScriptedRolls::never().with_rolls([0.5, 0.0002]);
        let target = Vec2::new(385.0, 525.0);
        let shots = maybe_fire(&divers, target, &mut ids, &mut rolls, SCREEN_HEIGHT);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].pos.x, 300.0 + 15.0 - 2.5);
    }
}
