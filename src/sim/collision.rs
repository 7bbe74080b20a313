//! Collision detection over axis-aligned bounds
//!
//! Geometry is pure and knows nothing about who fired what. Which pairs of
//! entity kinds may touch, and which owner may damage which target, are
//! answered by the two lookups below so the rules live in one place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind, Owner};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Overlap test; rectangles sharing an edge count as touching
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        a_max.x >= other.min.x
            && a_max.y >= other.min.y
            && self.min.x <= b_max.x
            && self.min.y <= b_max.y
    }

    /// True if no part of the rectangle lies inside `[0, width] x [0, height]`
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        let max = self.max();
        max.x < 0.0 || max.y < 0.0 || self.min.x > width || self.min.y > height
    }
}

/// Whether two entity kinds can ever register contact
pub fn kinds_can_touch(a: EntityKind, b: EntityKind) -> bool {
    !matches!(
        (a, b),
        (EntityKind::Enemy, EntityKind::Enemy) | (EntityKind::Projectile, EntityKind::Projectile)
    )
}

/// Whether a projectile fired by `owner` may damage an entity of kind `target`
pub fn can_damage(owner: Owner, target: EntityKind) -> bool {
    match owner {
        Owner::Player => target == EntityKind::Enemy,
        Owner::Enemy => target == EntityKind::Player,
    }
}

/// Kind-gated overlap between two entities
pub fn collides(a: &impl Entity, b: &impl Entity) -> bool {
    kinds_can_touch(a.kind(), b.kind()) && a.bounds().intersects(&b.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ColorTag, Enemy, Player, Projectile};
    use proptest::prelude::*;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        let mut enemy = Enemy::new(1, ColorTag::Red, 1, 2);
        enemy.pos = Vec2::new(x, y);
        enemy
    }

    #[test]
    fn test_bounds_overlap_and_miss() {
        let a = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Bounds::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Bounds::new(Vec2::new(20.0, 0.0), Vec2::new(5.0, 5.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounds_touching_edge() {
        let a = Bounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Bounds::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_bounds_outside_play_area() {
        let size = Vec2::new(5.0, 15.0);
        assert!(!Bounds::new(Vec2::new(100.0, 100.0), size).is_outside(800.0, 600.0));
        assert!(!Bounds::new(Vec2::new(100.0, -10.0), size).is_outside(800.0, 600.0));
        assert!(Bounds::new(Vec2::new(100.0, -16.0), size).is_outside(800.0, 600.0));
        assert!(Bounds::new(Vec2::new(801.0, 10.0), size).is_outside(800.0, 600.0));
        assert!(Bounds::new(Vec2::new(10.0, 601.0), size).is_outside(800.0, 600.0));
    }

    #[test]
    fn test_overlapping_enemies_never_collide() {
        let a = enemy_at(100.0, 100.0);
        let b = enemy_at(105.0, 105.0);
        assert!(a.bounds().intersects(&b.bounds()));
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_overlapping_projectiles_never_collide() {
        let a = Projectile::new(1, Vec2::new(50.0, 50.0), Vec2::NEG_Y, 0.5, Owner::Player);
        let b = Projectile::new(2, Vec2::new(51.0, 51.0), Vec2::Y, 0.2, Owner::Enemy);
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_player_collides_with_enemy_and_projectile() {
        let player = Player::default();
        let enemy = enemy_at(player.pos.x, player.pos.y);
        let origin = player.muzzle() + Vec2::new(0.0, 10.0);
        let shot = Projectile::new(3, origin, Vec2::Y, 0.2, Owner::Enemy);
        assert!(collides(&player, &enemy));
        assert!(collides(&player, &shot));
    }

    #[test]
    fn test_damage_rules() {
        assert!(can_damage(Owner::Player, EntityKind::Enemy));
        assert!(!can_damage(Owner::Player, EntityKind::Player));
        assert!(!can_damage(Owner::Player, EntityKind::Projectile));
        assert!(can_damage(Owner::Enemy, EntityKind::Player));
        assert!(!can_damage(Owner::Enemy, EntityKind::Enemy));
    }

    proptest! {
        #[test]
        fn prop_enemy_pairs_never_collide(
            x1 in -50.0f32..850.0, y1 in -50.0f32..650.0,
            x2 in -50.0f32..850.0, y2 in -50.0f32..650.0,
        ) {
            prop_assert!(!collides(&enemy_at(x1, y1), &enemy_at(x2, y2)));
        }

        #[test]
        fn prop_projectile_pairs_never_collide(
            x1 in -50.0f32..850.0, y1 in -50.0f32..650.0,
            x2 in -50.0f32..850.0, y2 in -50.0f32..650.0,
        ) {
            let a = Projectile::new(1, Vec2::new(x1, y1), Vec2::NEG_Y, 0.5, Owner::Player);
            let b = Projectile::new(2, Vec2::new(x2, y2), Vec2::Y, 0.2, Owner::Enemy);
            prop_assert!(!collides(&a, &b));
        }

        #[test]
        fn prop_intersects_is_symmetric(
            x1 in -100.0f32..100.0, y1 in -100.0f32..100.0,
            x2 in -100.0f32..100.0, y2 in -100.0f32..100.0,
            w in 1.0f32..60.0, h in 1.0f32..60.0,
        ) {
            let a = Bounds::new(Vec2::new(x1, y1), Vec2::new(w, h));
            let b = Bounds::new(Vec2::new(x2, y2), Vec2::new(h, w));
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
