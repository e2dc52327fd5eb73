//! Crowd separation for enemies.
//!
//! Enemies do not collide with each other. Instead, before the enemy pass,
//! a [`SeparationField`] is built from a snapshot of every live enemy and
//! each enemy receives a push-away vector from the neighbours it overlaps.
//! The enemy blends that vector into its own movement.
//!
//! The snapshot is taken once per tick, so the result does not depend on the
//! order in which enemies are updated.

use glam::Vec2;

use crate::entity::{Combatant, Enemy};
use crate::pool::{Handle, Pool};

/// Push strength for a full overlap between equal masses.
pub const SEPARATION_STRENGTH: f32 = 120.0;

#[derive(Debug, Clone, Copy)]
struct Body {
    handle: Handle,
    pos: Vec2,
    radius: f32,
    mass: f32,
}

/// Position snapshot of the live crowd for one tick.
#[derive(Debug, Clone, Default)]
pub struct SeparationField {
    bodies: Vec<Body>,
}

impl SeparationField {
    /// Snapshots every live, non-dead enemy.
    #[must_use]
    pub fn from_enemies(enemies: &Pool<Enemy>) -> Self {
        let bodies = enemies
            .iter()
            .filter(|(_, enemy)| !enemy.is_dead())
            .map(|(handle, enemy)| Body {
                handle,
                pos: enemy.pos,
                radius: enemy.radius,
                mass: enemy.mass,
            })
            .collect();
        Self { bodies }
    }

    /// Number of bodies in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Separation vector for the body `handle` at `pos` with `radius`.
    ///
    /// Sums one push per overlapping neighbour, pointing away from it,
    /// scaled by overlap depth (0 at touching, 1 at coincident centers) and
    /// by the neighbour's share of the combined mass. Coincident centers are
    /// split along the x axis by slot order.
    #[must_use]
    pub fn separation_for(&self, handle: Handle, pos: Vec2, radius: f32) -> Vec2 {
        let mass = self
            .bodies
            .iter()
            .find(|body| body.handle == handle)
            .map_or(1.0, |body| body.mass);

        let mut push = Vec2::ZERO;
        for other in &self.bodies {
            if other.handle == handle {
                continue;
            }
            let reach = radius + other.radius;
            let offset = pos - other.pos;
            let distance = offset.length();
            if distance >= reach || reach <= 0.0 {
                continue;
            }

            let away = if distance > f32::EPSILON {
                offset / distance
            } else if handle < other.handle {
                Vec2::NEG_X
            } else {
                Vec2::X
            };
            let overlap = (reach - distance) / reach;
            let total = mass + other.mass;
            let weight = if total > 0.0 { other.mass / total } else { 0.5 };
            push += away * overlap * weight * SEPARATION_STRENGTH;
        }
        push
    }

    /// Writes each enemy's separation vector. Dead enemies get zero.
    pub fn apply(&self, enemies: &mut Pool<Enemy>) {
        for (handle, enemy) in enemies.iter_mut() {
            enemy.separation = if enemy.is_dead() {
                Vec2::ZERO
            } else {
                self.separation_for(handle, enemy.pos, enemy.radius)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::config::StatTable;

    fn crowd(positions: &[Vec2]) -> Pool<Enemy> {
        let stats = StatTable::builtin();
        let mut pool: Pool<Enemy> = Pool::with_capacity(positions.len());
        for &pos in positions {
            let (_, enemy) = pool.acquire().unwrap();
            enemy.init("bomber", stats.enemy("bomber").unwrap(), pos, 1.0, &AssetCatalog::new());
        }
        pool
    }

    #[test]
    fn overlapping_pair_is_pushed_apart() {
        let mut pool = crowd(&[Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        SeparationField::from_enemies(&pool).apply(&mut pool);

        let pushes: Vec<Vec2> = pool.iter().map(|(_, e)| e.separation).collect();
        assert!(pushes[0].x < 0.0);
        assert!(pushes[1].x > 0.0);
        assert!((pushes[0] + pushes[1]).length() < 1e-4);
    }

    #[test]
    fn distant_enemies_get_no_push() {
        let mut pool = crowd(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);
        SeparationField::from_enemies(&pool).apply(&mut pool);
        assert!(pool.iter().all(|(_, e)| e.separation == Vec2::ZERO));
    }

    #[test]
    fn coincident_enemies_split() {
        let mut pool = crowd(&[Vec2::ZERO, Vec2::ZERO]);
        SeparationField::from_enemies(&pool).apply(&mut pool);

        let pushes: Vec<Vec2> = pool.iter().map(|(_, e)| e.separation).collect();
        assert!(pushes[0].x < 0.0);
        assert!(pushes[1].x > 0.0);
    }

    #[test]
    fn heavier_neighbour_pushes_harder() {
        let mut pool = crowd(&[Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        let handles = pool.handles();
        pool.get_mut(handles[1]).unwrap().mass = 3.0;
        SeparationField::from_enemies(&pool).apply(&mut pool);

        let light = pool.get(handles[0]).unwrap().separation.length();
        let heavy = pool.get(handles[1]).unwrap().separation.length();
        assert!(light > heavy);
    }

    #[test]
    fn dead_enemies_are_ignored() {
        let mut pool = crowd(&[Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        let handles = pool.handles();
        pool.get_mut(handles[1]).unwrap().take_damage(1000.0);

        let field = SeparationField::from_enemies(&pool);
        assert_eq!(field.len(), 1);
        field.apply(&mut pool);
        assert!(pool.iter().all(|(_, e)| e.separation == Vec2::ZERO));
    }
}
