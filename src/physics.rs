//! Boundary to the external rigid-body engine
//!
//! The simulation never integrates motion or detects contacts itself. A host
//! plugs in whatever engine it renders with through [`PhysicsBackend`].
//! [`KinematicWorld`] is a small backend for headless runs and
//! tests: straight-line motion, elastic walls, targets bouncing off each
//! other and projectile contacts.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use crate::sim::{
    BodyUpdate, Bounds, EntityId, FrameFeedback, ProjectileId, ProjectileSpawn, SessionState,
    Target, TargetId,
};

/// What the simulation needs from a physics engine
pub trait PhysicsBackend {
    /// Create a solid body for a target
    fn spawn_target(&mut self, target: &Target);
    /// Create a body for a freshly launched projectile
    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn);
    /// Remove a body; unknown ids are ignored
    fn despawn(&mut self, id: EntityId);
    /// Remove every body
    fn clear(&mut self);
    /// Move the arena walls
    fn set_bounds(&mut self, bounds: Bounds);
    /// Integrate one step and report motion plus projectile->target contacts
    fn integrate(&mut self, dt: f32) -> FrameFeedback;

    /// Rebuild the world from a freshly generated session, walls included
    fn load_session(&mut self, session: &SessionState) {
        self.clear();
        self.set_bounds(session.bounds);
        for target in session.targets.values() {
            self.spawn_target(target);
        }
        for projectile in session.projectiles.values() {
            self.spawn_projectile(&ProjectileSpawn::from(projectile));
        }
    }
}

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Target,
    Projectile,
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
}

/// Constant-velocity stand-in for a real physics engine
#[derive(Debug, Clone)]
pub struct KinematicWorld {
    bounds: Bounds,
    /// Projectiles leave through the bottom edge instead of bouncing.
    /// Off by default: all four walls are solid.
    pub open_floor: bool,
    bodies: BTreeMap<EntityId, Body>,
    /// Projectile/target pairs overlapping last step (contacts fire on entry)
    touching: BTreeSet<(ProjectileId, TargetId)>,
}

impl KinematicWorld {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            open_floor: false,
            bodies: BTreeMap::new(),
            touching: BTreeSet::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bounce a body off the arena walls
    fn collide_walls(&self, body: &mut Body) {
        let r = body.radius;
        let walls = [
            (body.pos.x - r < 0.0, Vec2::X),
            (body.pos.x + r > self.bounds.width, -Vec2::X),
            (body.pos.y + r > self.bounds.height, -Vec2::Y),
            (
                body.pos.y - r < 0.0 && !(self.open_floor && body.kind == BodyKind::Projectile),
                Vec2::Y,
            ),
        ];
        for (hit, normal) in walls {
            if hit && body.vel.dot(normal) < 0.0 {
                body.vel = reflect_velocity(body.vel, normal);
            }
        }
    }

    /// Elastic bounce between overlapping targets of equal mass
    fn collide_targets(&mut self) {
        let targets: Vec<EntityId> = self
            .bodies
            .keys()
            .copied()
            .filter(|id| matches!(id, EntityId::Target(_)))
            .collect();
        for (i, a_id) in targets.iter().enumerate() {
            for b_id in &targets[i + 1..] {
                let (Some(a), Some(b)) = (self.bodies.get(a_id), self.bodies.get(b_id)) else {
                    continue;
                };
                let offset = b.pos - a.pos;
                if offset.length() >= a.radius + b.radius {
                    continue;
                }
                let normal = offset.normalize_or_zero();
                // exchange the normal components when closing
                let closing = (a.vel - b.vel).dot(normal);
                if closing <= 0.0 {
                    continue;
                }
                let impulse = closing * normal;
                if let Some(a) = self.bodies.get_mut(a_id) {
                    a.vel -= impulse;
                }
                if let Some(b) = self.bodies.get_mut(b_id) {
                    b.vel += impulse;
                }
            }
        }
    }
}

impl PhysicsBackend for KinematicWorld {
    fn spawn_target(&mut self, target: &Target) {
        self.bodies.insert(
            target.id.into(),
            Body {
                kind: BodyKind::Target,
                pos: target.pos,
                vel: target.vel,
                radius: target.radius,
            },
        );
    }

    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn) {
        self.bodies.insert(
            spawn.id.into(),
            Body {
                kind: BodyKind::Projectile,
                pos: spawn.pos,
                vel: spawn.vel,
                radius: spawn.radius,
            },
        );
    }

    fn despawn(&mut self, id: EntityId) {
        self.bodies.remove(&id);
        self.touching.retain(|(p, t)| EntityId::from(*p) != id && EntityId::from(*t) != id);
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.touching.clear();
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn integrate(&mut self, dt: f32) -> FrameFeedback {
        let ids: Vec<EntityId> = self.bodies.keys().copied().collect();
        for id in &ids {
            if let Some(mut body) = self.bodies.remove(id) {
                body.pos += body.vel * dt;
                self.collide_walls(&mut body);
                self.bodies.insert(*id, body);
            }
        }
        self.collide_targets();

        let mut contacts = Vec::new();
        let mut touching = BTreeSet::new();
        let projectiles: Vec<ProjectileId> = ids
            .iter()
            .filter_map(|id| match id {
                EntityId::Projectile(p) => Some(*p),
                EntityId::Target(_) => None,
            })
            .collect();
        let targets: Vec<(TargetId, Vec2, f32)> = self
            .bodies
            .iter()
            .filter_map(|(id, body)| match id {
                EntityId::Target(t) => Some((*t, body.pos, body.radius)),
                EntityId::Projectile(_) => None,
            })
            .collect();

        for projectile_id in projectiles {
            let Some(projectile) = self.bodies.get_mut(&EntityId::Projectile(projectile_id)) else {
                continue;
            };
            for &(target_id, target_pos, target_radius) in &targets {
                let offset = projectile.pos - target_pos;
                if offset.length() >= projectile.radius + target_radius {
                    continue;
                }
                let pair = (projectile_id, target_id);
                if !self.touching.contains(&pair) {
                    contacts.push(target_id);
                    let normal = offset.normalize_or_zero();
                    if projectile.vel.dot(normal) < 0.0 {
                        projectile.vel = reflect_velocity(projectile.vel, normal);
                    }
                }
                touching.insert(pair);
            }
        }
        self.touching = touching;

        let bodies = self
            .bodies
            .iter()
            .map(|(id, body)| BodyUpdate {
                id: *id,
                pos: body.pos,
                vel: body.vel,
            })
            .collect();

        FrameFeedback { bodies, contacts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> KinematicWorld {
        KinematicWorld::new(Bounds::new(400.0, 800.0))
    }

    fn target(pos: Vec2, vel: Vec2) -> Target {
        Target {
            id: TargetId::new(0, 0),
            pos,
            vel,
            radius: 28.0,
            lives: 1,
        }
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_target_bounces_off_wall() {
        let mut world = world();
        world.spawn_target(&target(Vec2::new(380.0, 400.0), Vec2::new(100.0, 0.0)));
        let feedback = world.integrate(0.1);
        assert_eq!(feedback.bodies.len(), 1);
        assert!(feedback.bodies[0].vel.x < 0.0);
    }

    #[test]
    fn test_projectile_contact_fires_once_per_overlap() {
        let mut world = world();
        world.spawn_target(&target(Vec2::new(200.0, 400.0), Vec2::ZERO));
        world.spawn_projectile(&ProjectileSpawn {
            id: ProjectileId(1),
            pos: Vec2::new(200.0, 355.0),
            vel: Vec2::new(0.0, 100.0),
            radius: 12.0,
        });

        let first = world.integrate(0.1);
        assert_eq!(first.contacts, vec![TargetId::new(0, 0)]);
        let bounced = first
            .bodies
            .iter()
            .find(|b| b.id == EntityId::Projectile(ProjectileId(1)))
            .unwrap();
        assert!(bounced.vel.y < 0.0);

        let second = world.integrate(0.01);
        assert!(second.contacts.is_empty());
    }

    #[test]
    fn test_floor_is_solid_unless_opened() {
        let mut world = world();
        world.spawn_projectile(&ProjectileSpawn {
            id: ProjectileId(1),
            pos: Vec2::new(200.0, 10.0),
            vel: Vec2::new(0.0, -100.0),
            radius: 12.0,
        });
        let feedback = world.integrate(0.1);
        assert!(feedback.bodies[0].vel.y > 0.0);

        let mut world = self::world();
        world.open_floor = true;
        world.spawn_projectile(&ProjectileSpawn {
            id: ProjectileId(1),
            pos: Vec2::new(200.0, 10.0),
            vel: Vec2::new(0.0, -100.0),
            radius: 12.0,
        });
        let feedback = world.integrate(0.1);
        assert!(feedback.bodies[0].vel.y < 0.0);
    }

    #[test]
    fn test_drifting_targets_bounce_off_each_other() {
        let mut world = world();
        let mut left = target(Vec2::new(150.0, 400.0), Vec2::new(50.0, 0.0));
        let mut right = target(Vec2::new(205.0, 400.0), Vec2::new(-50.0, 0.0));
        left.id = TargetId::new(0, 0);
        right.id = TargetId::new(0, 1);
        world.spawn_target(&left);
        world.spawn_target(&right);

        let feedback = world.integrate(0.1);
        assert!(feedback.contacts.is_empty());
        assert!(feedback.bodies[0].vel.x < 0.0);
        assert!(feedback.bodies[1].vel.x > 0.0);
    }

    #[test]
    fn test_load_session_and_despawn() {
        let session = crate::sim::generate_level(1, Bounds::new(400.0, 800.0), &Default::default());
        let mut world = world();
        world.load_session(&session);
        assert_eq!(world.body_count(), 6);
        world.despawn(TargetId::new(0, 0).into());
        world.despawn(ProjectileId(9).into());
        assert_eq!(world.body_count(), 5);
    }

    #[test]
    fn test_load_session_adopts_new_bounds() {
        let mut world = world();
        let bigger = Bounds::new(600.0, 900.0);
        let session = crate::sim::generate_level(2, bigger, &Default::default());
        world.load_session(&session);
        assert_eq!(world.bounds(), bigger);
    }
}
