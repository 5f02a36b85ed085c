//! Collision resolver
//!
//! Detection belongs to the external physics engine. This module applies what
//! it reports: contact events cost a target one life, body updates overwrite
//! positions and velocities, and projectiles that left the arena are dropped.
//! Reports naming entities that no longer exist are ignored; they race with
//! removals made earlier in the same tick.

use glam::Vec2;

use super::state::{EntityId, GameEvent, ProjectileId, SessionState, TargetId};

/// Effect of a single contact event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown or already destroyed target, or the session is over
    Ignored,
    Damaged { lives_left: u32 },
    Destroyed,
}

/// Apply one "a projectile struck this target" contact
pub fn record_hit(state: &mut SessionState, id: TargetId) -> HitOutcome {
    if state.is_terminal() {
        return HitOutcome::Ignored;
    }
    let Some(target) = state.targets.get_mut(&id) else {
        return HitOutcome::Ignored;
    };

    target.lives = target.lives.saturating_sub(1);
    if target.lives > 0 {
        let lives_left = target.lives;
        log::debug!("Hit {}, {} lives left", id, lives_left);
        state.events.push(GameEvent::TargetHit { id, lives_left });
        return HitOutcome::Damaged { lives_left };
    }

    if let Some(target) = state.targets.remove(&id) {
        log::debug!("Destroyed {}, {} targets left", id, state.targets.len());
        state.events.push(GameEvent::TargetDestroyed { id, pos: target.pos });
    }
    HitOutcome::Destroyed
}

/// Overwrite an entity's motion with the physics engine's latest values.
/// Returns false if the entity is unknown.
pub fn record_entity_update(state: &mut SessionState, id: EntityId, pos: Vec2, vel: Vec2) -> bool {
    if state.is_terminal() {
        return false;
    }
    let motion = match id {
        EntityId::Target(id) => state.targets.get_mut(&id).map(|t| (&mut t.pos, &mut t.vel)),
        EntityId::Projectile(id) => state
            .projectiles
            .get_mut(&id)
            .map(|p| (&mut p.pos, &mut p.vel)),
    };
    match motion {
        Some((p, v)) => {
            *p = pos;
            *v = vel;
            true
        }
        None => false,
    }
}

/// Drop a projectile from the session. Returns false if it was not in flight.
pub fn remove_projectile(state: &mut SessionState, id: ProjectileId) -> bool {
    if state.is_terminal() || state.projectiles.remove(&id).is_none() {
        return false;
    }
    log::debug!("Removed {}", id);
    state.events.push(GameEvent::ProjectileRemoved(id));
    true
}

/// Remove every projectile outside the arena plus the off-field margin.
/// Returns the removed identities so the caller can despawn their bodies.
pub fn cleanup_off_field(state: &mut SessionState) -> Vec<ProjectileId> {
    if state.is_terminal() {
        return Vec::new();
    }
    let bounds = state.bounds;
    let margin = state.tuning.off_field_margin;
    let gone: Vec<ProjectileId> = state
        .projectiles
        .values()
        .filter(|p| !bounds.contains_with_margin(p.pos, margin))
        .map(|p| p.id)
        .collect();

    for &id in &gone {
        remove_projectile(state, id);
    }
    gone
}
