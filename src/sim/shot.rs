//! Shot controller: turns a drag gesture into a projectile

use glam::Vec2;

use super::state::{GameEvent, Projectile, ProjectileSpawn, SessionState};

/// Launch a projectile from `origin` along `aim`.
///
/// Returns `None` (and leaves ammo untouched) when the session is over, the
/// player is out of balls, or `aim` is too short to count as a drag.
pub fn request_shot(state: &mut SessionState, origin: Vec2, aim: Vec2) -> Option<ProjectileSpawn> {
    if state.is_terminal() || state.balls_remaining == 0 {
        return None;
    }

    let length = aim.length();
    if !length.is_finite() || length <= state.tuning.min_aim_length {
        log::debug!("Shot rejected: aim length {:.2}", length);
        return None;
    }

    state.balls_remaining -= 1;

    let projectile = Projectile {
        id: state.next_projectile_id(),
        pos: origin,
        vel: aim / length * state.tuning.launch_speed,
        radius: state.tuning.projectile_radius,
    };
    let spawn = ProjectileSpawn::from(&projectile);
    log::debug!(
        "Launched {} toward {:?}, {} balls left",
        projectile.id,
        spawn.vel,
        state.balls_remaining
    );
    state.projectiles.insert(projectile.id, projectile);
    state.events.push(GameEvent::ProjectileLaunched(spawn));
    Some(spawn)
}
