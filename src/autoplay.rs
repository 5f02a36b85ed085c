//! Idle/demo player
//!
//! Picks a live target, leads it by its drift and fires on a fixed cadence.
//! Seeded, so two runs with the same seed make the same shots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::SessionState;

/// Seconds between shots
pub const FIRE_INTERVAL: f32 = 1.2;
/// Maximum horizontal aim error (units at the target)
pub const AIM_JITTER: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    cooldown: f32,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            cooldown: FIRE_INTERVAL,
        }
    }

    /// Wait a full interval before the next shot (call on session change)
    pub fn reset(&mut self) {
        self.cooldown = FIRE_INTERVAL;
    }

    /// Aim vector to fire this frame, if any
    pub fn aim(&mut self, session: &SessionState, dt: f32) -> Option<Vec2> {
        if session.is_terminal() || session.balls_remaining == 0 {
            return None;
        }
        self.cooldown -= dt;
        if self.cooldown > 0.0 || session.targets.is_empty() {
            return None;
        }
        self.cooldown = FIRE_INTERVAL;

        let index = self.rng.random_range(0..session.targets.len());
        let target = session.targets.values().nth(index)?;
        let origin = session.cannon_origin();

        // lead the drift by the projectile's travel time
        let travel = (target.pos - origin).length() / session.tuning.launch_speed;
        let jitter = Vec2::new(self.rng.random_range(-AIM_JITTER..=AIM_JITTER), 0.0);
        let aim = target.pos + target.vel * travel + jitter - origin;

        log::debug!("Autoplayer aiming at {} ({:?})", target.id, aim);
        Some(aim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bounds, generate_level};
    use crate::tuning::Tuning;

    fn session() -> SessionState {
        generate_level(4, Bounds::new(400.0, 800.0), &Tuning::default())
    }

    #[test]
    fn test_waits_for_cooldown() {
        let state = session();
        let mut player = Autoplayer::new(7);
        assert!(player.aim(&state, FIRE_INTERVAL / 2.0).is_none());
        assert!(player.aim(&state, FIRE_INTERVAL / 2.0).is_some());
        assert!(player.aim(&state, 0.1).is_none());
    }

    #[test]
    fn test_aims_upward_at_the_grid() {
        let state = session();
        let mut player = Autoplayer::new(7);
        let aim = player.aim(&state, FIRE_INTERVAL).unwrap();
        assert!(aim.y > 0.0);
        assert!(aim.length() > state.tuning.min_aim_length);
    }

    #[test]
    fn test_same_seed_same_shots() {
        let state = session();
        let mut a = Autoplayer::new(99);
        let mut b = Autoplayer::new(99);
        for _ in 0..10 {
            assert_eq!(a.aim(&state, FIRE_INTERVAL), b.aim(&state, FIRE_INTERVAL));
        }
    }

    #[test]
    fn test_idle_without_ammo() {
        let mut state = session();
        state.balls_remaining = 0;
        let mut player = Autoplayer::new(1);
        assert!(player.aim(&state, 10.0).is_none());
    }
}
