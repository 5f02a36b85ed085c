//! Win/loss evaluation and star rating

use super::state::{LossReason, SessionPhase, SessionState};
use crate::tuning::Tuning;

/// Stars for a win with `remaining` of `max` seconds left.
/// Thresholds are strict: a ratio of exactly 0.6 earns 2 stars.
pub fn star_rating(remaining: f32, max: f32, tuning: &Tuning) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    let ratio = remaining / max;
    if ratio > tuning.three_star_ratio {
        3
    } else if ratio > tuning.two_star_ratio {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    }
}

/// Decide whether the session just ended. Safe to call every step.
///
/// Must run after off-field cleanup so a projectile still in the air keeps
/// an out-of-balls session alive.
pub fn evaluate_outcome(state: &mut SessionState) {
    if state.is_terminal() {
        return;
    }

    if state.targets.is_empty() {
        let stars = star_rating(state.time_remaining, state.max_time, &state.tuning);
        state.finish(SessionPhase::Won, stars);
        return;
    }

    if state.balls_remaining == 0 && state.projectiles.is_empty() {
        state.finish(SessionPhase::Lost(LossReason::OutOfBalls), 0);
    }
}
