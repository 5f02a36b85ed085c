//! Session countdown

use super::state::{LossReason, SessionPhase, SessionState};

/// Advance the countdown by `dt` seconds.
///
/// Running out of time only loses the session while targets remain; an
/// empty field is left for the outcome evaluator to award as a win.
pub fn advance_time(state: &mut SessionState, dt: f32) {
    if state.is_terminal() {
        return;
    }
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid frame delta {}", dt);
        0.0
    };

    state.elapsed += f64::from(dt);
    let remaining = (f64::from(state.max_time) - state.elapsed).max(0.0);
    state.time_remaining = remaining as f32;

    if remaining <= 0.0 && !state.targets.is_empty() {
        state.finish(SessionPhase::Lost(LossReason::Timeout), 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::generate_level;
    use crate::sim::state::{Bounds, GameEvent};
    use crate::tuning::Tuning;

    fn session() -> SessionState {
        generate_level(1, Bounds::new(400.0, 800.0), &Tuning::default())
    }

    #[test]
    fn test_countdown_floors_at_zero() {
        let mut state = session();
        advance_time(&mut state, 10.0);
        assert_eq!(state.time_remaining, state.max_time - 10.0);
        advance_time(&mut state, 1000.0);
        assert_eq!(state.time_remaining, 0.0);
    }

    #[test]
    fn test_idle_timeout_loses_once() {
        let mut state = session();
        let budget = state.max_time;
        let mut elapsed = 0.0;
        while elapsed < budget + 1.0 {
            advance_time(&mut state, 0.5);
            elapsed += 0.5;
        }
        assert_eq!(state.phase, SessionPhase::Lost(LossReason::Timeout));
        assert_eq!(state.stars, 0);

        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
            .count();
        assert_eq!(ended, 1);

        advance_time(&mut state, 5.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_exact_budget_of_small_deltas_times_out() {
        for (dt, frames) in [(0.1, 650), (crate::consts::FRAME_DT, 3900), (1.0 / 30.0, 1950)] {
            let mut state = session();
            for _ in 0..frames - 1 {
                advance_time(&mut state, dt);
            }
            assert!(!state.is_terminal(), "dt {dt} ended a frame early");
            advance_time(&mut state, dt);
            assert_eq!(state.phase, SessionPhase::Lost(LossReason::Timeout), "dt {dt}");
            assert_eq!(state.time_remaining, 0.0);
        }
    }

    #[test]
    fn test_timeout_with_empty_field_is_not_a_loss() {
        let mut state = session();
        state.targets.clear();
        advance_time(&mut state, 1000.0);
        assert!(!state.is_terminal());
        assert_eq!(state.time_remaining, 0.0);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut state = session();
        advance_time(&mut state, -3.0);
        advance_time(&mut state, f32::NAN);
        assert_eq!(state.time_remaining, state.max_time);
    }
}
