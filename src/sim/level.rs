//! Procedural level generation
//!
//! Levels are a grid of circles anchored near the top of the arena. Grid size,
//! lives and drift all grow with the level index; nothing here is random.

use glam::Vec2;

use super::state::{Bounds, SessionState, Target, TargetId};
use crate::consts::*;
use crate::tuning::Tuning;

/// Grid size for a level as `(columns, rows)`
pub fn grid_dimensions(level: u32) -> (u32, u32) {
    let columns = (BASE_COLUMNS + level / 3).min(MAX_COLUMNS);
    let rows = (BASE_ROWS + level / 3).min(MAX_ROWS);
    (columns, rows)
}

/// Lives for the circle in a grid cell. Higher thresholds replace lower ones.
pub fn lives_for_cell(level: u32, row: u32, col: u32) -> u32 {
    if level >= 10 {
        2 + (row + col) % 2
    } else if level >= 6 {
        1 + (row + col + level) % 3
    } else if level >= 3 {
        1 + (row + col) % 2
    } else {
        1
    }
}

/// Horizontal drift for a grid cell. Every third diagonal moves from level 2,
/// direction alternating by column.
pub fn drift_for_cell(level: u32, row: u32, col: u32) -> Vec2 {
    if level < 2 || !(row + col).is_multiple_of(3) {
        return Vec2::ZERO;
    }
    let speed = DRIFT_BASE_SPEED + level as f32 * DRIFT_SPEED_PER_LEVEL;
    let direction = if col.is_multiple_of(2) { 1.0 } else { -1.0 };
    Vec2::new(speed * direction, 0.0)
}

/// Ammo for a level
pub fn balls_for_level(level: u32, tuning: &Tuning) -> u32 {
    tuning.base_balls.saturating_add(level / 2)
}

/// Time budget (seconds) for a level
pub fn time_for_level(level: u32, tuning: &Tuning) -> f32 {
    tuning.base_time + level as f32 * tuning.time_per_level
}

/// Build a fresh session for `level` inside `bounds`
pub fn generate_level(level: u32, bounds: Bounds, tuning: &Tuning) -> SessionState {
    let level = level.max(1);
    debug_assert!(bounds.width > 0.0 && bounds.height > 0.0);

    let (columns, rows) = grid_dimensions(level);
    let radius = tuning.target_radius;
    let size = radius * 2.0;

    let available_width = bounds.width - GRID_PADDING * 2.0;
    let gaps = columns.saturating_sub(1).max(1) as f32;
    let spacing_x = ((available_width - columns as f32 * size) / gaps).max(MIN_SPACING_X);
    let top_y = bounds.height - GRID_TOP_OFFSET;

    let balls = balls_for_level(level, tuning);
    let time = time_for_level(level, tuning);
    let mut state = SessionState::new(level, bounds, *tuning, balls, time);

    for row in 0..rows {
        for col in 0..columns {
            let id = TargetId::new(row, col);
            let pos = Vec2::new(
                GRID_PADDING + radius + col as f32 * (size + spacing_x),
                top_y - row as f32 * SPACING_Y,
            );
            state.targets.insert(
                id,
                Target {
                    id,
                    pos,
                    vel: drift_for_cell(level, row, col),
                    radius,
                    lives: lives_for_cell(level, row, col),
                },
            );
        }
    }

    log::info!(
        "Level {}: {}x{} grid, {} balls, {:.0}s",
        level,
        columns,
        rows,
        balls,
        time
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(400.0, 800.0)
    }

    #[test]
    fn test_level_one() {
        let state = generate_level(1, bounds(), &Tuning::default());
        assert_eq!(state.targets.len(), 6);
        assert!(state.targets.values().all(|t| t.lives == 1));
        assert!(state.targets.values().all(|t| t.vel == Vec2::ZERO));
        assert_eq!(state.balls_remaining, 3);
        assert_eq!(state.max_balls, 3);
        assert_eq!(state.max_time, 65.0);
        assert!(!state.is_terminal());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_level_ten() {
        let state = generate_level(10, bounds(), &Tuning::default());
        assert_eq!(grid_dimensions(10), (5, 4));
        assert_eq!(state.targets.len(), 20);
        for target in state.targets.values() {
            let expected = 2 + (target.id.row + target.id.col) % 2;
            assert_eq!(target.lives, expected);
            assert!(target.lives == 2 || target.lives == 3);
        }
        assert_eq!(state.balls_remaining, 3 + 5);
        assert_eq!(state.max_time, 60.0 + 50.0);
    }

    #[test]
    fn test_grid_caps() {
        assert_eq!(grid_dimensions(1), (3, 2));
        assert_eq!(grid_dimensions(3), (4, 3));
        assert_eq!(grid_dimensions(6), (5, 4));
        assert_eq!(grid_dimensions(40), (5, 4));
    }

    #[test]
    fn test_lives_thresholds_override() {
        assert_eq!(lives_for_cell(2, 0, 1), 1);
        assert_eq!(lives_for_cell(3, 0, 1), 2);
        assert_eq!(lives_for_cell(3, 1, 1), 1);
        // level 6: 1 + (0 + 0 + 6) % 3
        assert_eq!(lives_for_cell(6, 0, 0), 1);
        assert_eq!(lives_for_cell(7, 0, 0), 2);
        assert_eq!(lives_for_cell(8, 0, 0), 3);
        assert_eq!(lives_for_cell(10, 0, 0), 2);
        assert_eq!(lives_for_cell(10, 0, 1), 3);
    }

    #[test]
    fn test_drift_pattern() {
        assert_eq!(drift_for_cell(1, 0, 0), Vec2::ZERO);
        assert_eq!(drift_for_cell(2, 0, 0), Vec2::new(37.0, 0.0));
        // (1 + 2) is a multiple of 3, odd column moves left
        assert_eq!(drift_for_cell(2, 2, 1), Vec2::new(-37.0, 0.0));
        assert_eq!(drift_for_cell(2, 0, 1), Vec2::ZERO);
        let state = generate_level(5, bounds(), &Tuning::default());
        assert!(state.targets.values().all(|t| t.vel.y == 0.0));
    }

    #[test]
    fn test_layout_inside_arena() {
        let state = generate_level(1, bounds(), &Tuning::default());
        let first = &state.targets[&TargetId::new(0, 0)];
        assert_eq!(first.pos, Vec2::new(78.0, 620.0));
        let below = &state.targets[&TargetId::new(1, 0)];
        assert_eq!(below.pos.y, 550.0);
        // 400 - 100 - 3 * 56 = 132, over two gaps
        let second = &state.targets[&TargetId::new(0, 1)];
        assert_eq!(second.pos.x, 78.0 + 56.0 + 66.0);
    }

    #[test]
    fn test_narrow_arena_uses_min_spacing() {
        let state = generate_level(9, Bounds::new(200.0, 600.0), &Tuning::default());
        let a = &state.targets[&TargetId::new(0, 0)];
        let b = &state.targets[&TargetId::new(0, 1)];
        assert_eq!(b.pos.x - a.pos.x, 56.0 + MIN_SPACING_X);
    }

    #[test]
    fn test_huge_ammo_override_saturates() {
        let tuning = Tuning {
            base_balls: u32::MAX,
            ..Tuning::default()
        };
        assert_eq!(balls_for_level(10, &tuning), u32::MAX);
    }

    #[test]
    fn test_level_zero_clamped() {
        let state = generate_level(0, bounds(), &Tuning::default());
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_level(7, bounds(), &Tuning::default());
        let b = generate_level(7, bounds(), &Tuning::default());
        assert_eq!(a.targets, b.targets);
    }
}
