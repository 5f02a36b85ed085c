//! Circle Hit - a single-screen cannon arcade shooter
//!
//! Core modules:
//! - `sim`: Session simulation (levels, shots, hits, clock, outcome)
//! - `physics`: Boundary to the external rigid-body engine
//! - `tuning`: Data-driven game balance
//! - `autoplay`: Seeded demo player

pub mod autoplay;
pub mod physics;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default host frame step for the headless demo (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Ammo granted on every level before the level bonus
    pub const BASE_BALLS: u32 = 3;
    /// Time budget (seconds) on every level before the level bonus
    pub const BASE_TIME: f32 = 60.0;
    /// Extra seconds per level index
    pub const TIME_PER_LEVEL: f32 = 5.0;

    /// Entity radii
    pub const TARGET_RADIUS: f32 = 28.0;
    pub const PROJECTILE_RADIUS: f32 = 12.0;

    /// Projectile launch speed (units/s)
    pub const LAUNCH_SPEED: f32 = 700.0;
    /// Aim vectors this short or shorter are taps, not shots
    pub const MIN_AIM_LENGTH: f32 = 5.0;
    /// Projectiles beyond the arena plus this margin are removed
    pub const OFF_FIELD_MARGIN: f32 = 50.0;

    /// Cannon sits centered, this far above the bottom edge
    pub const CANNON_HEIGHT: f32 = 55.0;

    /// Target grid layout
    pub const BASE_COLUMNS: u32 = 3;
    pub const MAX_COLUMNS: u32 = 5;
    pub const BASE_ROWS: u32 = 2;
    pub const MAX_ROWS: u32 = 4;
    pub const GRID_PADDING: f32 = 50.0;
    pub const MIN_SPACING_X: f32 = 10.0;
    pub const SPACING_Y: f32 = 70.0;
    /// First row sits this far below the top edge (HUD room)
    pub const GRID_TOP_OFFSET: f32 = 180.0;

    /// Drift speed = DRIFT_BASE_SPEED + level * DRIFT_SPEED_PER_LEVEL
    pub const DRIFT_BASE_SPEED: f32 = 25.0;
    pub const DRIFT_SPEED_PER_LEVEL: f32 = 6.0;

    /// Remaining/max time ratio needed for 3 and 2 stars (strictly greater)
    pub const THREE_STAR_RATIO: f32 = 0.6;
    pub const TWO_STAR_RATIO: f32 = 0.3;
}
