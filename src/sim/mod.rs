//! Session simulation module
//!
//! All gameplay decisions live here. This module must stay pure:
//! - No rendering, input or storage dependencies
//! - Motion and contact detection come from the physics layer as data
//! - Stable iteration order (entities keyed in ordered maps)

pub mod clock;
pub mod collision;
pub mod level;
pub mod outcome;
pub mod shot;
pub mod state;
pub mod tick;

pub use clock::advance_time;
pub use collision::{
    HitOutcome, cleanup_off_field, record_entity_update, record_hit, remove_projectile,
};
pub use level::{generate_level, grid_dimensions};
pub use outcome::{evaluate_outcome, star_rating};
pub use shot::request_shot;
pub use state::{
    Bounds, EntityId, GameEvent, LossReason, ParseIdError, Projectile, ProjectileId,
    ProjectileSpawn, SessionPhase, SessionReport, SessionState, Target, TargetId,
};
pub use tick::{BodyUpdate, FrameFeedback, Simulation, StepReport, step};
