//! Per-frame simulation step and session lifecycle
//!
//! The host calls [`Simulation::step`] once per render/physics tick with the
//! frame delta and whatever the physics engine reported. Ordering inside a
//! step is fixed:
//! 1. body positions/velocities
//! 2. queued contact events
//! 3. clock
//! 4. off-field projectile cleanup
//! 5. win, then out-of-balls loss

use std::collections::VecDeque;

use glam::Vec2;

use super::clock::advance_time;
use super::collision::{
    HitOutcome, cleanup_off_field, record_entity_update, record_hit, remove_projectile,
};
use super::level::generate_level;
use super::outcome::evaluate_outcome;
use super::shot::request_shot;
use super::state::{Bounds, EntityId, GameEvent, ProjectileId, ProjectileSpawn, SessionState, TargetId};
use crate::tuning::Tuning;

/// One body's motion after a physics integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyUpdate {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Everything the physics engine reported for one tick
#[derive(Debug, Clone, Default)]
pub struct FrameFeedback {
    pub bodies: Vec<BodyUpdate>,
    /// Targets struck by a projectile this tick (duplicates allowed)
    pub contacts: Vec<TargetId>,
}

/// Result of a single step, for despawning physics bodies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub destroyed_targets: Vec<TargetId>,
    pub removed_projectiles: Vec<ProjectileId>,
    /// The session became terminal during this step
    pub ended: bool,
}

/// Advance a session by one frame
pub fn step(state: &mut SessionState, feedback: &FrameFeedback, dt: f32) -> StepReport {
    step_with_contacts(state, &feedback.bodies, feedback.contacts.iter().copied(), dt)
}

fn step_with_contacts(
    state: &mut SessionState,
    bodies: &[BodyUpdate],
    contacts: impl IntoIterator<Item = TargetId>,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    if state.is_terminal() {
        return report;
    }

    for body in bodies {
        record_entity_update(state, body.id, body.pos, body.vel);
    }

    for id in contacts {
        if record_hit(state, id) == HitOutcome::Destroyed {
            report.destroyed_targets.push(id);
        }
    }

    advance_time(state, dt);

    report.removed_projectiles = cleanup_off_field(state);

    evaluate_outcome(state);

    report.ended = state.is_terminal();
    report
}

/// Owns the active session and drives it on behalf of the host.
///
/// Contact callbacks may arrive at any point during a tick; they are queued
/// with [`Simulation::queue_contact`] and consumed by the next step.
#[derive(Debug, Clone)]
pub struct Simulation {
    session: SessionState,
    start_level: u32,
    tuning: Tuning,
    pending_contacts: VecDeque<TargetId>,
    paused: bool,
}

impl Simulation {
    /// Start a session at `start_level`; restarts return to this level
    pub fn new(start_level: u32, bounds: Bounds, tuning: Tuning) -> Self {
        let start_level = start_level.max(1);
        Self {
            session: generate_level(start_level, bounds, &tuning),
            start_level,
            tuning,
            pending_contacts: VecDeque::new(),
            paused: false,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    /// Queue a "projectile struck target" contact for the next step
    pub fn queue_contact(&mut self, target: TargetId) {
        self.pending_contacts.push_back(target);
    }

    /// Apply a hit immediately, outside of step ordering. While paused the
    /// contact is queued for the first step after resume instead.
    pub fn record_hit(&mut self, target: TargetId) -> HitOutcome {
        if self.paused {
            self.queue_contact(target);
            return HitOutcome::Ignored;
        }
        record_hit(&mut self.session, target)
    }

    /// Apply a single body update immediately. Ignored while paused.
    pub fn record_entity_update(&mut self, id: EntityId, pos: Vec2, vel: Vec2) -> bool {
        !self.paused && record_entity_update(&mut self.session, id, pos, vel)
    }

    /// Advance the clock alone
    pub fn advance_time(&mut self, dt: f32) {
        if !self.paused {
            advance_time(&mut self.session, dt);
        }
    }

    pub fn remove_projectile(&mut self, id: ProjectileId) -> bool {
        !self.paused && remove_projectile(&mut self.session, id)
    }

    pub fn evaluate_outcome(&mut self) {
        if !self.paused {
            evaluate_outcome(&mut self.session);
        }
    }

    /// Fire from the cannon along `aim`. Rejected while paused.
    pub fn request_shot(&mut self, aim: Vec2) -> Option<ProjectileSpawn> {
        if self.paused {
            return None;
        }
        let origin = self.session.cannon_origin();
        request_shot(&mut self.session, origin, aim)
    }

    /// Run one frame. Does nothing while paused; queued contacts wait.
    pub fn step(&mut self, dt: f32, feedback: &FrameFeedback) -> StepReport {
        if self.paused {
            return StepReport::default();
        }
        let queued = std::mem::take(&mut self.pending_contacts);
        let contacts = queued.into_iter().chain(feedback.contacts.iter().copied());
        step_with_contacts(&mut self.session, &feedback.bodies, contacts, dt)
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused at {:.1}s remaining", self.session.time_remaining);
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed");
            self.paused = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Take the session's pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    /// Replay the current level
    pub fn reset_retry(&mut self) -> &SessionState {
        let level = self.session.level;
        let bounds = self.session.bounds;
        self.replace(level, bounds)
    }

    /// Move on to the following level
    pub fn reset_next(&mut self) -> &SessionState {
        let level = self.session.level.saturating_add(1);
        let bounds = self.session.bounds;
        self.replace(level, bounds)
    }

    /// Go back to the starting level, adopting new arena bounds
    pub fn reset_restart(&mut self, bounds: Bounds) -> &SessionState {
        self.replace(self.start_level, bounds)
    }

    fn replace(&mut self, level: u32, bounds: Bounds) -> &SessionState {
        self.session = generate_level(level, bounds, &self.tuning);
        self.pending_contacts.clear();
        self.paused = false;
        &self.session
    }
}
