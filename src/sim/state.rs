//! Session state and core simulation types
//!
//! One `SessionState` is one playthrough attempt of a single level. It is
//! replaced wholesale by the level generator on start, retry and advance.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Arena size; origin is the bottom-left corner, y points up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside the arena grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Fixed launch origin of the cannon
    pub fn cannon_origin(&self, cannon_height: f32) -> Vec2 {
        Vec2::new(self.width / 2.0, cannon_height)
    }
}

/// Error returned when an entity identity string is malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError(String);

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid entity id: {:?}", self.0)
    }
}

impl std::error::Error for ParseIdError {}

/// Target identity, derived from its grid cell (`c{row}-{col}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TargetId {
    pub row: u32,
    pub col: u32,
}

impl TargetId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}-{}", self.row, self.col)
    }
}

impl FromStr for TargetId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError(s.to_string());
        let (row, col) = s
            .strip_prefix('c')
            .and_then(|rest| rest.split_once('-'))
            .ok_or_else(err)?;
        Ok(Self {
            row: row.parse().map_err(|_| err())?,
            col: col.parse().map_err(|_| err())?,
        })
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TargetId {
    type Error = ParseIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Projectile identity (`p{n}`), monotonically increasing per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl FromStr for ProjectileId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('p')
            .and_then(|n| n.parse().ok())
            .map(ProjectileId)
            .ok_or_else(|| ParseIdError(s.to_string()))
    }
}

/// Identity of either entity kind, as named by the physics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Target(TargetId),
    Projectile(ProjectileId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Target(id) => write!(f, "{id}"),
            EntityId::Projectile(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('p') {
            s.parse().map(EntityId::Projectile)
        } else {
            s.parse().map(EntityId::Target)
        }
    }
}

impl From<TargetId> for EntityId {
    fn from(id: TargetId) -> Self {
        EntityId::Target(id)
    }
}

impl From<ProjectileId> for EntityId {
    fn from(id: ProjectileId) -> Self {
        EntityId::Projectile(id)
    }
}

/// A destructible circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub pos: Vec2,
    /// Constant drift; the physics layer owns motion after spawn
    pub vel: Vec2,
    pub radius: f32,
    /// Hits left before removal (always > 0 while stored)
    pub lives: u32,
}

/// A player-launched ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// What the physics layer needs to create a body for a new projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpawn {
    pub id: ProjectileId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl From<&Projectile> for ProjectileSpawn {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            pos: p.pos,
            vel: p.vel,
            radius: p.radius,
        }
    }
}

/// Why a session was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Clock ran out with targets alive
    Timeout,
    /// No balls left and nothing in flight
    OutOfBalls,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    Won,
    Lost(LossReason),
}

/// Values handed to the statistics collaborator when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub level: u32,
    /// Always 0 on a loss
    pub stars: u8,
    /// `max_time - time_remaining`, seconds
    pub time_used: f32,
    pub won: bool,
}

/// Presentation-facing events, drained by the host every frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ProjectileLaunched(ProjectileSpawn),
    TargetHit { id: TargetId, lives_left: u32 },
    TargetDestroyed { id: TargetId, pos: Vec2 },
    ProjectileRemoved(ProjectileId),
    SessionEnded(SessionReport),
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Level index (1-based)
    pub level: u32,
    pub bounds: Bounds,
    pub tuning: Tuning,
    pub balls_remaining: u32,
    /// Ammo the session started with
    pub max_balls: u32,
    pub time_remaining: f32,
    /// Time budget the session started with
    pub max_time: f32,
    /// Seconds played, accumulated in f64 so exact-budget deltas reach zero
    #[serde(default)]
    pub(crate) elapsed: f64,
    pub phase: SessionPhase,
    /// Star rating (0-3), only non-zero on a win
    pub stars: u8,
    /// Live targets, keyed by identity
    pub targets: BTreeMap<TargetId, Target>,
    /// Projectiles in flight, keyed by identity
    pub projectiles: BTreeMap<ProjectileId, Projectile>,
    /// Pending presentation events
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Last projectile identity handed out
    projectile_counter: u32,
}

impl SessionState {
    /// Empty, playing session; the level generator fills it in
    pub fn new(level: u32, bounds: Bounds, tuning: Tuning, balls: u32, time: f32) -> Self {
        Self {
            level,
            bounds,
            tuning,
            balls_remaining: balls,
            max_balls: balls,
            time_remaining: time,
            max_time: time,
            elapsed: 0.0,
            phase: SessionPhase::Playing,
            stars: 0,
            targets: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            events: Vec::new(),
            projectile_counter: 0,
        }
    }

    /// Allocate the next projectile identity (never reused within a session)
    pub fn next_projectile_id(&mut self) -> ProjectileId {
        self.projectile_counter += 1;
        ProjectileId(self.projectile_counter)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase != SessionPhase::Playing
    }

    #[inline]
    pub fn is_win(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    /// Seconds spent so far
    pub fn time_used(&self) -> f32 {
        (self.max_time - self.time_remaining).max(0.0)
    }

    /// Where shots are launched from
    pub fn cannon_origin(&self) -> Vec2 {
        self.bounds.cannon_origin(self.tuning.cannon_height)
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            level: self.level,
            stars: self.stars,
            time_used: self.time_used(),
            won: self.is_win(),
        }
    }

    /// Move to a terminal phase and emit the report. Only the first call
    /// per session has any effect.
    pub(crate) fn finish(&mut self, phase: SessionPhase, stars: u8) {
        if self.is_terminal() || phase == SessionPhase::Playing {
            return;
        }
        self.phase = phase;
        self.stars = if phase == SessionPhase::Won { stars } else { 0 };
        let report = self.report();
        log::info!(
            "Level {} ended: {:?}, {} stars, {:.1}s used",
            report.level,
            phase,
            report.stars,
            report.time_used
        );
        self.events.push(GameEvent::SessionEnded(report));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
