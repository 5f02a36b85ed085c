//! Circle Hit headless runner
//!
//! Plays sessions with the seeded autoplayer against the kinematic physics
//! backend and prints one JSON report per finished session.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use circle_hit::Tuning;
use circle_hit::autoplay::Autoplayer;
use circle_hit::physics::{KinematicWorld, PhysicsBackend};
use circle_hit::sim::{Bounds, GameEvent, Simulation};

#[derive(Debug, Parser)]
#[command(name = "circle-hit", about = "Headless Circle Hit autoplay")]
struct Args {
    /// Level to start from
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Stop after clearing this many levels
    #[arg(long, default_value_t = 3)]
    levels: u32,
    /// Attempts per level before giving up
    #[arg(long, default_value_t = 3)]
    attempts: u32,
    /// Autoplayer seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 400.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("arena must have a positive size, got {}x{}", args.width, args.height);
    }
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let bounds = Bounds::new(args.width, args.height);
    let dt = 1.0 / args.fps as f32;
    let mut sim = Simulation::new(args.level, bounds, tuning);
    let mut world = KinematicWorld::new(bounds);
    // wasted shots fall out so sessions can run out of balls
    world.open_floor = true;
    let mut player = Autoplayer::new(args.seed);
    world.load_session(sim.session());

    log::info!(
        "Circle Hit (headless) starting at level {}, {}x{} arena",
        sim.start_level(),
        args.width,
        args.height
    );

    let mut cleared = 0;
    let mut attempts = 1;
    while cleared < args.levels {
        let feedback = world.integrate(dt);
        let step = sim.step(dt, &feedback);
        for id in step.destroyed_targets {
            world.despawn(id.into());
        }
        for id in step.removed_projectiles {
            world.despawn(id.into());
        }

        if let Some(spawn) = player
            .aim(sim.session(), dt)
            .and_then(|aim| sim.request_shot(aim))
        {
            world.spawn_projectile(&spawn);
        }

        for event in sim.drain_events() {
            if let GameEvent::SessionEnded(report) = event {
                println!("{}", serde_json::to_string(&report)?);
            }
        }

        if !step.ended {
            continue;
        }
        if sim.session().is_win() {
            cleared += 1;
            attempts = 1;
            if cleared < args.levels {
                sim.reset_next();
            }
        } else if attempts < args.attempts {
            attempts += 1;
            sim.reset_retry();
        } else {
            log::warn!(
                "Giving up on level {} after {} attempts",
                sim.session().level,
                attempts
            );
            break;
        }
        world.load_session(sim.session());
        player.reset();
    }

    log::info!("Cleared {} of {} levels", cleared, args.levels);
    Ok(())
}
