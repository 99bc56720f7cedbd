use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gravity2d::{
    BodySize, CollisionPolicy, ColorMode, Pattern, ParticleStore, RingParams, ScatterParams,
    SimConfig, Simulation,
    constants::{
        DEFAULT_DT, DEFAULT_PARTICLES, DEFAULT_RESTITUTION, DENSITY, G, LOG_INTERVAL,
    },
    presets::Anchor,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// Uniform scatter with random velocities.
    Scatter,
    /// Scatter at rest around a heavy central anchor.
    Anchored,
    /// Circular orbits around a heavy central anchor.
    Ring,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Response {
    None,
    Merge,
    Elastic,
    Stick,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Palette {
    Linear,
    Rainbow,
    Hue,
}

/// Headless 2D gravity simulation. Runs a fixed number of steps and logs
/// statistics along the way.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = Layout::Anchored)]
    layout: Layout,
    /// Number of particles, anchor included.
    #[arg(short = 'n', long, default_value_t = DEFAULT_PARTICLES)]
    particles: usize,
    #[arg(long, default_value_t = 3600)]
    steps: u64,
    /// Fixed time step in seconds.
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f64,
    /// Gravitational constant.
    #[arg(short = 'g', long, default_value_t = G)]
    gravity: f64,
    #[arg(long, value_enum, default_value_t = Response::Merge)]
    collision: Response,
    /// Coefficient of restitution for elastic and stick responses.
    #[arg(long, default_value_t = DEFAULT_RESTITUTION)]
    restitution: f64,
    #[arg(long, value_enum, default_value_t = Palette::Linear)]
    color: Palette,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.dt.is_finite() && self.dt >= 0.0,
            "Time step must be finite and non-negative, got {}",
            self.dt
        );
        Ok(())
    }

    fn pattern(&self) -> Pattern {
        let scatter = ScatterParams::default();
        let center = scatter.min + (scatter.max - scatter.min) / 2.0;
        match self.layout {
            Layout::Scatter => Pattern::Scatter(scatter),
            Layout::Anchored => Pattern::Scatter(ScatterParams {
                max_speed: 0.0,
                size: BodySize::FromRadius {
                    min: 1.0,
                    max: 10.0,
                    density: DENSITY,
                },
                anchor: Some(Anchor::at(center)),
                ..scatter
            }),
            Layout::Ring => Pattern::Ring(RingParams {
                anchor: Anchor::at(center),
                gravity: self.gravity,
                ..Default::default()
            }),
        }
    }

    fn config(&self) -> SimConfig {
        let collision = match self.collision {
            Response::None => CollisionPolicy::None,
            Response::Merge => CollisionPolicy::Merge,
            Response::Elastic => CollisionPolicy::Elastic {
                restitution: self.restitution,
            },
            Response::Stick => CollisionPolicy::Stick {
                restitution: self.restitution,
            },
        };
        let color_mode = match self.color {
            Palette::Linear => ColorMode::Linear,
            Palette::Rainbow => ColorMode::Rainbow,
            Palette::Hue => ColorMode::Hue,
        };
        SimConfig {
            gravity: self.gravity,
            collision,
            color_mode,
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    args.validate()?;

    let store = ParticleStore::initialize(args.particles, &args.pattern(), args.seed)
        .context("Failed to initialize particles")?;
    let mut sim = Simulation::new(store, args.config()).context("Invalid configuration")?;
    log::info!("Start: {}", sim.stats());

    let start = Instant::now();
    let mut merges = 0;
    for tick in 1..=args.steps {
        let report = sim.step(args.dt);
        merges += report.collisions.merges;
        if tick % LOG_INTERVAL == 0 {
            log::info!("t = {}: {}", sim.elapsed(), sim.stats());
        }
    }

    log::info!(
        "Finished {} steps in {:?}, {} merges",
        args.steps,
        start.elapsed(),
        merges
    );
    log::info!("End: {}", sim.stats());
    Ok(())
}
