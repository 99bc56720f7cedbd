use std::fmt::Display;

use cgmath::{Point2, Vector2, Zero};

use crate::{
    Particle, ParticleStore,
    color::ColorMode,
    constants::{G, PAIR_EPSILON},
    error::{Error, Result},
};

pub mod collision;
pub mod direct;
pub mod integrator;

pub use collision::{CollisionPolicy, CollisionReport};

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Gravitational constant.
    pub gravity: f64,
    /// Pairs with a squared distance below this are skipped by the force
    /// engine and get no collision impulse.
    pub pair_epsilon: f64,
    pub collision: CollisionPolicy,
    pub color_mode: ColorMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: G,
            pair_epsilon: PAIR_EPSILON,
            collision: CollisionPolicy::default(),
            color_mode: ColorMode::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "gravitational constant must be finite and non-negative, got {}",
                self.gravity
            )));
        }
        if !(self.pair_epsilon.is_finite() && self.pair_epsilon >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "pair epsilon must be finite and non-negative, got {}",
                self.pair_epsilon
            )));
        }
        if let Some(restitution) = self.collision.restitution() {
            if !(0.0..=1.0).contains(&restitution) {
                return Err(Error::InvalidConfig(format!(
                    "coefficient of restitution must be within [0, 1], got {restitution}"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub collisions: CollisionReport,
    /// Pairs dropped by the force engine for being too close.
    pub skipped_pairs: usize,
}

/// All mutable simulation state: particles, the pause flag, the selection
/// and the clock.
///
/// A step runs to completion before anything can observe the particles, so
/// readers only ever see the state after the last completed step.
pub struct Simulation {
    store: ParticleStore,
    config: SimConfig,
    out_buffer: Vec<Vector2<f64>>,
    paused: bool,
    selected: Option<usize>,
    following: bool,
    ticks: u64,
    time: f64,
}

impl Simulation {
    pub fn new(store: ParticleStore, config: SimConfig) -> Result<Self> {
        config.validate()?;
        store.validate()?;
        let out_buffer = vec![Vector2::zero(); store.len()];
        let mut sim = Self {
            store,
            config,
            out_buffer,
            paused: false,
            selected: None,
            following: false,
            ticks: 0,
            time: 0.0,
        };
        sim.recolor();
        Ok(sim)
    }

    /// Advance by `delta` seconds: gravity, integration, collisions, then
    /// colors. `delta` comes from the caller, a fixed step or the last frame
    /// time.
    pub fn step(&mut self, delta: f64) -> StepReport {
        assert!(
            delta.is_finite() && delta >= 0.0,
            "time step must be finite and non-negative, got {delta}"
        );

        let skipped_pairs = direct::accumulate(
            self.store.particles(),
            &mut self.out_buffer,
            self.config.gravity,
            self.config.pair_epsilon,
        );
        if skipped_pairs > 0 {
            log::trace!("Skipped {skipped_pairs} degenerate pairs");
        }
        integrator::integrate(self.store.particles_mut(), &mut self.out_buffer, delta);

        let collisions = collision::resolve(
            &mut self.store,
            self.config.collision,
            self.config.gravity,
            self.config.pair_epsilon,
        );

        self.recolor();
        self.ticks += 1;
        self.time += delta;

        StepReport {
            collisions,
            skipped_pairs,
        }
    }

    /// Step unless paused.
    pub fn tick(&mut self, delta: f64) -> Option<StepReport> {
        if self.paused {
            None
        } else {
            Some(self.step(delta))
        }
    }

    fn recolor(&mut self) {
        let mode = self.config.color_mode;
        for obj in self.store.particles_mut().iter_mut().filter(|p| p.active) {
            obj.color = mode.color_for(obj.vel);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Click at a world position. While following a particle this stops
    /// following and clears the selection; otherwise the particle under the
    /// point, if any, becomes selected and followed.
    pub fn click(&mut self, point: Point2<f64>) -> Option<usize> {
        if self.following {
            self.following = false;
            self.selected = None;
            return None;
        }
        self.selected = self.store.pick(point);
        self.following = self.selected.is_some();
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| self.store.get(i).is_some_and(Particle::is_active));
        self.following = self.following && self.selected.is_some();
    }

    pub fn set_following(&mut self, follow: bool) {
        self.following = follow && self.selected().is_some();
    }

    /// Selected particle index, if it is still active.
    pub fn selected(&self) -> Option<usize> {
        self.selected
            .filter(|&i| self.store.get(i).is_some_and(Particle::is_active))
    }

    pub fn selected_particle(&self) -> Option<&Particle> {
        self.selected().and_then(|i| self.store.get(i))
    }

    /// Particle the camera should track, if any.
    pub fn followed(&self) -> Option<&Particle> {
        if self.following {
            self.selected_particle()
        } else {
            None
        }
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds across all executed steps.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn elapsed(&self) -> ElapsedTime {
        compute_elapsed_time(self.time, self.ticks)
    }

    pub fn stats(&self) -> SimStats {
        let mut stats = SimStats::default();
        for (i, obj) in self.store.iter_active() {
            stats.active += 1;
            stats.total_mass += obj.mass;
            stats.momentum += obj.momentum();
            stats.kinetic_energy += obj.kinetic_energy();
            if self.store.partner(i).is_some_and(|j| j > i) {
                stats.stuck_pairs += 1;
            }
        }
        stats
    }
}

/// Aggregate state of the active particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimStats {
    pub active: usize,
    pub total_mass: f64,
    pub momentum: Vector2<f64>,
    pub kinetic_energy: f64,
    pub stuck_pairs: usize,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            active: 0,
            total_mass: 0.0,
            momentum: Vector2::zero(),
            kinetic_energy: 0.0,
            stuck_pairs: 0,
        }
    }
}

impl Display for SimStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "N = {}, mass = {:.1}, p = ({:.3}, {:.3}), KE = {:.3}, stuck = {}",
            self.active,
            self.total_mass,
            self.momentum.x,
            self.momentum.y,
            self.kinetic_energy,
            self.stuck_pairs
        )
    }
}

const SEC_PER_HOUR: f64 = 60.0 * 60.0;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ElapsedTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
    pub ticks: u64,
}

impl Display for ElapsedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0>2}:{:0>2}:{:05.2} ({} ticks)",
            self.hours, self.minutes, self.seconds, self.ticks
        )
    }
}

pub fn compute_elapsed_time(time_s: f64, ticks: u64) -> ElapsedTime {
    let mut time_s = time_s;

    let hours = (time_s / SEC_PER_HOUR).floor();
    time_s -= hours * SEC_PER_HOUR;
    let minutes = (time_s / 60.0).floor();
    let seconds = time_s - minutes * 60.0;

    ElapsedTime {
        hours: hours as u64,
        minutes: minutes as u64,
        seconds,
        ticks,
    }
}
