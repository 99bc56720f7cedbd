use cgmath::{InnerSpace, MetricSpace, Point2, Vector2, Vector3};

use crate::{
    error::{Error, Result},
    presets::{self, Pattern},
};

#[derive(Debug, Clone)]
pub struct Particle {
    pub name: String,
    pub pos: Point2<f64>,
    pub vel: Vector2<f64>,
    pub mass: f64,
    pub radius: f64,
    /// Derived from velocity after every step, never read by the physics.
    pub color: Vector3<f32>,
    pub(crate) active: bool,
    pub(crate) stuck_with: Option<usize>,
}

impl Particle {
    pub fn new(pos: Point2<f64>, vel: Vector2<f64>, mass: f64, radius: f64) -> Self {
        Self {
            name: String::new(),
            pos,
            vel,
            mass,
            radius,
            color: Vector3::new(1.0, 1.0, 1.0),
            active: true,
            stuck_with: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raw stuck relation. Prefer [`ParticleStore::partner`], which checks
    /// that the partner is still active.
    pub fn stuck_with(&self) -> Option<usize> {
        self.stuck_with
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.magnitude2()
    }

    pub fn contains(&self, point: Point2<f64>) -> bool {
        self.pos.distance2(point) <= self.radius * self.radius
    }
}

/// Fixed capacity collection of particles.
///
/// Slots are never removed or reordered, so an index handed out once keeps
/// pointing at the same body for the lifetime of the store. Bodies that merge
/// away are only marked inactive.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Fill `capacity` slots using the given layout. The same seed always
    /// yields the same layout.
    pub fn initialize(capacity: usize, pattern: &Pattern, seed: u64) -> Result<Self> {
        let particles = presets::generate(capacity, pattern, seed)?;
        let store = Self::from_particles(particles)?;
        log::info!(
            "Initialized {} particles ({} pattern, seed {seed})",
            store.len(),
            pattern.name()
        );
        Ok(store)
    }

    /// Take ownership of an explicit set of particles, checking every
    /// initialization invariant.
    pub fn from_particles(mut particles: Vec<Particle>) -> Result<Self> {
        for (index, p) in particles.iter_mut().enumerate() {
            if p.name.is_empty() {
                p.name = format!("Particle {}", index + 1);
            }
        }

        let store = Self { particles };
        store.validate()?;
        Ok(store)
    }

    /// Check every initialization invariant: positive finite mass and
    /// radius, finite state, and mutual stuck relations between active
    /// particles.
    pub fn validate(&self) -> Result<()> {
        for (index, p) in self.particles.iter().enumerate() {
            if !p.active {
                continue;
            }
            if !(p.mass.is_finite() && p.mass > 0.0) {
                return Err(Error::InvalidMass {
                    index,
                    mass: p.mass,
                });
            }
            if !(p.radius.is_finite() && p.radius > 0.0) {
                return Err(Error::InvalidRadius {
                    index,
                    radius: p.radius,
                });
            }
            if !(p.pos.x.is_finite()
                && p.pos.y.is_finite()
                && p.vel.x.is_finite()
                && p.vel.y.is_finite())
            {
                return Err(Error::NonFiniteState { index });
            }
            if let Some(partner) = p.stuck_with {
                let mutual = self
                    .particles
                    .get(partner)
                    .is_some_and(|o| partner != index && o.active && o.stuck_with == Some(index));
                if !mutual {
                    return Err(Error::InvalidStuckRelation { index, partner });
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Every slot, inactive ones included.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.particles.iter().enumerate().filter(|(_, p)| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    /// Mark a particle as gone. Its slot stays in place and any stuck
    /// relation is dropped on both sides. Returns false if it was already
    /// inactive.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn deactivate(&mut self, index: usize) -> bool {
        if !self.particles[index].active {
            return false;
        }
        self.unstick(index);
        self.particles[index].active = false;
        true
    }

    /// Record a mutual stuck relation. Both particles must be distinct,
    /// active and without a partner, otherwise nothing changes and
    /// [`Error::InvalidStuckRelation`] is returned.
    pub fn stick(&mut self, a: usize, b: usize) -> Result<()> {
        let free = |i: usize| {
            self.particles.get(i).is_some_and(|p| p.active) && self.partner(i).is_none()
        };
        if a == b || !free(a) || !free(b) {
            return Err(Error::InvalidStuckRelation {
                index: a,
                partner: b,
            });
        }
        self.particles[a].stuck_with = Some(b);
        self.particles[b].stuck_with = Some(a);
        Ok(())
    }

    /// Clear the stuck relation of `index` and of its partner, if any.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn unstick(&mut self, index: usize) {
        if let Some(partner) = self.particles[index].stuck_with.take() {
            if let Some(other) = self.particles.get_mut(partner) {
                if other.stuck_with == Some(index) {
                    other.stuck_with = None;
                }
            }
        }
    }

    /// Current partner of `index`, only if the relation still points at an
    /// active particle.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.particles[index]
            .stuck_with
            .filter(|&j| self.particles.get(j).is_some_and(|p| p.active))
    }

    /// Lowest index active particle whose disk contains `point`.
    pub fn pick(&self, point: Point2<f64>) -> Option<usize> {
        self.iter_active()
            .find(|(_, p)| p.contains(point))
            .map(|(i, _)| i)
    }
}
