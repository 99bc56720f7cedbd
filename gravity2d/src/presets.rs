use std::f64::consts::TAU;

use cgmath::{EuclideanSpace, Point2, Vector2};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Particle,
    constants::{ANCHOR_MASS_PER_RADIUS, ANCHOR_RADIUS, DENSITY, FIELD_HEIGHT, FIELD_WIDTH, G},
    error::{Error, Result},
};

/// Heavy body reserved at index 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub pos: Point2<f64>,
    pub radius: f64,
    pub mass: f64,
}

impl Anchor {
    /// Anchor with the default size, mass proportional to radius.
    pub fn at(pos: Point2<f64>) -> Self {
        Self {
            pos,
            radius: ANCHOR_RADIUS,
            mass: ANCHOR_RADIUS * ANCHOR_MASS_PER_RADIUS,
        }
    }

    fn particle(&self) -> Particle {
        Particle::new(self.pos, Vector2::new(0.0, 0.0), self.mass, self.radius).with_name("Anchor")
    }
}

/// How mass and radius of a generated body relate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodySize {
    /// Mass drawn uniformly from `[min, max]`, radius is `sqrt(mass)`.
    FromMass { min: f64, max: f64 },
    /// Radius drawn uniformly from `[min, max]`, mass is `radius * density`.
    FromRadius { min: f64, max: f64, density: f64 },
}

impl BodySize {
    fn validate(&self) -> Result<()> {
        match *self {
            BodySize::FromMass { min, max } => check_range("mass", min, max, true),
            BodySize::FromRadius { min, max, density } => {
                check_range("radius", min, max, true)?;
                check_range("density", density, density, true)
            }
        }
    }

    /// Returns `(mass, radius)`.
    fn sample(&self, rng: &mut StdRng) -> (f64, f64) {
        match *self {
            BodySize::FromMass { min, max } => {
                let mass = rng.random_range(min..=max);
                (mass, mass.sqrt())
            }
            BodySize::FromRadius { min, max, density } => {
                let radius = rng.random_range(min..=max);
                (radius * density, radius)
            }
        }
    }
}

/// Bodies scattered uniformly over a rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterParams {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
    /// Each velocity component is drawn from `[-max_speed, max_speed]`.
    /// Zero gives bodies at rest.
    pub max_speed: f64,
    pub size: BodySize,
    pub anchor: Option<Anchor>,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            min: Point2::new(0.0, 0.0),
            max: Point2::new(FIELD_WIDTH, FIELD_HEIGHT),
            max_speed: 5.0,
            size: BodySize::FromMass { min: 1.0, max: 10.0 },
            anchor: None,
        }
    }
}

/// Bodies on circular orbits in an annulus around an anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RingParams {
    pub anchor: Anchor,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub size: BodySize,
    /// Gravitational constant the orbital speeds are sized for. Should match
    /// the one the simulation runs with.
    pub gravity: f64,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            anchor: Anchor::at(Point2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0)),
            inner_radius: 300.0,
            outer_radius: 500.0,
            size: BodySize::FromRadius {
                min: 1.0,
                max: 10.0,
                density: DENSITY,
            },
            gravity: G,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Scatter(ScatterParams),
    Ring(RingParams),
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Scatter(_) => "scatter",
            Pattern::Ring(_) => "ring",
        }
    }
}

fn check_range(what: &'static str, min: f64, max: f64, positive: bool) -> Result<()> {
    let ok = min.is_finite() && max.is_finite() && min <= max && (!positive || min > 0.0);
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidRange { what, min, max })
    }
}

fn check_anchor(anchor: &Anchor) -> Result<()> {
    if !(anchor.mass.is_finite() && anchor.mass > 0.0) {
        return Err(Error::InvalidMass {
            index: 0,
            mass: anchor.mass,
        });
    }
    if !(anchor.radius.is_finite() && anchor.radius > 0.0) {
        return Err(Error::InvalidRadius {
            index: 0,
            radius: anchor.radius,
        });
    }
    Ok(())
}

/// Produce exactly `capacity` particles laid out by `pattern`.
pub fn generate(capacity: usize, pattern: &Pattern, seed: u64) -> Result<Vec<Particle>> {
    let mut rng = StdRng::seed_from_u64(seed);
    match pattern {
        Pattern::Scatter(params) => scatter(capacity, params, &mut rng),
        Pattern::Ring(params) => ring(capacity, params, &mut rng),
    }
}

fn scatter(capacity: usize, params: &ScatterParams, rng: &mut StdRng) -> Result<Vec<Particle>> {
    check_range("x", params.min.x, params.max.x, false)?;
    check_range("y", params.min.y, params.max.y, false)?;
    check_range("speed", 0.0, params.max_speed, false)?;
    params.size.validate()?;

    let mut objs = Vec::with_capacity(capacity);
    if let Some(anchor) = &params.anchor {
        check_anchor(anchor)?;
        if capacity == 0 {
            return Err(Error::NoRoomForAnchor);
        }
        objs.push(anchor.particle());
    }

    while objs.len() < capacity {
        let pos = Point2::new(
            rng.random_range(params.min.x..=params.max.x),
            rng.random_range(params.min.y..=params.max.y),
        );
        let vel = Vector2::new(
            rng.random_range(-params.max_speed..=params.max_speed),
            rng.random_range(-params.max_speed..=params.max_speed),
        );
        let (mass, radius) = params.size.sample(rng);
        objs.push(Particle::new(pos, vel, mass, radius));
    }

    Ok(objs)
}

fn ring(capacity: usize, params: &RingParams, rng: &mut StdRng) -> Result<Vec<Particle>> {
    check_anchor(&params.anchor)?;
    check_range("orbit radius", params.inner_radius, params.outer_radius, true)?;
    check_range("gravity", 0.0, params.gravity, false)?;
    params.size.validate()?;
    if capacity == 0 {
        return Err(Error::NoRoomForAnchor);
    }

    let anchor = &params.anchor;
    let n_bodies = capacity - 1;
    let mut objs = Vec::with_capacity(capacity);
    objs.push(anchor.particle());

    for i in 0..n_bodies {
        let angle = TAU * (i as f64) / (n_bodies as f64);
        let orbit = rng.random_range(params.inner_radius..=params.outer_radius);
        let dir = Vector2::new(angle.cos(), angle.sin());
        let pos = anchor.pos + dir * orbit;

        // Speed of a circular orbit around the anchor alone.
        let vel_basis = (params.gravity * anchor.mass / orbit).sqrt();
        let vel = Vector2::new(-dir.y, dir.x) * vel_basis;

        let (mass, radius) = params.size.sample(rng);
        objs.push(Particle::new(pos, vel, mass, radius));
    }

    Ok(objs)
}

/// Two bodies on a head-on course, handy for exercising collision responses.
pub fn head_on_pair(separation: f64, speed: f64, mass: f64, radius: f64) -> Vec<Particle> {
    let half = Vector2::new(separation / 2.0, 0.0);
    let center = Point2::origin();
    vec![
        Particle::new(center - half, Vector2::new(speed, 0.0), mass, radius),
        Particle::new(center + half, Vector2::new(-speed, 0.0), mass, radius),
    ]
}
