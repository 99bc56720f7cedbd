// PHYSICAL
/// Gravitational constant in simulation units (pixels, mass units, seconds).
pub const G: f64 = 0.07;
/// Pairs closer than this (squared distance) are skipped by the force engine.
pub const PAIR_EPSILON: f64 = 1e-3;
/// Density used when mass is derived from radius, mass units per unit radius.
pub const DENSITY: f64 = 5500.0;

// ANCHOR
/// Radius of the central anchor body.
pub const ANCHOR_RADIUS: f64 = 100.0;
/// Mass of the anchor per unit of radius.
pub const ANCHOR_MASS_PER_RADIUS: f64 = 1e6;

// SIMULATION
/// Fixed step used by the headless driver, one frame at 60 Hz.
pub const DEFAULT_DT: f64 = 1.0 / 60.0;
/// Default number of particles, anchor included.
pub const DEFAULT_PARTICLES: usize = 1000;
/// Default coefficient of restitution for impulse based responses.
pub const DEFAULT_RESTITUTION: f64 = 1.0;
/// Log statistics every this many steps.
pub const LOG_INTERVAL: u64 = 600;

// FIELD
/// Width of the default scatter field.
pub const FIELD_WIDTH: f64 = 1920.0;
/// Height of the default scatter field.
pub const FIELD_HEIGHT: f64 = 1080.0;
