//! Two dimensional gravitational N-body core.
//!
//! The crate owns the per-step physics: brute force pairwise gravity,
//! semi-implicit Euler integration and one configurable collision response
//! (merge, elastic bounce, or stick/unstick). Windowing, input and drawing
//! are left to the caller, which reads particle state between steps.

pub mod color;
pub mod constants;
pub mod error;
pub mod particles;
pub mod presets;
pub mod render;
pub mod sim;

pub use color::ColorMode;
pub use error::{Error, Result};
pub use particles::{Particle, ParticleStore};
pub use presets::{Anchor, BodySize, Pattern, RingParams, ScatterParams};
pub use render::RenderInstance;
pub use sim::{
    CollisionPolicy, CollisionReport, ElapsedTime, SimConfig, SimStats, Simulation, StepReport,
};
