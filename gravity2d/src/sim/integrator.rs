use cgmath::{Vector2, Zero};

use crate::Particle;

/// Semi-implicit Euler: velocity first, then position with the new velocity.
/// Consumes the accumulated accelerations and leaves the buffer zeroed.
pub fn integrate(objects: &mut [Particle], acc: &mut [Vector2<f64>], delta: f64) {
    debug_assert_eq!(objects.len(), acc.len());
    for (obj, acc) in objects.iter_mut().zip(acc.iter_mut()) {
        if obj.active {
            obj.vel += *acc * delta;
            obj.pos += obj.vel * delta;
        }
        // The buffer is reused for the next step.
        *acc = Vector2::zero();
    }
}
