//! Brute force pairwise gravity.

use cgmath::{InnerSpace, MetricSpace, Vector2};

use crate::Particle;

/// Accelerations a pair imparts on each other, or `None` if they are closer
/// than `epsilon` (squared distance) and the interaction is dropped.
#[inline]
pub fn pair_accelerations(
    a: &Particle,
    b: &Particle,
    gravity: f64,
    epsilon: f64,
) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let rel = b.pos - a.pos;
    let mag_sq = rel.magnitude2();
    if mag_sq < epsilon || mag_sq == 0.0 {
        return None;
    }
    let force = gravity * a.mass * b.mass / mag_sq;
    let dir = rel / mag_sq.sqrt();
    Some((dir * (force / a.mass), -dir * (force / b.mass)))
}

/// Magnitude of the mutual gravitational potential energy, `G * m_a * m_b / d`.
/// Infinite when the bodies coincide.
pub fn potential_energy(a: &Particle, b: &Particle, gravity: f64) -> f64 {
    let dist = a.pos.distance(b.pos);
    if dist == 0.0 {
        return f64::INFINITY;
    }
    gravity * a.mass * b.mass / dist
}

/// Add the acceleration of every active pair into `out`, visiting each
/// unordered pair once and applying equal and opposite forces. Returns the
/// number of pairs skipped for being degenerate.
pub fn accumulate(
    objects: &[Particle],
    out_buffer: &mut [Vector2<f64>],
    gravity: f64,
    epsilon: f64,
) -> usize {
    debug_assert_eq!(objects.len(), out_buffer.len());
    let mut skipped = 0;

    for (i, obj) in objects.iter().enumerate() {
        if !obj.active {
            continue;
        }
        debug_assert!(obj.mass > 0.0, "active particle {i} has mass {}", obj.mass);

        for (j, other) in objects.iter().enumerate().skip(i + 1) {
            if !other.active {
                continue;
            }
            match pair_accelerations(obj, other, gravity, epsilon) {
                Some((acc_i, acc_j)) => {
                    out_buffer[i] += acc_i;
                    out_buffer[j] += acc_j;
                }
                None => skipped += 1,
            }
        }
    }

    skipped
}
