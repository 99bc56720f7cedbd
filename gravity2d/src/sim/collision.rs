//! Overlap detection and the three collision responses.
//!
//! Pairs are visited in index order (`i < j`) after integration. A
//! configuration runs exactly one [`CollisionPolicy`]; a pair never gets
//! both a merge and an impulse.

use cgmath::{EuclideanSpace, InnerSpace, Point2};

use crate::{Particle, ParticleStore, sim::direct::potential_energy};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CollisionPolicy {
    /// Bodies pass through each other.
    None,
    /// Perfectly inelastic: the higher index body is absorbed by the lower
    /// index one, conserving mass and momentum.
    #[default]
    Merge,
    /// Impulse along the collision normal for closing pairs.
    Elastic { restitution: f64 },
    /// Bodies bounce once and stay bound until their kinetic energy exceeds
    /// the magnitude of their mutual potential energy.
    Stick { restitution: f64 },
}

impl CollisionPolicy {
    pub fn restitution(&self) -> Option<f64> {
        match *self {
            CollisionPolicy::Elastic { restitution } | CollisionPolicy::Stick { restitution } => {
                Some(restitution)
            }
            CollisionPolicy::None | CollisionPolicy::Merge => None,
        }
    }
}

/// What happened during one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub merges: usize,
    pub impulses: usize,
    pub stuck: usize,
    pub released: usize,
}

fn pair_mut(objects: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    assert_ne!(i, j);
    if i < j {
        let (head, tail) = objects.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = objects.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

pub fn overlapping(a: &Particle, b: &Particle) -> bool {
    let reach = a.radius + b.radius;
    (b.pos - a.pos).magnitude2() < reach * reach
}

/// Fold `absorbed` into `survivor` and deactivate it.
///
/// Position is the mass weighted average, velocity the momentum weighted
/// average, mass the sum and the new radius keeps the combined area.
pub fn merge(store: &mut ParticleStore, survivor: usize, absorbed: usize) {
    let (a, b) = pair_mut(store.particles_mut(), survivor, absorbed);
    debug_assert!(a.active && b.active);

    let total = a.mass + b.mass;
    a.pos = Point2::from_vec((a.pos.to_vec() * a.mass + b.pos.to_vec() * b.mass) / total);
    a.vel = (a.vel * a.mass + b.vel * b.mass) / total;
    a.mass = total;
    a.radius = (a.radius * a.radius + b.radius * b.radius).sqrt();

    log::debug!(
        "{} absorbed {}, mass now {:.3}",
        a.name,
        b.name,
        a.mass
    );
    store.deactivate(absorbed);
}

/// Two body impulse along the line of centers. Only applied while the pair
/// is closing; returns whether velocities changed.
pub fn apply_impulse(a: &mut Particle, b: &mut Particle, restitution: f64, epsilon: f64) -> bool {
    let rel_pos = b.pos - a.pos;
    let dist_sq = rel_pos.magnitude2();
    if dist_sq < epsilon || dist_sq == 0.0 {
        // No usable normal.
        return false;
    }
    let normal = rel_pos / dist_sq.sqrt();
    let vel_along_normal = (b.vel - a.vel).dot(normal);
    if vel_along_normal >= 0.0 {
        return false;
    }

    let j = -(1.0 + restitution) * vel_along_normal / (1.0 / a.mass + 1.0 / b.mass);
    let impulse = normal * j;
    a.vel -= impulse / a.mass;
    b.vel += impulse / b.mass;
    true
}

/// Release criterion for a stuck pair: combined kinetic energy strictly
/// greater than `G * m_a * m_b / d`.
pub fn should_release(a: &Particle, b: &Particle, gravity: f64) -> bool {
    a.kinetic_energy() + b.kinetic_energy() > potential_energy(a, b, gravity)
}

/// Check every stuck pair, dropping relations whose partner has gone and
/// unbinding pairs with enough energy to escape. Returns the released pairs.
pub fn release_stuck(store: &mut ParticleStore, gravity: f64) -> Vec<(usize, usize)> {
    let mut released = Vec::new();
    for i in 0..store.len() {
        if !store.particles()[i].active || store.particles()[i].stuck_with.is_none() {
            continue;
        }
        match store.partner(i) {
            // Partner has gone inactive.
            None => store.unstick(i),
            Some(j) if j > i => {
                let objects = store.particles();
                if should_release(&objects[i], &objects[j], gravity) {
                    log::debug!("{} and {} came unstuck", objects[i].name, objects[j].name);
                    store.unstick(i);
                    released.push((i, j));
                }
            }
            Some(_) => {}
        }
    }
    released
}

/// Apply `policy` to every overlapping active pair.
pub fn resolve(
    store: &mut ParticleStore,
    policy: CollisionPolicy,
    gravity: f64,
    epsilon: f64,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if policy == CollisionPolicy::None {
        return report;
    }

    let released = match policy {
        CollisionPolicy::Stick { .. } => release_stuck(store, gravity),
        _ => Vec::new(),
    };
    report.released = released.len();

    let n = store.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let objects = store.particles();
            // `i` only ever absorbs, it cannot be deactivated inside this loop.
            if !objects[i].active {
                break;
            }
            if !objects[j].active || !overlapping(&objects[i], &objects[j]) {
                continue;
            }

            match policy {
                CollisionPolicy::None => {}
                CollisionPolicy::Merge => {
                    merge(store, i, j);
                    report.merges += 1;
                }
                CollisionPolicy::Elastic { restitution } => {
                    let (a, b) = pair_mut(store.particles_mut(), i, j);
                    if apply_impulse(a, b, restitution, epsilon) {
                        report.impulses += 1;
                    }
                }
                CollisionPolicy::Stick { restitution } => {
                    // A pair released this pass stays apart until the next one.
                    if released.contains(&(i, j)) || store.stick(i, j).is_err() {
                        continue;
                    }
                    report.stuck += 1;
                    let (a, b) = pair_mut(store.particles_mut(), i, j);
                    log::debug!("{} stuck to {}", a.name, b.name);
                    if apply_impulse(a, b, restitution, epsilon) {
                        report.impulses += 1;
                    }
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use cgmath::Vector2;

    use super::*;

    fn body(x: f64, vx: f64, mass: f64, radius: f64) -> Particle {
        Particle::new(Point2::new(x, 0.0), Vector2::new(vx, 0.0), mass, radius)
    }

    fn store(objects: Vec<Particle>) -> ParticleStore {
        ParticleStore::from_particles(objects).unwrap()
    }

    #[test]
    fn touching_is_not_overlapping() {
        assert!(!overlapping(&body(0.0, 0.0, 1.0, 1.0), &body(2.0, 0.0, 1.0, 1.0)));
        assert!(overlapping(&body(0.0, 0.0, 1.0, 1.0), &body(1.9, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn merge_is_area_and_mass_preserving() {
        let mut s = store(vec![body(0.0, 0.0, 1.0, 3.0), body(4.0, 0.0, 3.0, 4.0)]);
        merge(&mut s, 0, 1);
        let a = &s.particles()[0];
        assert_eq!(a.mass, 4.0);
        assert_eq!(a.radius, 5.0);
        assert_eq!(a.pos, Point2::new(3.0, 0.0));
        assert!(!s.particles()[1].is_active());
    }

    #[test]
    fn separating_pair_gets_no_impulse() {
        let mut a = body(0.0, -1.0, 1.0, 1.0);
        let mut b = body(1.0, 1.0, 1.0, 1.0);
        assert!(!apply_impulse(&mut a, &mut b, 1.0, 1e-3));
        assert_eq!(a.vel, Vector2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vector2::new(1.0, 0.0));
    }

    #[test]
    fn inelastic_restitution_leaves_common_velocity() {
        let mut a = body(0.0, 2.0, 1.0, 1.0);
        let mut b = body(1.0, 0.0, 1.0, 1.0);
        assert!(apply_impulse(&mut a, &mut b, 0.0, 1e-3));
        assert!((a.vel - Vector2::new(1.0, 0.0)).magnitude() < 1e-12);
        assert!((b.vel - Vector2::new(1.0, 0.0)).magnitude() < 1e-12);
    }

    #[test]
    fn merge_chain_in_one_pass() {
        let mut s = store(vec![
            body(0.0, 0.0, 1.0, 1.0),
            body(1.0, 0.0, 1.0, 1.0),
            body(2.5, 0.0, 1.0, 1.0),
        ]);
        let report = resolve(&mut s, CollisionPolicy::Merge, 1.0, 1e-3);
        // 0 swallows 1, grows, then reaches 2.
        assert_eq!(report.merges, 2);
        assert_eq!(s.active_count(), 1);
        assert_eq!(s.particles()[0].mass, 3.0);
    }

    #[test]
    fn pass_through_policy_ignores_overlap() {
        let mut s = store(vec![body(0.0, 1.0, 1.0, 1.0), body(0.5, -1.0, 1.0, 1.0)]);
        let report = resolve(&mut s, CollisionPolicy::None, 1.0, 1e-3);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(s.active_count(), 2);
    }

    #[test]
    fn stick_binds_once_and_bounces_once() {
        let mut s = store(vec![body(0.0, 1.0, 1.0, 1.0), body(1.5, -1.0, 1.0, 1.0)]);
        let policy = CollisionPolicy::Stick { restitution: 0.0 };

        let report = resolve(&mut s, policy, 100.0, 1e-3);
        assert_eq!(report.stuck, 1);
        assert_eq!(report.impulses, 1);
        assert_eq!(s.partner(0), Some(1));
        assert_eq!(s.partner(1), Some(0));
        assert_eq!(s.particles()[0].vel, Vector2::new(0.0, 0.0));

        let report = resolve(&mut s, policy, 100.0, 1e-3);
        assert_eq!(report, CollisionReport::default());
    }

    #[test]
    fn third_body_does_not_steal_a_partner() {
        let mut s = store(vec![
            body(0.0, 0.0, 1.0, 1.0),
            body(1.0, 0.0, 1.0, 1.0),
            body(-1.0, 0.0, 1.0, 1.0),
        ]);
        let report = resolve(&mut s, CollisionPolicy::Stick { restitution: 1.0 }, 100.0, 1e-3);
        assert_eq!(report.stuck, 1);
        assert_eq!(s.partner(0), Some(1));
        assert_eq!(s.partner(2), None);
    }
}
