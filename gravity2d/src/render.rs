//! Flat per-particle data for a drawing collaborator.

use bytemuck::{Pod, Zeroable};

use crate::{Particle, ParticleStore};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub pos: [f32; 2],
    pub radius: f32,
    pub color: [f32; 3],
}

impl From<&Particle> for RenderInstance {
    fn from(obj: &Particle) -> Self {
        Self {
            pos: [obj.pos.x as f32, obj.pos.y as f32],
            radius: obj.radius as f32,
            color: obj.color.into(),
        }
    }
}

/// Instances for every active particle, in store order.
pub fn instances(store: &ParticleStore) -> Vec<RenderInstance> {
    store.iter_active().map(|(_, p)| p.into()).collect()
}

/// Raw bytes of `instances`, ready for a vertex buffer upload.
pub fn as_bytes(instances: &[RenderInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
