use rand::Rng;

use super::constants::{PARTICLE_BLUE, PARTICLE_COUNT, PARTICLE_GREEN, PARTICLE_RED, PARTICLE_VOLUME};

/// One point sprite: position then color, laid out for the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct ParticleConfig {
    pub count: usize,
    /// Edge length of the cube, centred on the origin, that holds every point.
    pub volume: f32,
    /// Per-channel (min, span) color ranges.
    pub color_ranges: [(f32, f32); 3],
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            volume: PARTICLE_VOLUME,
            color_ranges: [PARTICLE_RED, PARTICLE_GREEN, PARTICLE_BLUE],
        }
    }
}

impl ParticleConfig {
    pub fn half_extent(&self) -> f32 {
        self.volume * 0.5
    }
}

/// Fixed-size point cloud, generated once and never resized.
#[derive(Clone, Debug)]
pub struct ParticleField {
    instances: Vec<ParticleInstance>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Self {
        let mut instances = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let mut position = [0.0; 3];
            for p in &mut position {
                *p = (rng.gen::<f32>() - 0.5) * config.volume;
            }
            let mut color = [0.0; 3];
            for (c, &(min, span)) in color.iter_mut().zip(config.color_ranges.iter()) {
                *c = rng.gen::<f32>() * span + min;
            }
            instances.push(ParticleInstance { position, color });
        }
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }
}
