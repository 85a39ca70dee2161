// ===================== WebGPU rendering =====================

mod brain;
mod context;
mod helpers;
mod particles;
mod post;
mod targets;

pub use brain::BrainRenderer;
pub use context::GpuContext;
pub use particles::ParticleRenderer;
pub use post::PostProcessing;
