pub mod audio;
pub mod brain;
pub mod camera;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod lifecycle;
pub mod model;
pub mod particles;
pub mod post;
pub mod scene;
pub mod scheduler;
pub mod scroll;
pub mod shader;
pub mod text;

// Shaders bundled as string constants
pub static NOISE_WGSL: &str = include_str!("../../shaders/noise.wgsl");
pub static BRAIN_WGSL: &str = include_str!("../../shaders/brain.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");

/// Brain shader with the noise functions prepended.
pub fn brain_shader_source() -> String {
    shader::inject(NOISE_WGSL, BRAIN_WGSL)
}
