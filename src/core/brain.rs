use glam::{EulerRot, Mat4, Vec3};

use super::camera::Camera;
use super::constants::{
    BRAIN_SPIN_PER_FRAME, BRAIN_WOBBLE_AMPLITUDE, BRAIN_WOBBLE_RATE, COLOR_CORPUS_HEX,
    COLOR_LEFT_HEX, COLOR_RIGHT_HEX, GLOW_INTENSITY, LIGHT_POSITION, METALNESS,
    NOMINAL_FRAME_STEP, ROUGHNESS, TONE_MAPPING_EXPOSURE,
};
use super::scene::{srgb_hex_to_linear, Light};

pub const MAX_POINT_LIGHTS: usize = 3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightPacked {
    pub position_range: [f32; 4],
    pub color_intensity: [f32; 4],
}

/// Brain material uniform block; mirrors `BrainUniforms` in brain.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BrainUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub params: [f32; 4],          // time, morph, audio, scroll
    pub mouse_glow: [f32; 4],      // mouse xyz, glow intensity
    pub color_left: [f32; 4],      // rgb, metalness
    pub color_right: [f32; 4],     // rgb, roughness
    pub color_corpus: [f32; 4],    // rgb, exposure
    pub light_position: [f32; 4],
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],         // rgb * intensity
    pub point_lights: [PointLightPacked; MAX_POINT_LIGHTS],
}

/// Per-frame inputs of the brain scene. Event handlers write here; the frame
/// callback reads it once per refresh.
#[derive(Clone, Debug, Default)]
pub struct BrainState {
    time: f32,
    rotation_x: f32,
    rotation_y: f32,
    scroll_progress: f32,
    morph_progress: f32,
    audio_frequency: f32,
    mouse: Vec3,
}

impl BrainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.scroll_progress = clamp01(progress);
    }

    pub fn set_morph_progress(&mut self, progress: f32) {
        self.morph_progress = clamp01(progress);
    }

    pub fn set_mouse(&mut self, world: Vec3) {
        self.mouse = world;
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn morph_progress(&self) -> f32 {
        self.morph_progress
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    /// Advance one nominal frame: clock, spin, wobble, and the latest audio
    /// sample.
    pub fn advance(&mut self, audio_frequency: f32) {
        self.time += NOMINAL_FRAME_STEP;
        self.rotation_y += BRAIN_SPIN_PER_FRAME;
        self.rotation_x = (self.time * BRAIN_WOBBLE_RATE).sin() * BRAIN_WOBBLE_AMPLITUDE;
        self.audio_frequency = clamp01(audio_frequency);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation_x, self.rotation_y, 0.0)
    }

    pub fn uniforms(&self, camera: &Camera, lights: &[Light]) -> BrainUniforms {
        let left = srgb_hex_to_linear(COLOR_LEFT_HEX);
        let right = srgb_hex_to_linear(COLOR_RIGHT_HEX);
        let corpus = srgb_hex_to_linear(COLOR_CORPUS_HEX);
        let mut ambient = Vec3::ZERO;
        let mut points = [PointLightPacked::default(); MAX_POINT_LIGHTS];
        let mut n = 0;
        for light in lights {
            match light {
                Light::Ambient { color, intensity } => ambient += *color * *intensity,
                Light::Point {
                    color,
                    intensity,
                    range,
                    position,
                } if n < MAX_POINT_LIGHTS => {
                    points[n] = PointLightPacked {
                        position_range: position.extend(*range).to_array(),
                        color_intensity: color.extend(*intensity).to_array(),
                    };
                    n += 1;
                }
                // extra point lights beyond the uniform array are not shaded
                Light::Point { .. } => {}
            }
        }
        BrainUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: self.model_matrix().to_cols_array_2d(),
            params: [
                self.time,
                self.morph_progress,
                self.audio_frequency,
                self.scroll_progress,
            ],
            mouse_glow: self.mouse.extend(GLOW_INTENSITY).to_array(),
            color_left: left.extend(METALNESS).to_array(),
            color_right: right.extend(ROUGHNESS).to_array(),
            color_corpus: corpus.extend(TONE_MAPPING_EXPOSURE).to_array(),
            light_position: Vec3::from(LIGHT_POSITION).extend(1.0).to_array(),
            camera_position: camera.eye.extend(1.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
            point_lights: points,
        }
    }
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
