use glam::Vec3;

use super::constants::{AMBIENT_LIGHT, POINT_LIGHTS};
use super::model::ModelOutcome;

/// Convert an sRGB hex color (0xRRGGBB) to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Vec3,
        intensity: f32,
    },
    Point {
        color: Vec3,
        intensity: f32,
        range: f32,
        position: Vec3,
    },
}

/// Main scene contents: lights plus the brain once its load resolves.
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub lights: Vec<Light>,
    model: Option<ModelOutcome>,
    disposed: bool,
}

impl SceneGraph {
    pub fn with_default_lights() -> Self {
        let mut lights = vec![Light::Ambient {
            color: srgb_hex_to_linear(AMBIENT_LIGHT.0),
            intensity: AMBIENT_LIGHT.1,
        }];
        lights.extend(POINT_LIGHTS.iter().map(|&(hex, intensity, range, pos)| Light::Point {
            color: srgb_hex_to_linear(hex),
            intensity,
            range,
            position: Vec3::from(pos),
        }));
        Self {
            lights,
            model: None,
            disposed: false,
        }
    }

    /// Returns false (and drops the model) if the scene was already disposed.
    pub fn install_model(&mut self, outcome: ModelOutcome) -> bool {
        if self.disposed {
            return false;
        }
        self.model = Some(outcome);
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release everything the scene holds. Returns how many geometries were
    /// released; repeated calls release nothing.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        self.lights.clear();
        self.model
            .take()
            .map(|m| m.model().geometry_count())
            .unwrap_or(0)
    }
}
