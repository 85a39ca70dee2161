// Shared visual/audio tuning constants. Kept free of platform APIs so the
// host-side tests can include them directly.

// Frame clock: one nominal display refresh at 60 Hz
pub const NOMINAL_FRAME_STEP: f32 = 0.016;

// Brain motion
pub const BRAIN_SPIN_PER_FRAME: f32 = 0.001; // radians around Y each frame
pub const BRAIN_WOBBLE_RATE: f32 = 0.3; // time multiplier for the X wobble
pub const BRAIN_WOBBLE_AMPLITUDE: f32 = 0.1; // radians

// Brain camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 8.0;
// Plane (world z) hit by the pointer ray
pub const MOUSE_PLANE_Z: f32 = 0.0;

// Particle camera
pub const PARTICLE_CAMERA_FOV_DEG: f32 = 75.0;
pub const PARTICLE_CAMERA_Z: f32 = 25.0;

// Region attribute buckets (by vertex x)
pub const REGION_LEFT_MAX_X: f32 = -0.3;
pub const REGION_RIGHT_MIN_X: f32 = 0.3;
pub const REGION_LEFT: f32 = 0.0;
pub const REGION_MID: f32 = 0.5;
pub const REGION_RIGHT: f32 = 1.0;

// Neural connection sampling
pub const CONNECTION_X_BAND: f32 = 0.2;
pub const CONNECTION_KEEP_PROBABILITY: f64 = 0.05;
pub const CONNECTION_COLOR_HEX: u32 = 0x00D9D9;
pub const CONNECTION_OPACITY: f32 = 0.3;

// Material
pub const COLOR_LEFT_HEX: u32 = 0x7A5AF8;
pub const COLOR_RIGHT_HEX: u32 = 0x00D9D9;
pub const COLOR_CORPUS_HEX: u32 = 0x00F0FF;
pub const METALNESS: f32 = 0.3;
pub const ROUGHNESS: f32 = 0.4;
pub const GLOW_INTENSITY: f32 = 1.5;
pub const LIGHT_POSITION: [f32; 3] = [5.0, 5.0, 5.0];
pub const TONE_MAPPING_EXPOSURE: f32 = 1.2;

// Lights: (hex color, intensity, range, position)
pub const AMBIENT_LIGHT: (u32, f32) = (0xFFFFFF, 0.3);
pub const POINT_LIGHTS: [(u32, f32, f32, [f32; 3]); 3] = [
    (0x7A5AF8, 2.0, 20.0, [5.0, 5.0, 5.0]),    // key
    (0x00D9D9, 1.5, 20.0, [-5.0, -3.0, 5.0]),  // fill
    (0x00F0FF, 1.0, 15.0, [0.0, 0.0, -5.0]),   // rim
];

// Procedural fallback brain
pub const HEMISPHERE_RADIUS: f32 = 1.5;
pub const HEMISPHERE_SEGMENTS: u32 = 64;
pub const HEMISPHERE_OFFSET_X: f32 = 0.4;
pub const CORPUS_RADIUS: f32 = 0.4;
pub const CORPUS_LENGTH: f32 = 2.5;
pub const CORPUS_SEGMENTS: u32 = 32;

// Particle field
pub const PARTICLE_COUNT: usize = 100_000;
pub const PARTICLE_VOLUME: f32 = 50.0; // edge length of the cube centred on the origin
// Per-channel color ranges as (min, span)
pub const PARTICLE_RED: (f32, f32) = (0.1, 0.4);
pub const PARTICLE_GREEN: (f32, f32) = (0.1, 0.8);
pub const PARTICLE_BLUE: (f32, f32) = (0.3, 0.6);
pub const PARTICLE_SIZE: f32 = 0.08; // sprite half-size in world units

// Post-processing
pub const BLOOM_THRESHOLD: f32 = 0.8;
pub const BLOOM_BOOST: f32 = 0.2;
pub const CHROMATIC_OFFSET: f32 = 0.006;
pub const DISTORTION_FREQUENCY: f32 = 10.0;
pub const DISTORTION_AMPLITUDE: f32 = 0.01;

// Renderer
pub const MSAA_SAMPLES: u32 = 4;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Audio
pub const ANALYSER_FFT_SIZE: u32 = 256;

// Animations
pub const HERO_CHAR_STAGGER_MS: i32 = 35;
pub const HERO_CHAR_START_OFFSET_PX: f32 = 40.0;
pub const LOADING_DELAY_MS: i32 = 2000;
pub const SCRUB_LAG_SEC: f32 = 1.0;
pub const CARD_REVEAL_OFFSET_PX: f32 = 100.0;

// Static assets
pub const MODEL_PATH: &str = "/models/brain.glb";
/// Directory holding `draco_decoder.js` for compressed meshes.
pub const DRACO_DECODER_PATH: &str = "/draco/";
pub const DRACO_DECODER_SCRIPT: &str = "draco_decoder.js";
pub const AUDIO_PATH: &str = "assets/audio/background.mp3";
