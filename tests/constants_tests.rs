// Host-side tests for constants, their relationships, and the shader sources
// that bake some of them in.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}
mod shader {
    include!("../src/core/shader.rs");
}

use constants::*;
use core_constants::*;

const NOISE_WGSL: &str = include_str!("../shaders/noise.wgsl");
const BRAIN_WGSL: &str = include_str!("../shaders/brain.wgsl");
const POST_WGSL: &str = include_str!("../shaders/post.wgsl");
const PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // Time and motion should be positive
    assert!(NOMINAL_FRAME_STEP > 0.0);
    assert!(BRAIN_SPIN_PER_FRAME > 0.0);
    assert!(SCRUB_LAG_SEC > 0.0);

    // Material factors are unit-range
    assert!((0.0..=1.0).contains(&METALNESS));
    assert!((0.0..=1.0).contains(&ROUGHNESS));
    assert!((0.0..=1.0).contains(&CONNECTION_OPACITY));
    assert!(CONNECTION_KEEP_PROBABILITY > 0.0 && CONNECTION_KEEP_PROBABILITY < 1.0);

    // Particle colors never exceed full intensity
    for (min, span) in [PARTICLE_RED, PARTICLE_GREEN, PARTICLE_BLUE] {
        assert!(min >= 0.0 && min + span <= 1.0);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_have_logical_relationships() {
    // The mid band sits between the hemisphere buckets
    assert!(REGION_LEFT_MAX_X < 0.0 && REGION_RIGHT_MIN_X > 0.0);
    assert!(REGION_LEFT < REGION_MID && REGION_MID < REGION_RIGHT);
    assert!(CONNECTION_X_BAND < REGION_RIGHT_MIN_X);

    // Hemispheres overlap at the midline
    assert!(HEMISPHERE_OFFSET_X < HEMISPHERE_RADIUS);
    assert!(CORPUS_RADIUS < HEMISPHERE_RADIUS);

    // Both cameras see their content
    assert!(CAMERA_NEAR < CAMERA_Z && CAMERA_Z < CAMERA_FAR);
    assert!(PARTICLE_CAMERA_Z > PARTICLE_VOLUME * 0.5);

    // Analyser size is a power of two, as WebAudio requires
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!(MSAA_SAMPLES == 1 || MSAA_SAMPLES == 4);
}

#[test]
fn post_shader_matches_effect_constants() {
    let has = |needle: String| assert!(POST_WGSL.contains(&needle), "missing {}", needle);
    has(format!("brightness > {:?}", BLOOM_THRESHOLD));
    has(format!("brightness * {:?}", BLOOM_BOOST));
    has(format!("vec2<f32>({:?}, 0.0)", CHROMATIC_OFFSET));
    has(format!("in.uv.y * {:?}) * {:?}", DISTORTION_FREQUENCY, DISTORTION_AMPLITUDE));
    for entry in ["fs_copy", "fs_bloom", "fs_chromatic", "fs_distortion", "vs_fullscreen"] {
        assert!(POST_WGSL.contains(&format!("fn {}(", entry)), "{}", entry);
    }
}

#[test]
fn connection_color_is_baked_into_line_shader() {
    let g = srgb_to_linear(((CONNECTION_COLOR_HEX >> 8) & 0xFF) as u8);
    let b = srgb_to_linear((CONNECTION_COLOR_HEX & 0xFF) as u8);
    assert_eq!(g, b);
    assert!((g - 0.693).abs() < 1e-3);
    assert!(BRAIN_WGSL.contains(&format!("vec4<f32>(0.0, 0.693, 0.693, {:?})", CONNECTION_OPACITY)));
}

#[test]
fn dom_hooks_are_distinct() {
    assert_ne!(BRAIN_CANVAS_ID, PARTICLE_CANVAS_ID);
    assert!(BRAIN_PIN_SELECTOR.ends_with(BRAIN_CANVAS_ID));
    assert!(HERO_CHAR_SELECTOR.starts_with(HERO_TITLE_SELECTOR));
}

#[test]
fn noise_prelude_comes_first() {
    let src = shader::inject(NOISE_WGSL, BRAIN_WGSL);
    let def = src.find("fn snoise(").expect("noise is defined");
    let usage = src.find("snoise(in.position").expect("brain samples noise");
    assert!(def < usage);
    assert!(src.starts_with(NOISE_WGSL));
    assert!(src.ends_with(BRAIN_WGSL));
}

#[test]
fn shaders_declare_their_entry_points() {
    for (src, entries) in [
        (BRAIN_WGSL, &["vs_main", "fs_main", "vs_lines", "fs_lines"][..]),
        (PARTICLES_WGSL, &["vs_main", "fs_main"][..]),
    ] {
        for e in entries {
            assert!(src.contains(&format!("fn {}(", e)), "{}", e);
        }
    }
}
