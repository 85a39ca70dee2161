// Host-side tests for particle field generation.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod particles {
    include!("../src/core/particles.rs");
}

use particles::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn default_config_matches_constants() {
    let config = ParticleConfig::default();
    assert_eq!(config.count, 100_000);
    assert_eq!(config.half_extent(), 25.0);
}

#[test]
fn generates_exact_count_inside_volume() {
    let config = ParticleConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let field = ParticleField::generate(&config, &mut rng);
    assert_eq!(field.len(), config.count);
    for p in field.instances() {
        for c in p.position {
            assert!((-25.0..=25.0).contains(&c), "{} outside the cube", c);
        }
    }
}

#[test]
fn colors_stay_in_channel_ranges() {
    let config = ParticleConfig {
        count: 5_000,
        ..ParticleConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let field = ParticleField::generate(&config, &mut rng);
    for p in field.instances() {
        let [r, g, b] = p.color;
        assert!((0.1..=0.5).contains(&r));
        assert!((0.1..=0.9).contains(&g));
        assert!((0.3..=0.9).contains(&b));
    }
}

#[test]
fn same_seed_gives_same_field() {
    let config = ParticleConfig {
        count: 64,
        ..ParticleConfig::default()
    };
    let a = ParticleField::generate(&config, &mut StdRng::seed_from_u64(5));
    let b = ParticleField::generate(&config, &mut StdRng::seed_from_u64(5));
    assert_eq!(a.instances(), b.instances());
}

#[test]
fn zero_count_is_empty() {
    let config = ParticleConfig {
        count: 0,
        ..ParticleConfig::default()
    };
    let field = ParticleField::generate(&config, &mut StdRng::seed_from_u64(1));
    assert!(field.is_empty());
}

#[test]
fn instance_layout_is_six_floats() {
    assert_eq!(std::mem::size_of::<ParticleInstance>(), 24);
}
