// Host-side tests for post-processing chain planning.

#![allow(dead_code)]
mod post {
    include!("../src/core/post.rs");
}

use post::*;

#[test]
fn full_chain_runs_in_fixed_order() {
    let chain = PassChain::default();
    let plan = chain.plan();
    let passes: Vec<_> = plan.iter().map(|s| s.pass).collect();
    assert_eq!(
        passes,
        vec![
            Some(PassKind::Bloom),
            Some(PassKind::Chromatic),
            Some(PassKind::Distortion)
        ]
    );
    assert_eq!(plan[0].source, Target::Scene);
    assert_eq!(plan[0].dest, Target::Ping);
    assert_eq!(plan[1].source, Target::Ping);
    assert_eq!(plan[1].dest, Target::Pong);
    assert_eq!(plan[2].source, Target::Pong);
    assert_eq!(plan[2].dest, Target::Screen);
}

#[test]
fn base_only_copies_scene_to_screen() {
    let plan = PassChain::base_only().plan();
    assert_eq!(
        plan,
        vec![PassStep {
            pass: None,
            source: Target::Scene,
            dest: Target::Screen,
        }]
    );
}

#[test]
fn single_effect_goes_straight_to_screen() {
    let mut chain = PassChain::base_only();
    chain.set_enabled(PassKind::Chromatic, true);
    let plan = chain.plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].pass, Some(PassKind::Chromatic));
    assert_eq!(plan[0].source, Target::Scene);
    assert_eq!(plan[0].dest, Target::Screen);
}

#[test]
fn disabling_middle_pass_keeps_relative_order() {
    let mut chain = PassChain::default();
    chain.set_enabled(PassKind::Chromatic, false);
    assert!(!chain.is_enabled(PassKind::Chromatic));
    let plan = chain.plan();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].pass, Some(PassKind::Bloom));
    assert_eq!(plan[0].dest, Target::Ping);
    assert_eq!(plan[1].pass, Some(PassKind::Distortion));
    assert_eq!(plan[1].source, Target::Ping);
    assert_eq!(plan[1].dest, Target::Screen);
}

#[test]
fn last_step_always_targets_screen() {
    for mask in 0u8..8 {
        let mut chain = PassChain::base_only();
        for (i, pass) in PassKind::ORDER.into_iter().enumerate() {
            chain.set_enabled(pass, mask & (1 << i) != 0);
        }
        let plan = chain.plan();
        assert_eq!(plan.last().map(|s| s.dest), Some(Target::Screen));
        assert_eq!(plan[0].source, Target::Scene);
        // Screen is never read from
        assert!(plan.iter().all(|s| s.source != Target::Screen));
    }
}

#[test]
fn names_round_trip() {
    for pass in PassKind::ORDER {
        assert_eq!(PassKind::from_name(pass.name()), Some(pass));
    }
    assert_eq!(PassKind::from_name("vignette"), None);
    assert_eq!(PassKind::Bloom.fragment_entry(), "fs_bloom");
}
