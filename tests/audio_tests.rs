// Host-side tests for lazily started audio analysis.

#![allow(dead_code)]
mod audio {
    include!("../src/core/audio.rs");
}

use audio::*;
use std::cell::Cell;
use std::rc::Rc;

struct FixedSpectrum(Vec<u8>);

impl FrequencySource for FixedSpectrum {
    fn bin_count(&self) -> usize {
        self.0.len()
    }
    fn fill_byte_frequency_data(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0);
    }
}

struct MockFactory {
    created: Rc<Cell<u32>>,
    fail_next: bool,
    bins: Vec<u8>,
}

impl MockFactory {
    fn new(bins: Vec<u8>) -> (Self, Rc<Cell<u32>>) {
        let created = Rc::new(Cell::new(0));
        (
            Self {
                created: created.clone(),
                fail_next: false,
                bins,
            },
            created,
        )
    }
}

impl AudioGraphFactory for MockFactory {
    type Graph = FixedSpectrum;

    fn create(&mut self) -> anyhow::Result<FixedSpectrum> {
        if std::mem::take(&mut self.fail_next) {
            anyhow::bail!("autoplay blocked");
        }
        self.created.set(self.created.get() + 1);
        Ok(FixedSpectrum(self.bins.clone()))
    }
}

#[test]
fn frequency_is_zero_before_start() {
    let (factory, created) = MockFactory::new(vec![255; 128]);
    let mut audio = AudioReactive::new(factory);
    assert!(!audio.is_started());
    assert_eq!(audio.frequency(), 0.0);
    assert_eq!(created.get(), 0);
}

#[test]
fn start_is_idempotent() {
    let (factory, created) = MockFactory::new(vec![0; 128]);
    let mut audio = AudioReactive::new(factory);
    audio.start().expect("first start");
    audio.start().expect("second start");
    assert!(audio.is_started());
    assert_eq!(created.get(), 1);
}

#[test]
fn frequency_is_mean_of_spectrum() {
    let mut bins = vec![0u8; 128];
    bins[..64].fill(255);
    let (factory, _) = MockFactory::new(bins);
    let mut audio = AudioReactive::new(factory);
    audio.start().expect("start");
    let f = audio.frequency();
    assert!((f - 0.5).abs() < 1e-6);
    assert!((0.0..=1.0).contains(&f));
}

#[test]
fn failed_start_can_be_retried() {
    let (mut factory, created) = MockFactory::new(vec![255; 4]);
    factory.fail_next = true;
    let mut audio = AudioReactive::new(factory);
    assert!(audio.start().is_err());
    assert!(!audio.is_started());
    assert_eq!(audio.frequency(), 0.0);

    audio.start().expect("retry");
    assert!(audio.is_started());
    assert_eq!(created.get(), 1);
    assert_eq!(audio.frequency(), 1.0);
}

#[test]
fn mean_amplitude_handles_edges() {
    assert_eq!(mean_amplitude(&[]), 0.0);
    assert_eq!(mean_amplitude(&[255, 255]), 1.0);
    assert_eq!(mean_amplitude(&[0, 0, 0]), 0.0);
    assert!((mean_amplitude(&[51]) - 0.2).abs() < 1e-6);
}

#[test]
fn failed_graph_build_releases_the_context() {
    let closed = Cell::new(0);
    let result: anyhow::Result<(u8, ())> = build_or_release(
        7u8,
        |_| anyhow::bail!("analyser refused"),
        |ctx| {
            assert_eq!(*ctx, 7);
            closed.set(closed.get() + 1);
        },
    );
    assert!(result.is_err());
    assert_eq!(closed.get(), 1);
}

#[test]
fn built_graph_keeps_the_context_open() {
    let closed = Cell::new(0);
    let (ctx, nodes) = build_or_release(
        "ctx",
        |ctx| Ok(format!("{}:analyser", ctx)),
        |_| closed.set(closed.get() + 1),
    )
    .expect("build");
    assert_eq!(ctx, "ctx");
    assert_eq!(nodes, "ctx:analyser");
    assert_eq!(closed.get(), 0);
}
