// Host-side tests for page exit handling.

#![allow(dead_code)]
mod lifecycle {
    include!("../src/core/lifecycle.rs");
}

use lifecycle::*;

#[test]
fn unloading_page_releases_resources() {
    let exit = PageExit::from_persisted(false);
    assert_eq!(exit, PageExit::Unload);
    assert!(exit.releases_resources());
}

#[test]
fn page_restored_from_cache_keeps_its_scenes() {
    let exit = PageExit::from_persisted(true);
    assert_eq!(exit, PageExit::Cached);
    assert!(!exit.releases_resources());
}
