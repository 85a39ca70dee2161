#![cfg(target_arch = "wasm32")]
use crate::core::config::SiteConfig;
use crate::core::lifecycle::PageExit;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod animations;
mod app;
mod audio;
mod constants;
mod core;
mod dom;
mod draco;
mod frame;
mod overlay;
mod particles;
mod render;
mod scene;

use app::App;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("brain-web starting");

    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// `<body data-*>` overrides on top of the built-in defaults.
fn read_site_config(document: &web::Document) -> SiteConfig {
    let Some(body) = document.body() else {
        return SiteConfig::default();
    };
    SiteConfig::with_overrides(
        SiteConfig::KEYS
            .iter()
            .filter_map(|key| Some((*key, body.get_attribute(&format!("data-{}", key))?))),
    )
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let config = read_site_config(&document);
    let delay_ms = config.loading_delay_ms;
    let app = Rc::new(RefCell::new(App::build(&document, config).await?));

    // Loading screen and hero text go once the page has loaded plus a fixed delay
    let app_reveal = app.clone();
    let reveal = move || {
        dom::set_timeout(delay_ms, move || {
            if let Some(document) = dom::window_document() {
                app_reveal.borrow().reveal(&document);
            }
        });
    };
    if document.ready_state() == "complete" {
        reveal();
    } else {
        let mut reveal = Some(reveal);
        dom::once_on_window("load", move |_| {
            if let Some(reveal) = reveal.take() {
                reveal();
            }
        });
    }

    // Browsers only allow audio after a user gesture
    if let Some(shared) = app.borrow().audio().cloned() {
        dom::once_on_window("click", move |_| audio::start(&shared));
    }

    let app_teardown = app.clone();
    dom::on_window("pagehide", move |e| {
        let persisted = e
            .dyn_ref::<web::PageTransitionEvent>()
            .is_some_and(|e| e.persisted());
        let exit = PageExit::from_persisted(persisted);
        if exit.releases_resources() {
            app_teardown.borrow_mut().dispose();
        } else {
            log::info!("[app] page entering back/forward cache, keeping scenes");
        }
    });
    Ok(())
}
