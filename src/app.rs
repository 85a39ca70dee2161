use crate::animations::{ScrollAnimations, TextAnimations};
use crate::audio::{self, SharedAudio};
use crate::constants::{BRAIN_CANVAS_ID, PARTICLE_CANVAS_ID};
use crate::core::config::SiteConfig;
use crate::core::particles::ParticleConfig;
use crate::dom;
use crate::frame::FrameLoop;
use crate::overlay;
use crate::particles::ParticleSystem;
use crate::scene::BrainScene;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Composition root. Owns every subsystem and tears them down in reverse
/// construction order.
pub struct App {
    frame: FrameLoop,
    audio: Option<SharedAudio>,
    brain: Option<Rc<RefCell<BrainScene>>>,
    particles: Option<Rc<RefCell<ParticleSystem>>>,
    scroll: Option<Rc<RefCell<ScrollAnimations>>>,
    text: TextAnimations,
    disposed: bool,
}

impl App {
    pub async fn build(document: &web::Document, config: SiteConfig) -> anyhow::Result<Self> {
        log::info!("[app] building {:?} composition", config.composition);
        let frame = FrameLoop::new();

        let (audio, brain) = if config.composition.has_brain() {
            let audio = audio::shared(&config.audio_path);
            let canvas = dom::canvas_by_id(document, BRAIN_CANVAS_ID)?;
            let brain = BrainScene::create(
                canvas,
                Some(audio.clone()),
                &frame,
                &config.model_path,
                &config.draco_path,
                config.post_effects.clone(),
            )
            .await?;
            (Some(audio), Some(brain))
        } else {
            (None, None)
        };

        let canvas = dom::canvas_by_id(document, PARTICLE_CANVAS_ID)?;
        let particle_config = ParticleConfig {
            count: config.particle_count,
            ..ParticleConfig::default()
        };
        let particles = ParticleSystem::create(canvas, particle_config, &frame).await?;

        let scroll = ScrollAnimations::create(document, brain.as_ref(), &frame);
        let text = TextAnimations::new(document.clone());
        log::info!("[app] {} frame tasks running", frame.task_count());

        Ok(Self {
            frame,
            audio,
            brain,
            particles: Some(particles),
            scroll: Some(scroll),
            text,
            disposed: false,
        })
    }

    pub fn audio(&self) -> Option<&SharedAudio> {
        self.audio.as_ref()
    }

    /// Hide the loading screen and play the hero reveal.
    pub fn reveal(&self, document: &web::Document) {
        if overlay::hide_loading_screen(document) {
            log::info!("[app] loading screen hidden");
        }
        self.text.animate_hero();
    }

    pub fn dispose(&mut self) {
        if std::mem::replace(&mut self.disposed, true) {
            return;
        }
        if let Some(scroll) = self.scroll.take() {
            scroll.borrow_mut().dispose();
        }
        if let Some(particles) = self.particles.take() {
            particles.borrow_mut().dispose();
        }
        if let Some(brain) = self.brain.take() {
            brain.borrow_mut().dispose();
        }
        self.audio = None;
        log::info!(
            "[app] disposed ({} stopped tasks awaiting removal)",
            self.frame.task_count()
        );
    }
}
