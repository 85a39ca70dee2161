use crate::constants::{
    BRAIN_PIN_SELECTOR, BRAIN_SECTION_END, BRAIN_SECTION_SELECTOR, BRAIN_SECTION_START, CARD_END,
    CARD_START, SERVICES_END, SERVICES_SELECTOR, SERVICES_START, SERVICE_CARD_SELECTOR,
};
use crate::core::constants::SCRUB_LAG_SEC;
use crate::core::scheduler::TaskHandle;
use crate::core::scroll::{
    document_top, Ease, Edge, RevealStyle, Scrub, ScrubState, TriggerRange,
};
use crate::dom;
use crate::frame::FrameLoop;
use crate::scene::BrainScene;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

/// What a binding writes its progress into.
enum Sink {
    ScrollProgress,
    MorphProgress(Ease),
    Reveal(web::HtmlElement, Ease),
}

struct Binding {
    name: &'static str,
    trigger: web::HtmlElement,
    start: Edge,
    end: Edge,
    pin: Option<web::HtmlElement>,
    scrub: ScrubState,
    sink: Sink,
    // translateY this binding last wrote onto its own trigger
    own_offset_px: f64,
}

impl Binding {
    fn new(
        name: &'static str,
        trigger: web::HtmlElement,
        start: &str,
        end: &str,
        scrub: Scrub,
        sink: Sink,
    ) -> Option<Self> {
        let edges = start
            .parse::<Edge>()
            .and_then(|s| end.parse::<Edge>().map(|e| (s, e)));
        match edges {
            Ok((start, end)) => Some(Self {
                name,
                trigger,
                start,
                end,
                pin: None,
                scrub: ScrubState::new(scrub),
                sink,
                own_offset_px: 0.0,
            }),
            Err(e) => {
                log::error!("[scroll] {}: {}", name, e);
                None
            }
        }
    }

    /// Scroll fraction for the current layout; also moves the pinned element.
    fn measure(&self, scroll: f64, viewport_height: f64) -> f32 {
        let rect = self.trigger.get_bounding_client_rect();
        let range = TriggerRange::resolve(
            document_top(rect.top(), scroll, self.own_offset_px),
            rect.height(),
            viewport_height,
            self.start,
            self.end,
        );
        if let Some(pin) = &self.pin {
            let offset = range.pin_offset(scroll);
            dom::set_style(pin, "transform", &format!("translateY({}px)", offset));
        }
        range.progress(scroll)
    }
}

/// Scroll-linked bindings: brain scroll progress (pinned, instant), services
/// morph (lagged, eased) and one reveal per service card (lagged, eased).
///
/// Progress is recomputed from element geometry on every scroll and resize;
/// a frame task eases lagged bindings toward their latest target.
pub struct ScrollAnimations {
    brain: Option<Weak<RefCell<BrainScene>>>,
    bindings: Vec<Binding>,
    frame_task: Option<TaskHandle>,
}

impl ScrollAnimations {
    pub fn create(
        document: &web::Document,
        brain: Option<&Rc<RefCell<BrainScene>>>,
        frame: &FrameLoop,
    ) -> Rc<RefCell<Self>> {
        let mut bindings = Vec::new();
        if brain.is_some() {
            if let Some(section) = dom::query_html_element(document, BRAIN_SECTION_SELECTOR) {
                if let Some(mut b) = Binding::new(
                    "brain-section",
                    section,
                    BRAIN_SECTION_START,
                    BRAIN_SECTION_END,
                    Scrub::Instant,
                    Sink::ScrollProgress,
                ) {
                    b.pin = dom::query_html_element(document, BRAIN_PIN_SELECTOR);
                    bindings.push(b);
                }
            } else {
                log::warn!("[scroll] {} not found", BRAIN_SECTION_SELECTOR);
            }
            if let Some(services) = dom::query_html_element(document, SERVICES_SELECTOR) {
                bindings.extend(Binding::new(
                    "services",
                    services,
                    SERVICES_START,
                    SERVICES_END,
                    Scrub::Lag(SCRUB_LAG_SEC),
                    Sink::MorphProgress(Ease::Power1Out),
                ));
            } else {
                log::warn!("[scroll] {} not found", SERVICES_SELECTOR);
            }
        }
        for card in dom::query_html_elements(document, SERVICE_CARD_SELECTOR) {
            bindings.extend(Binding::new(
                "service-card",
                card.clone(),
                CARD_START,
                CARD_END,
                Scrub::Lag(SCRUB_LAG_SEC),
                Sink::Reveal(card, Ease::Power1Out),
            ));
        }
        log::info!("[scroll] {} bindings", bindings.len());

        let anims = Rc::new(RefCell::new(Self {
            brain: brain.map(Rc::downgrade),
            bindings,
            frame_task: None,
        }));
        anims.borrow_mut().snap_all();

        for event in ["scroll", "resize"] {
            let weak = Rc::downgrade(&anims);
            dom::on_window(event, move |_| {
                if let Some(anims) = weak.upgrade() {
                    anims.borrow_mut().refresh();
                }
            });
        }
        let weak = Rc::downgrade(&anims);
        let task = frame.register(move |tick| {
            if let Some(anims) = weak.upgrade() {
                anims.borrow_mut().step(tick.dt_sec);
            }
        });
        anims.borrow_mut().frame_task = Some(task);
        anims
    }

    /// Recompute every binding's scroll fraction; instant bindings apply now.
    pub fn refresh(&mut self) {
        let scroll = dom::scroll_y();
        let (_, vh) = dom::viewport_size();
        for i in 0..self.bindings.len() {
            let p = self.bindings[i].measure(scroll, vh);
            if let Some(v) = self.bindings[i].scrub.set_target(p) {
                self.apply(i, v);
            }
        }
    }

    /// Ease lagged bindings toward their targets.
    pub fn step(&mut self, dt_sec: f32) {
        for i in 0..self.bindings.len() {
            if let Some(v) = self.bindings[i].scrub.step(dt_sec) {
                self.apply(i, v);
            }
        }
    }

    pub fn dispose(&mut self) {
        if let Some(task) = self.frame_task.take() {
            task.stop();
        }
        self.bindings.clear();
        self.brain = None;
    }

    // Initial layout: show every binding at its current fraction without lag.
    fn snap_all(&mut self) {
        let scroll = dom::scroll_y();
        let (_, vh) = dom::viewport_size();
        for i in 0..self.bindings.len() {
            let p = self.bindings[i].measure(scroll, vh);
            let v = self.bindings[i].scrub.snap(p);
            self.apply(i, v);
        }
    }

    fn apply(&mut self, index: usize, value: f32) {
        let binding = &mut self.bindings[index];
        match &binding.sink {
            Sink::ScrollProgress => {
                if let Some(brain) = self.brain.as_ref().and_then(Weak::upgrade) {
                    brain.borrow_mut().set_scroll_progress(value);
                }
            }
            Sink::MorphProgress(ease) => {
                if let Some(brain) = self.brain.as_ref().and_then(Weak::upgrade) {
                    brain.borrow_mut().set_morph_progress(ease.apply(value));
                }
            }
            Sink::Reveal(el, ease) => {
                let style = RevealStyle::at(value, *ease);
                dom::set_style(
                    el,
                    "transform",
                    &format!("translateY({}px)", style.translate_y_px),
                );
                dom::set_style(el, "opacity", &style.opacity.to_string());
                if el == &binding.trigger {
                    binding.own_offset_px = style.translate_y_px as f64;
                }
            }
        }
        log::trace!("[scroll] {} -> {:.3}", binding.name, value);
    }
}
