use crate::core::constants::NOMINAL_FRAME_STEP;
use crate::core::scheduler::{FrameScheduler, FrameTick, TaskHandle};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type RafSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Single `requestAnimationFrame` loop driving every registered task. It
/// parks itself when no task is left and wakes on the next registration.
#[derive(Clone)]
pub struct FrameLoop {
    scheduler: Rc<RefCell<FrameScheduler>>,
    running: Rc<Cell<bool>>,
    raf: RafSlot,
}

impl FrameLoop {
    pub fn new() -> Self {
        let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
        let running = Rc::new(Cell::new(false));
        let raf: RafSlot = Rc::new(RefCell::new(None));
        let last_instant: Rc<Cell<Option<Instant>>> = Rc::new(Cell::new(None));

        let scheduler_tick = scheduler.clone();
        let running_tick = running.clone();
        let raf_tick = raf.clone();
        *raf.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let now = Instant::now();
            let dt_sec = last_instant
                .replace(Some(now))
                .map(|prev| (now - prev).as_secs_f32())
                .unwrap_or(NOMINAL_FRAME_STEP);
            let idle = {
                let mut sched = scheduler_tick.borrow_mut();
                sched.tick(dt_sec);
                sched.is_idle()
            };
            if idle {
                running_tick.set(false);
                last_instant.set(None);
                log::info!("[app] frame loop idle");
                return;
            }
            request_frame(&raf_tick);
        }) as Box<dyn FnMut()>));

        Self {
            scheduler,
            running,
            raf,
        }
    }

    /// Add a per-frame task; the returned handle stops it.
    pub fn register(&self, task: impl FnMut(FrameTick) + 'static) -> TaskHandle {
        let handle = self.scheduler.borrow_mut().register(Box::new(task));
        if !self.running.replace(true) {
            request_frame(&self.raf);
        }
        handle
    }

    pub fn task_count(&self) -> usize {
        self.scheduler.borrow().len()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn request_frame(raf: &RafSlot) {
    if let (Some(w), Some(cb)) = (web::window(), raf.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
