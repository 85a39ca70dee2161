// Host-side tests for the shared per-frame task scheduler.

#![allow(dead_code)]
mod scheduler {
    include!("../src/core/scheduler.rs");
}

use scheduler::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counter(sched: &mut FrameScheduler) -> (TaskHandle, Rc<Cell<u32>>) {
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let handle = sched.register(Box::new(move |_| h.set(h.get() + 1)));
    (handle, hits)
}

#[test]
fn tasks_run_in_registration_order() {
    let mut sched = FrameScheduler::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["brain", "particles", "scroll"] {
        let order = order.clone();
        sched.register(Box::new(move |_| order.borrow_mut().push(name)));
    }
    assert_eq!(sched.tick(0.016), 3);
    assert_eq!(*order.borrow(), vec!["brain", "particles", "scroll"]);
}

#[test]
fn stopped_task_no_longer_runs_and_is_pruned() {
    let mut sched = FrameScheduler::new();
    let (a, a_hits) = counter(&mut sched);
    let (_b, b_hits) = counter(&mut sched);
    sched.tick(0.016);
    a.stop();
    assert!(!a.is_running());
    assert_eq!(sched.len(), 1);
    assert_eq!(sched.tick(0.016), 1);
    assert_eq!(a_hits.get(), 1);
    assert_eq!(b_hits.get(), 2);
}

#[test]
fn task_can_stop_itself() {
    let mut sched = FrameScheduler::new();
    let slot: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));
    let runs = Rc::new(Cell::new(0));
    let handle = {
        let slot = slot.clone();
        let runs = runs.clone();
        sched.register(Box::new(move |_| {
            runs.set(runs.get() + 1);
            if let Some(h) = slot.borrow().as_ref() {
                h.stop();
            }
        }))
    };
    *slot.borrow_mut() = Some(handle);
    sched.tick(0.016);
    sched.tick(0.016);
    assert_eq!(runs.get(), 1);
    assert!(sched.is_idle());
}

#[test]
fn tick_index_and_dt_are_passed_through() {
    let mut sched = FrameScheduler::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    sched.register(Box::new(move |t| s.borrow_mut().push(t)));
    sched.tick(0.016);
    sched.tick(0.033);
    let seen = seen.borrow();
    assert_eq!(seen[0], FrameTick { index: 0, dt_sec: 0.016 });
    assert_eq!(seen[1], FrameTick { index: 1, dt_sec: 0.033 });
}

#[test]
fn handles_have_unique_ids() {
    let mut sched = FrameScheduler::new();
    let (a, _) = counter(&mut sched);
    let (b, _) = counter(&mut sched);
    assert_ne!(a.id(), b.id());
    assert!(a.is_running() && b.is_running());
    assert_eq!(sched.len(), 2);
}

#[test]
fn empty_scheduler_is_idle() {
    let mut sched = FrameScheduler::new();
    assert!(sched.is_idle());
    assert_eq!(sched.tick(0.016), 0);
}
