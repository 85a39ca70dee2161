use std::cell::Cell;
use std::rc::Rc;

/// Timing passed to every task on a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTick {
    pub index: u64,
    pub dt_sec: f32,
}

/// Start/stop handle for a registered task. Stopping is safe from anywhere,
/// including from inside the task itself.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: u64,
    running: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

struct Slot {
    id: u64,
    running: Rc<Cell<bool>>,
    task: Box<dyn FnMut(FrameTick)>,
}

/// Cooperative per-frame tasks sharing one refresh callback.
#[derive(Default)]
pub struct FrameScheduler {
    slots: Vec<Slot>,
    next_id: u64,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: Box<dyn FnMut(FrameTick)>) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let running = Rc::new(Cell::new(true));
        self.slots.push(Slot {
            id,
            running: running.clone(),
            task,
        });
        TaskHandle { id, running }
    }

    /// Run every live task once, in registration order, then drop stopped
    /// ones. Returns how many tasks ran.
    pub fn tick(&mut self, dt_sec: f32) -> usize {
        let tick = FrameTick {
            index: self.ticks,
            dt_sec,
        };
        self.ticks += 1;
        let mut ran = 0;
        for slot in &mut self.slots {
            if slot.running.get() {
                (slot.task)(tick);
                ran += 1;
            }
        }
        self.slots.retain(|s| s.running.get());
        ran
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.running.get()).count()
    }

    pub fn is_idle(&self) -> bool {
        self.len() == 0
    }
}
