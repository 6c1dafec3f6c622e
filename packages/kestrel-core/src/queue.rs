use kestrel_gui::InputEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO of input events. Producers may push from any thread; the core pops
/// them on its own thread during `tick`.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: Mutex<VecDeque<InputEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: InputEvent) {
        self.queue.lock().push_back(event);
    }

    pub fn pop(&self) -> Option<InputEvent> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
