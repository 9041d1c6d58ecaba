use std::cell::RefCell;
use std::rc::Rc;

use super::*;

/// Receiver for engine events. Listeners are called synchronously from
/// inside step execution and must not assume more ordering than step order.
pub trait EngineListener {
    fn on_event(&mut self, event: &EngineEvent);
}

/// Listener that keeps every event it sees. Clones share the same buffer,
/// so one clone can be handed to the engine and the other inspected.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Recorded events minus debug-state notifications.
    pub fn story_events(&self) -> Vec<EngineEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| !event.is_debug())
            .cloned()
            .collect()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn take_story_events(&self) -> Vec<EngineEvent> {
        self.take()
            .into_iter()
            .filter(|event| !event.is_debug())
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EngineListener for EventRecorder {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
