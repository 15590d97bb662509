mod bus;
mod events;

use std::sync::Arc;

use parking_lot::Mutex;

pub use bus::EventBus;
pub use events::{EditorEvent, EraseEvent, SceneEvent, TextEditingEvent};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

/// Handler that keeps a shared log of every event it sees.
///
/// Clones share the same log, so one clone can be subscribed while another
/// is kept to inspect what was emitted.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
