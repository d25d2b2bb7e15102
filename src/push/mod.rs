pub mod sse;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Resource class whose changes the server announces on the push channel.
pub const ANNOUNCEMENTS: &str = "announcements";

pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Name of the invalidation event for a resource class, e.g. `refresh-announcements`.
pub fn refresh_event(resource_class: &str) -> String {
    format!("refresh-{}", resource_class)
}

/// A source of payload-less named events.
pub trait PushChannel: Send + Sync {
    fn on(&self, event: &str, handler: EventHandler) -> EventSubscription;
}

/// Handle returned by [`PushChannel::on`]. The handler stays registered until the handle is
/// unsubscribed or dropped.
pub struct EventSubscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl EventSubscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_event: HashMap<String, Vec<(u64, EventHandler)>>,
}

/// In-process event bus. The SSE transport feeds server events into it, tests emit on it
/// directly.
#[derive(Clone, Default)]
pub struct LocalPushChannel {
    listeners: Arc<Mutex<Listeners>>,
}

impl LocalPushChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every handler registered for `event` and returns how many ran.
    pub fn emit(&self, event: &str) -> usize {
        // Handlers run without the lock held so they may subscribe or unsubscribe.
        let handlers: Vec<EventHandler> = self
            .listeners
            .lock()
            .by_event
            .get(event)
            .map(|entries| entries.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default();

        tracing::debug!(event, listeners = handlers.len(), "Push event");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .by_event
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl PushChannel for LocalPushChannel {
    fn on(&self, event: &str, handler: EventHandler) -> EventSubscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners
                .by_event
                .entry(event.to_string())
                .or_default()
                .push((id, handler));
            id
        };

        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        let event = event.to_string();
        EventSubscription::new(move || {
            let Some(listeners) = weak.upgrade() else {
                return;
            };
            let mut listeners = listeners.lock();
            if let Some(entries) = listeners.by_event.get_mut(&event) {
                entries.retain(|(entry_id, _)| *entry_id != id);
                if entries.is_empty() {
                    listeners.by_event.remove(&event);
                }
            }
        })
    }
}
