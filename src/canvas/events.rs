/// An event carried through [`EventTarget::dispatch_event`]. Only its type is modelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasEvent {
    kind: String,
}

impl CanvasEvent {
    /// Event of type `kind` (e.g. `"contextlost"`).
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// Event type.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Callback registered with [`EventTarget::add_event_listener`].
pub type EventListener = Box<dyn FnMut(&CanvasEvent) + Send>;

/// Structural `EventTarget` surface. Headless canvases never deliver events, so the defaults
/// drop listeners and report every dispatch as not cancelled.
pub trait EventTarget {
    /// Register `listener` for events of type `kind`.
    fn add_event_listener(&mut self, kind: &str, listener: EventListener) {
        let _ = (kind, listener);
    }

    /// Remove listeners registered for `kind`.
    fn remove_event_listener(&mut self, kind: &str) {
        let _ = kind;
    }

    /// Dispatch `event`; returns `false` only if a listener cancelled it.
    fn dispatch_event(&mut self, event: &CanvasEvent) -> bool {
        let _ = event;
        true
    }
}
