use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("the default handler is already set")]
    DefaultHandlerAlreadySet,
}

/// Handle returned by [`EventEmitter::on`], used to unsubscribe. Ids are
/// unique across all emitters, so an id never matches a listener on an
/// emitter it did not come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An event being dispatched. Listeners may stop later listeners from
/// seeing it, or keep the default handler from running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<T> {
    pub data: T,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl<T> Event<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type Listener<T> = Box<dyn FnMut(&mut Event<T>) + Send>;

/// A per-instance list of listeners for one kind of event.
///
/// Listeners run in subscription order, synchronously, inside [`emit`].
///
/// [`emit`]: EventEmitter::emit
pub struct EventEmitter<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    default_handler: Option<Listener<T>>,
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            default_handler: None,
        }
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .field("default_handler", &self.default_handler.is_some())
            .finish()
    }
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, listener: impl FnMut(&mut Event<T>) + Send + 'static) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unsubscribes a listener. Returns `false` if it was not subscribed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Installs the handler that runs after the listeners unless one of them
    /// called [`Event::prevent_default`].
    pub fn set_default_handler(
        &mut self,
        handler: impl FnMut(&mut Event<T>) + Send + 'static,
    ) -> Result<(), EventError> {
        if self.default_handler.is_some() {
            return Err(EventError::DefaultHandlerAlreadySet);
        }
        self.default_handler = Some(Box::new(handler));
        Ok(())
    }

    pub fn remove_default_handler(&mut self) {
        self.default_handler = None;
    }

    /// Dispatches `data` to every listener and returns the finished event.
    pub fn emit(&mut self, data: T) -> Event<T> {
        let mut event = Event::new(data);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&mut event);
            if event.propagation_stopped {
                break;
            }
        }
        if !event.default_prevented {
            if let Some(handler) = self.default_handler.as_mut() {
                handler(&mut event);
            }
        }
        event
    }
}
