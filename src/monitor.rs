use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, PoisonError, RwLock},
};

use crate::{Envelope, Error, EventName};

/// Observability hooks into the bus.
///
/// All methods have no-op defaults, so implement only what you need. Hooks are
/// called synchronously: publication hooks on the publisher's thread, the
/// others on a worker thread. Keep them cheap.
///
/// A monitor that panics is logged and removed from the bus.
pub trait Monitor: Send + Sync + 'static {
    /// An event passed validation and was queued.
    fn on_event_published(&self, envelope: &Envelope) {
        let _e = envelope;
    }

    /// The event was refused: either `publish` failed and the event never
    /// reached a worker, or a worker dropped it because it no longer passed
    /// validation right before dispatch.
    fn on_event_rejected(&self, event: &EventName, error: &Error) {
        let _n = event;
        let _e = error;
    }

    /// A worker picked the event up and is about to call `handlers` handlers.
    fn on_event_dispatched(&self, envelope: &Envelope, handlers: usize) {
        let _e = envelope;
        let _h = handlers;
    }

    /// A single handler returned an error or panicked.
    fn on_handler_failed(&self, envelope: &Envelope, error: &Error) {
        let _e = envelope;
        let _r = error;
    }

    /// All handlers for the event have run (successfully or not).
    fn on_event_handled(&self, envelope: &Envelope) {
        let _e = envelope;
    }
}

impl<M: Monitor> Monitor for Arc<M> {
    fn on_event_published(&self, envelope: &Envelope) {
        self.as_ref().on_event_published(envelope)
    }

    fn on_event_rejected(&self, event: &EventName, error: &Error) {
        self.as_ref().on_event_rejected(event, error)
    }

    fn on_event_dispatched(&self, envelope: &Envelope, handlers: usize) {
        self.as_ref().on_event_dispatched(envelope, handlers)
    }

    fn on_handler_failed(&self, envelope: &Envelope, error: &Error) {
        self.as_ref().on_handler_failed(envelope, error)
    }

    fn on_event_handled(&self, envelope: &Envelope) {
        self.as_ref().on_event_handled(envelope)
    }
}

#[derive(Default)]
pub(crate) struct MonitorSet {
    monitors: RwLock<Vec<Arc<dyn Monitor>>>,
}

impl MonitorSet {
    pub fn new(monitors: Vec<Arc<dyn Monitor>>) -> Self {
        Self {
            monitors: RwLock::new(monitors),
        }
    }

    pub fn len(&self) -> usize {
        self.monitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn notify(&self, f: impl Fn(&dyn Monitor)) {
        let mut panicked = Vec::new();
        {
            let monitors = self.monitors.read().unwrap_or_else(PoisonError::into_inner);
            for (idx, monitor) in monitors.iter().enumerate() {
                let result = catch_unwind(AssertUnwindSafe(|| f(monitor.as_ref())));
                if result.is_err() {
                    tracing::error!(monitor = idx, "Monitor panicked, removing");
                    panicked.push(monitor.clone());
                }
            }
        }

        if !panicked.is_empty() {
            self.monitors
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|m| !panicked.iter().any(|p| Arc::ptr_eq(m, p)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Payload;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Monitor for Counter {
        fn on_event_handled(&self, _envelope: &Envelope) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct Faulty;

    impl Monitor for Faulty {
        fn on_event_handled(&self, _envelope: &Envelope) {
            panic!("faulty monitor");
        }
    }

    #[test]
    fn test_panicking_monitor_is_removed_and_others_still_notified() {
        let counter = Arc::new(Counter::default());
        let monitors: Vec<Arc<dyn Monitor>> = vec![Arc::new(Faulty), counter.clone()];
        let set = MonitorSet::new(monitors);
        let envelope = Envelope::new(EventName::from("created"), Payload::from("{}"));

        set.notify(|m| m.on_event_handled(&envelope));
        assert_eq!(set.len(), 1);
        set.notify(|m| m.on_event_handled(&envelope));
        assert_eq!(counter.0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Silent;
        impl Monitor for Silent {}

        let silent: Arc<dyn Monitor> = Arc::new(Silent);
        let set = MonitorSet::new(vec![silent]);
        let envelope = Envelope::new(EventName::from("created"), Payload::from("{}"));
        set.notify(|m| m.on_event_published(&envelope));
        set.notify(|m| m.on_event_dispatched(&envelope, 3));
        assert_eq!(set.len(), 1);
    }
}
