use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{EventName, Handler, Result};

/// Event name to handlers mapping, shared between `subscribe` callers and the workers.
///
/// Lookups hand out a snapshot of the handler list, so no lock is held while
/// handlers run and a handler may itself subscribe without deadlocking.
#[derive(Default)]
pub(crate) struct Registry {
    handlers: RwLock<HashMap<EventName, Vec<Arc<dyn Handler>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, event: EventName, handler: Arc<dyn Handler>) -> Result<()> {
        event.validate()?;
        Self::validate_handler(handler.as_ref())?;
        self.write().entry(event).or_default().push(handler);
        Ok(())
    }

    /// Handlers registered for `event`, in registration order.
    pub fn lookup(&self, event: &str) -> Vec<Arc<dyn Handler>> {
        self.read().get(event).cloned().unwrap_or_default()
    }

    pub fn len(&self, event: &str) -> usize {
        self.read().get(event).map_or(0, Vec::len)
    }

    // Any `Handler` is accepted for now.
    fn validate_handler(_handler: &dyn Handler) -> Result<()> {
        Ok(())
    }

    // Writers only ever push onto a vector, so a panic while holding the
    // lock can't leave the map half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EventName, Vec<Arc<dyn Handler>>>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EventName, Vec<Arc<dyn Handler>>>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<EventName, usize> = self
            .read()
            .iter()
            .map(|(event, handlers)| (event.clone(), handlers.len()))
            .collect();
        f.debug_struct("Registry").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{HandlerResult, Payload};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Arc<dyn Handler> {
        let log = log.clone();
        Arc::new(move |_: &Payload| -> HandlerResult {
            log.lock().unwrap().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let registry = Registry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let err = registry
            .register(EventName::from(""), recorder(&log, "a"))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(registry.len(""), 0);
    }

    #[test]
    fn test_lookup_unknown_event_is_empty_and_does_not_insert() {
        let registry = Registry::new();
        assert!(registry.lookup("missing").is_empty());
        assert!(registry.read().is_empty());
    }

    #[test]
    fn test_lookup_preserves_registration_order() {
        let registry = Registry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            registry
                .register(EventName::from("deleted"), recorder(&log, tag))
                .unwrap();
        }
        registry
            .register(EventName::from("created"), recorder(&log, "other"))
            .unwrap();

        let payload = Payload::from("{}");
        for handler in registry.lookup("deleted") {
            handler.handle(&payload).unwrap();
        }
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(registry.len("deleted"), 3);
        assert_eq!(registry.len("created"), 1);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_registration() {
        let registry = Registry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry
            .register(EventName::from("created"), recorder(&log, "a"))
            .unwrap();
        let snapshot = registry.lookup("created");
        registry
            .register(EventName::from("created"), recorder(&log, "b"))
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.lookup("created").len(), 2);
    }
}
