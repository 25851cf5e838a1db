use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    BusBuilder, Config, Envelope, Error, EventName, Handler, Payload, Result, Validator,
    monitor::MonitorSet,
    pool::{Job, WorkerPool},
    registry::Registry,
};

/// In-process publish/subscribe event bus.
///
/// - Register handlers with `subscribe(event, handler)`; effective immediately.
/// - `publish(event, payload)` validates, queues and returns without waiting
///   for any handler.
/// - A worker later calls every handler of the event, in registration order,
///   one after another. Handler failures are logged and reported to monitors,
///   never returned to the publisher.
/// - `shutdown()` refuses further publications and resolves once all accepted
///   events have been handled.
///
/// The bus must be created inside a Tokio runtime, which hosts its workers.
/// Dropping it without calling `shutdown()` aborts the workers and discards
/// events still waiting in the queue.
///
/// # Ordering
///
/// With one worker (the default) handlers observe events in publication
/// order. With more workers no ordering is guaranteed, not even between two
/// publications of the same event.
///
/// See also: [`BusBuilder`], [`Config`], [`crate::Monitor`].
pub struct Bus {
    name: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    pool: WorkerPool<Dispatch>,
    quit: AtomicBool,
}

impl Bus {
    /// Create a bus with one worker and a single-slot queue.
    pub fn new<N: Into<Arc<str>>>(name: N) -> Result<Self> {
        Self::builder(name).build()
    }

    /// Create a bus with the given worker count and queue size.
    pub fn with_options<N: Into<Arc<str>>>(
        name: N,
        max_workers: usize,
        queue_size: usize,
    ) -> Result<Self> {
        Self::builder(name)
            .max_workers(max_workers)
            .queue_size(queue_size)
            .build()
    }

    pub fn builder<N: Into<Arc<str>>>(name: N) -> BusBuilder {
        BusBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        config: Config,
        validator: Box<dyn Validator>,
        monitors: MonitorSet,
    ) -> Result<Self> {
        let mut pool = WorkerPool::new(name.clone(), config)?;
        pool.start()?;
        let dispatcher = Dispatcher {
            bus: name.clone(),
            registry: Registry::new(),
            validator,
            monitors,
        };
        Ok(Self {
            name,
            dispatcher: Arc::new(dispatcher),
            pool,
            quit: AtomicBool::new(false),
        })
    }

    /// Append `handler` to the handlers of `event`.
    ///
    /// Fails with [`ArgumentError::EmptyEventName`](crate::ArgumentError::EmptyEventName)
    /// for an empty name. Allowed after shutdown, though nothing will be dispatched anymore.
    pub fn subscribe<N, H>(&self, event: N, handler: H) -> Result<()>
    where
        N: Into<EventName>,
        H: Handler,
    {
        let event = event.into();
        self.dispatcher
            .registry
            .register(event.clone(), Arc::new(handler))?;
        tracing::debug!(bus = %self.name, event = %event, "Handler subscribed");
        Ok(())
    }

    /// Queue `payload` for every handler of `event` and return immediately.
    ///
    /// Errors:
    /// - [`Error::ShuttingDown`] once `shutdown()` has been called,
    /// - [`Error::InvalidArgument`] for an empty name or a payload the validator refuses,
    /// - [`Error::SubmissionRejected`] when the queue is full or the workers are gone.
    ///
    /// Publishing an event nobody subscribed to succeeds.
    pub fn publish<N, P>(&self, event: N, payload: P) -> Result<()>
    where
        N: Into<EventName>,
        P: Into<Payload>,
    {
        let event = event.into();
        self.submit(&event, payload.into()).inspect_err(|e| {
            self.dispatcher
                .monitors
                .notify(|m| m.on_event_rejected(&event, e));
        })
    }

    fn submit(&self, event: &EventName, payload: Payload) -> Result<()> {
        if self.quit.load(Ordering::Acquire) {
            return Err(Error::ShuttingDown);
        }
        self.dispatcher.validate(event, &payload)?;

        let envelope = Envelope::new(event.clone(), payload);
        let job = Dispatch {
            envelope: envelope.clone(),
            dispatcher: self.dispatcher.clone(),
        };
        if let Err(e) = self.pool.submit(job) {
            tracing::warn!(bus = %self.name, event = %event, error = %e, "Event not queued");
            return Err(e);
        }

        self.dispatcher
            .monitors
            .notify(|m| m.on_event_published(&envelope));
        Ok(())
    }

    /// Stop accepting publications and wait until every queued event has been handled.
    ///
    /// Running handlers are not interrupted. Calling it again, or from several
    /// tasks at once, is harmless: all callers return after the drain.
    pub async fn shutdown(&self) {
        if !self.quit.swap(true, Ordering::AcqRel) {
            tracing::debug!(bus = %self.name, queued = self.pool.queued(), "Shutting down");
        }
        self.pool.shutdown().await;
    }

    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    /// Number of handlers registered for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.dispatcher.registry.len(event)
    }

    /// Number of published events still waiting for a worker.
    pub fn queued(&self) -> usize {
        self.pool.queued()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        self.pool.config()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("name", &self.name)
            .field("registry", &self.dispatcher.registry)
            .field("monitors", &self.dispatcher.monitors.len())
            .field("pool", &self.pool)
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}

/// State shared between the bus and the jobs it queues.
struct Dispatcher {
    bus: Arc<str>,
    registry: Registry,
    validator: Box<dyn Validator>,
    monitors: MonitorSet,
}

impl Dispatcher {
    fn validate(&self, event: &EventName, payload: &Payload) -> Result<()> {
        event.validate()?;
        self.validator.validate(payload)?;
        Ok(())
    }

    /// Call every handler of the envelope's event, in registration order.
    /// Runs on a worker; nothing here may escape to the publisher.
    fn execute(&self, envelope: &Envelope) {
        if let Err(e) = self.validate(&envelope.event, &envelope.payload) {
            tracing::warn!(
                bus = %self.bus,
                event = %envelope.event,
                event_id = %envelope.id(),
                error = %e,
                "Dropping invalid event"
            );
            self.monitors
                .notify(|m| m.on_event_rejected(&envelope.event, &e));
            return;
        }

        let handlers = self.registry.lookup(envelope.event.as_str());
        self.monitors
            .notify(|m| m.on_event_dispatched(envelope, handlers.len()));

        for (idx, handler) in handlers.iter().enumerate() {
            let err = match catch_unwind(AssertUnwindSafe(|| handler.handle(&envelope.payload))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => Error::handler(&envelope.event, e),
                Err(panic) => Error::handler(&envelope.event, panic_message(panic.as_ref())),
            };
            tracing::error!(
                bus = %self.bus,
                event = %envelope.event,
                event_id = %envelope.id(),
                handler = idx,
                error = %err,
                "Handler failed"
            );
            self.monitors
                .notify(|m| m.on_handler_failed(envelope, &err));
        }

        self.monitors.notify(|m| m.on_event_handled(envelope));
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Job queued on the worker pool for one publication.
struct Dispatch {
    envelope: Envelope,
    dispatcher: Arc<Dispatcher>,
}

impl Job for Dispatch {
    fn run(self) {
        self.dispatcher.execute(&self.envelope);
    }
}
