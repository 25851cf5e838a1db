use crate::{Envelope, Error, EventName, monitor::Monitor};

/// Monitor that logs every stage of an event's life at `trace` level,
/// and failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer;

impl Monitor for Tracer {
    fn on_event_published(&self, envelope: &Envelope) {
        tracing::trace!(
            event = %envelope.event,
            event_id = %envelope.id(),
            bytes = envelope.payload.len(),
            "Event published"
        );
    }

    fn on_event_rejected(&self, event: &EventName, error: &Error) {
        tracing::warn!(event = %event, error = %error, "Event rejected");
    }

    fn on_event_dispatched(&self, envelope: &Envelope, handlers: usize) {
        tracing::trace!(
            event = %envelope.event,
            event_id = %envelope.id(),
            handlers,
            "Event dispatched"
        );
    }

    fn on_handler_failed(&self, envelope: &Envelope, error: &Error) {
        tracing::warn!(
            event = %envelope.event,
            event_id = %envelope.id(),
            error = %error,
            "Handler failed"
        );
    }

    fn on_event_handled(&self, envelope: &Envelope) {
        tracing::trace!(event = %envelope.event, event_id = %envelope.id(), "Event handled");
    }
}
