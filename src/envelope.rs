use crate::{EventName, Meta, Payload};

/// A published event on its way to the handlers.
///
/// - `meta`: identity and acceptance time of the publication.
/// - `event`: the name handlers were registered under.
/// - `payload`: the serialized message, shared by all handlers.
///
/// This is the unit of work the bus queues on its worker pool.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub meta: Meta,
    pub event: EventName,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(event: EventName, payload: Payload) -> Self {
        Self {
            meta: Meta::new(),
            event,
            payload,
        }
    }

    #[inline]
    pub fn id(&self) -> crate::EventId {
        self.meta.id()
    }
}
