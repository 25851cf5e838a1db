use crate::Payload;

/// Error type handlers may fail with. Anything implementing `std::error::Error`
/// converts into it with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type HandlerResult = std::result::Result<(), BoxError>;

/// Consumer-supplied callable invoked with an event's payload.
///
/// Handlers run on a worker's blocking thread, one after another in
/// registration order, so they may block. A failure (returned error or
/// panic) is logged and reported to monitors, but never reaches the
/// publisher and never stops the remaining handlers of the same event.
///
/// Closures are handlers:
///
/// ```rust
/// use eventbus::{Handler, HandlerResult, Payload};
///
/// fn print_len(payload: &Payload) -> HandlerResult {
///     println!("{} bytes", payload.len());
///     Ok(())
/// }
///
/// let h: &dyn Handler = &print_len;
/// h.handle(&Payload::from("abc")).unwrap();
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, payload: &Payload) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Payload) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, payload: &Payload) -> HandlerResult {
        self(payload)
    }
}
