use std::sync::Arc;

use crate::{Bus, Config, Monitor, NonEmpty, Result, Validator, monitor::MonitorSet};

/// Step-by-step construction of a [`Bus`].
///
/// ```rust,no_run
/// # async fn demo() -> eventbus::Result<()> {
/// use eventbus::{Bus, JsonValidator, monitors::Tracer};
///
/// let bus = Bus::builder("orders")
///     .max_workers(2)
///     .queue_size(100)
///     .validator(JsonValidator)
///     .monitor(Tracer)
///     .build()?;
/// # bus.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct BusBuilder {
    name: Arc<str>,
    config: Config,
    validator: Box<dyn Validator>,
    monitors: Vec<Arc<dyn Monitor>>,
}

impl BusBuilder {
    pub(crate) fn new<N: Into<Arc<str>>>(name: N) -> Self {
        Self {
            name: name.into(),
            config: Config::default(),
            validator: Box::new(NonEmpty),
            monitors: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.config = self.config.with_max_workers(max_workers);
        self
    }

    pub fn queue_size(mut self, queue_size: usize) -> Self {
        self.config = self.config.with_queue_size(queue_size);
        self
    }

    /// Payload check applied on publish and again before dispatch.
    /// Defaults to [`NonEmpty`].
    pub fn validator<V: Validator>(mut self, validator: V) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn monitor<M: Monitor>(mut self, monitor: M) -> Self {
        self.monitors.push(Arc::new(monitor));
        self
    }

    /// Spawn the workers on the current Tokio runtime and return the bus.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) when
    /// `max_workers` is 0, and with [`Error::RuntimeUnavailable`](crate::Error::RuntimeUnavailable)
    /// outside a runtime.
    pub fn build(self) -> Result<Bus> {
        Bus::from_parts(
            self.name,
            self.config,
            self.validator,
            MonitorSet::new(self.monitors),
        )
    }
}
