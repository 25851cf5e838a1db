use crate::{ArgumentError, Result};

/// Construction-time configuration of a [`Bus`](crate::Bus) and its worker pool.
///
/// Worker count and queue size are the only tunables. Use the builder
/// methods to customize, or use [`Default`] for a single worker with a
/// single-slot queue.
///
/// # Examples
///
/// ```rust
/// use eventbus::Config;
///
/// let config = Config::default()
///     .with_max_workers(4)     // Handlers may run in parallel
///     .with_queue_size(256);   // Up to 256 events waiting for a worker
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Number of worker loops consuming the queue.
    /// With exactly one worker, events are handled in submission order.
    /// With more, no ordering is guaranteed, not even between two
    /// publications of the same event.
    /// Default: 1
    pub max_workers: usize,

    /// Capacity of the job queue. When full, `publish` fails immediately
    /// with [`Rejection::QueueFull`](crate::Rejection::QueueFull).
    /// A value of 0 is treated as 1.
    /// Default: 1
    pub queue_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_workers: 1,
            queue_size: 1,
        }
    }
}

impl Config {
    /// Set the number of worker loops.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Set the job queue capacity.
    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    /// Queue capacity actually allocated. Tokio's bounded channels need
    /// at least one slot.
    pub fn channel_capacity(&self) -> usize {
        self.queue_size.max(1)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(ArgumentError::InvalidConfig("max_workers must be at least 1".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.queue_size, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let err = Config::default().with_max_workers(0).validate().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_zero_queue_size_is_clamped() {
        let config = Config::default().with_queue_size(0);
        assert_eq!(config.channel_capacity(), 1);
        assert_eq!(config.with_queue_size(64).channel_capacity(), 64);
    }
}
