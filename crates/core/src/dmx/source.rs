use thiserror::Error;

use super::channel_buffer::ChannelBuffer;

/// Reasons a DMX fetch can fail. Every variant is recovered by substituting a
/// blackout buffer; none of them reach the frame loop.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Data source returned HTTP {0}")]
    Status(u16),
    #[error("Invalid DMX response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected {expected} channel values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Channel {index} has value {value}, outside 0-255")]
    ValueOutOfRange { index: usize, value: i64 },
}

/// Anything that can hand the frame loop a channel buffer.
///
/// `fetch` must always return a buffer of `num_lights * CHANNELS_PER_FIXTURE`
/// values and must never panic on a bad data source.
pub trait DmxSource {
    fn fetch(&mut self) -> ChannelBuffer;

    /// Short human readable description, used in startup logs.
    fn describe(&self) -> String;
}

impl<S: DmxSource + ?Sized> DmxSource for Box<S> {
    fn fetch(&mut self) -> ChannelBuffer {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Keeps a down data source from flooding the log at frame rate.
///
/// A new kind of failure is logged at `warn`, repeats of the same failure at
/// `debug`, and the first success after a failure at `info`.
#[derive(Debug, Default)]
pub struct FetchHealth {
    last_error: Option<String>,
    consecutive_failures: u64,
}

impl FetchHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, source: &str, err: &FetchError) {
        let message = err.to_string();
        self.consecutive_failures += 1;

        if self.last_error.as_deref() == Some(message.as_str()) {
            log::debug!(
                "DMX fetch from {} still failing ({} in a row): {}",
                source,
                self.consecutive_failures,
                message
            );
        } else {
            log::warn!("DMX fetch from {} failed, blacking out: {}", source, message);
            self.last_error = Some(message);
        }
    }

    pub fn record_success(&mut self, source: &str) {
        if self.last_error.take().is_some() {
            log::info!(
                "DMX source {} recovered after {} failed fetches",
                source,
                self.consecutive_failures
            );
        }
        self.consecutive_failures = 0;
    }

    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }

    pub fn is_failing(&self) -> bool {
        self.last_error.is_some()
    }
}
