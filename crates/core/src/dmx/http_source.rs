use std::time::Duration;

use serde::Deserialize;

use super::channel_buffer::ChannelBuffer;
use super::source::{DmxSource, FetchError, FetchHealth};
use crate::config::SourceConfig;

#[derive(Deserialize)]
struct DmxResponse {
    dmx: Vec<i64>,
}

/// Parse a `{"dmx": [...]}` body into a validated channel buffer.
pub fn parse_dmx_response(body: &str, num_lights: usize) -> Result<ChannelBuffer, FetchError> {
    let response: DmxResponse = serde_json::from_str(body)?;
    ChannelBuffer::from_values(&response.dmx, num_lights)
}

/// Polls a single universe over HTTP, one blocking request per call.
pub struct HttpDmxSource {
    client: reqwest::blocking::Client,
    url: String,
    num_lights: usize,
    health: FetchHealth,
}

impl HttpDmxSource {
    pub fn new(config: &SourceConfig, num_lights: usize) -> Result<Self, FetchError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            url: format!("{}?u={}", config.endpoint, config.universe),
            num_lights,
            health: FetchHealth::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn health(&self) -> &FetchHealth {
        &self.health
    }

    /// One attempt, no retry. Timeouts surface as `FetchError::Network`.
    pub fn try_fetch(&self) -> Result<ChannelBuffer, FetchError> {
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_dmx_response(&body, self.num_lights)
    }
}

impl DmxSource for HttpDmxSource {
    fn fetch(&mut self) -> ChannelBuffer {
        match self.try_fetch() {
            Ok(buffer) => {
                self.health.record_success(&self.url);
                buffer
            }
            Err(e) => {
                self.health.record_failure(&self.url, &e);
                ChannelBuffer::blackout(self.num_lights)
            }
        }
    }

    fn describe(&self) -> String {
        format!("HTTP {}", self.url)
    }
}
