use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::channel_buffer::ChannelBuffer;
use super::source::DmxSource;

/// Single-slot cell holding the most recently fetched buffer.
///
/// Writers replace the whole buffer; readers take a copy and never block on
/// the network.
#[derive(Clone, Default)]
pub struct LatestBuffer {
    slot: Arc<Mutex<Option<ChannelBuffer>>>,
}

impl LatestBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, buffer: ChannelBuffer) {
        *self.slot.lock() = Some(buffer);
    }

    pub fn latest(&self) -> Option<ChannelBuffer> {
        self.slot.lock().clone()
    }
}

/// Runs a blocking `DmxSource` on its own thread so a slow data source can't
/// stall frame presentation.
pub struct BackgroundPoller {
    latest: LatestBuffer,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    num_lights: usize,
    description: String,
}

impl BackgroundPoller {
    pub fn spawn<S>(mut source: S, interval: Duration, num_lights: usize) -> std::io::Result<Self>
    where
        S: DmxSource + Send + 'static,
    {
        let latest = LatestBuffer::new();
        let running = Arc::new(AtomicBool::new(true));
        let description = format!("background poller over {}", source.describe());

        let handle = {
            let latest = latest.clone();
            let running = running.clone();
            thread::Builder::new()
                .name("dmx-poller".to_string())
                .spawn(move || {
                    log::debug!("DMX poller thread started, interval {:?}", interval);
                    while running.load(Ordering::Relaxed) {
                        let started = Instant::now();
                        latest.publish(source.fetch());

                        let elapsed = started.elapsed();
                        if elapsed < interval {
                            thread::sleep(interval - elapsed);
                        }
                    }
                    log::debug!("DMX poller thread exiting");
                })?
        };

        Ok(Self {
            latest,
            running,
            handle: Some(handle),
            num_lights,
            description,
        })
    }

    pub fn latest(&self) -> &LatestBuffer {
        &self.latest
    }

    /// Signal the thread and wait for it. Safe to call more than once.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("DMX poller thread panicked");
            }
        }
    }
}

impl DmxSource for BackgroundPoller {
    fn fetch(&mut self) -> ChannelBuffer {
        self.latest
            .latest()
            .unwrap_or_else(|| ChannelBuffer::blackout(self.num_lights))
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

impl Drop for BackgroundPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
