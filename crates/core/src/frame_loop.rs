use std::thread;
use std::time::{Duration, Instant};

use crate::dmx::DmxSource;
use crate::scene::{render_scene, SceneConfig, SceneFrame};
use crate::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal
    Stopped,
}

#[derive(Debug)]
pub enum Tick {
    Frame(SceneFrame),
    Stopped,
}

/// Fixed-rate tick scheduler.
///
/// Call `tick` once per presented frame. The next frame is due one period
/// after the previous due time. A frame that overruns its slot makes the
/// next one due immediately instead of trying to catch up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next_due: Option<Instant>,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            period: Duration::from_nanos(1_000_000_000 / target_fps.max(1) as u64),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the next frame and return how long to wait for it.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let next = match self.next_due {
            Some(due) => (due + self.period).max(now),
            None => now + self.period,
        };
        self.next_due = Some(next);
        next - now
    }

    /// Time left until the next frame is due. Zero before the first tick.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

/// The platform side of the loop: event pump, canvas and teardown.
pub trait FrameSink {
    /// Drain pending events and report whether a quit was requested
    fn quit_requested(&mut self) -> bool;

    fn present(&mut self, frame: &SceneFrame);

    /// Release display resources. Called exactly once by `FrameLoop::run`.
    fn teardown(&mut self);
}

/// Calls `teardown` once when dropped, including during a panic.
struct TeardownGuard<'a, K: FrameSink> {
    sink: &'a mut K,
}

impl<K: FrameSink> Drop for TeardownGuard<'_, K> {
    fn drop(&mut self) {
        log::info!("Tearing down display");
        self.sink.teardown();
    }
}

/// Fetch, render, present at a fixed rate until told to stop.
pub struct FrameLoop<S: DmxSource> {
    source: S,
    config: SceneConfig,
    clock: FrameClock,
    state: LoopState,
    frames_rendered: u64,
}

impl<S: DmxSource> FrameLoop<S> {
    pub fn new(source: S, settings: &Settings) -> Self {
        Self {
            source,
            config: settings.scene.clone(),
            clock: FrameClock::new(settings.target_fps),
            state: LoopState::Running,
            frames_rendered: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One iteration. A quit request moves the loop to `Stopped` for good.
    pub fn tick(&mut self, quit_requested: bool) -> Tick {
        if quit_requested && self.state == LoopState::Running {
            log::info!(
                "Quit requested, stopping after {} frames",
                self.frames_rendered
            );
            self.state = LoopState::Stopped;
        }

        match self.state {
            LoopState::Stopped => Tick::Stopped,
            LoopState::Running => {
                let buffer = self.source.fetch();
                let frame = render_scene(&buffer, &self.config);
                self.frames_rendered += 1;
                Tick::Frame(frame)
            }
        }
    }

    /// Like `tick`, for hosts that wake up more often than the frame rate.
    ///
    /// Returns `None` while running and no frame is due yet. A quit request
    /// is always acted on.
    pub fn poll(&mut self, quit_requested: bool, now: Instant) -> Option<Tick> {
        if !quit_requested && self.state == LoopState::Running && !self.clock.is_due(now) {
            return None;
        }

        let tick = self.tick(quit_requested);
        if matches!(tick, Tick::Frame(_)) {
            self.clock.tick(now);
        }
        Some(tick)
    }

    /// Drive `sink` until it asks to quit, sleeping between ticks.
    /// Returns the number of frames presented.
    pub fn run<K: FrameSink>(&mut self, sink: &mut K) -> u64 {
        log::info!(
            "Frame loop running at {:.1} fps from {}",
            1.0 / self.clock.period().as_secs_f64(),
            self.source.describe()
        );

        let mut guard = TeardownGuard { sink };
        let mut presented = 0;

        loop {
            let quit = guard.sink.quit_requested();
            match self.tick(quit) {
                Tick::Frame(frame) => {
                    guard.sink.present(&frame);
                    presented += 1;

                    let wait = self.clock.tick(Instant::now());
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
                Tick::Stopped => break,
            }
        }

        drop(guard);
        presented
    }
}
