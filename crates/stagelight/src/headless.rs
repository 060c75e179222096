use stagelight_core::scene::SceneFrame;
use stagelight_core::FrameSink;

/// Runs the frame loop without a window, logging a summary of each frame.
/// Stops after `frame_limit` frames when one is given.
pub struct HeadlessSink {
    frame_limit: Option<u64>,
    report_every: u64,
    presented: u64,
}

impl HeadlessSink {
    pub fn new(frame_limit: Option<u64>, report_every: u64) -> Self {
        Self {
            frame_limit,
            report_every: report_every.max(1),
            presented: 0,
        }
    }
}

impl FrameSink for HeadlessSink {
    fn quit_requested(&mut self) -> bool {
        self.frame_limit
            .is_some_and(|limit| self.presented >= limit)
    }

    fn present(&mut self, frame: &SceneFrame) {
        self.presented += 1;

        let lit = frame.lit_fixtures();
        if self.presented % self.report_every == 0 {
            log::info!(
                "Frame {}: {}/{} fixtures lit, {} beam segments",
                self.presented,
                lit,
                frame.fixtures.len(),
                frame.segment_count()
            );
        } else {
            log::debug!("Frame {}: {} fixtures lit", self.presented, lit);
        }
    }

    fn teardown(&mut self) {
        log::info!("Headless run finished after {} frames", self.presented);
    }
}
