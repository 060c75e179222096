use std::time::Instant;

use eframe::egui::{self, Color32};
use stagelight_core::scene::SceneFrame;
use stagelight_core::{DmxSource, FrameLoop, LoopState, Tick};

mod painter;

pub use painter::{paint_scene, scene_shapes};

pub const WINDOW_TITLE: &str = "ArtNet Simulator";

/// Window-backed frame loop. Window close is the quit signal; the loop owns
/// the data source, so dropping the app releases it.
pub struct VisualizerApp {
    frame_loop: FrameLoop<Box<dyn DmxSource>>,
    last_frame: Option<SceneFrame>,
    torn_down: bool,
}

impl VisualizerApp {
    fn new(_cc: &eframe::CreationContext<'_>, frame_loop: FrameLoop<Box<dyn DmxSource>>) -> Self {
        log::info!(
            "Visualizer window open, polling {}",
            frame_loop.source().describe()
        );

        Self {
            frame_loop,
            last_frame: None,
            torn_down: false,
        }
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.last_frame = None;
        log::info!(
            "Tearing down display after {} frames",
            self.frame_loop.frames_rendered()
        );
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let quit = ctx.input(|i| i.viewport().close_requested());

        // Input events repaint too; those only redraw the last frame
        match self.frame_loop.poll(quit, Instant::now()) {
            Some(Tick::Frame(frame)) => self.last_frame = Some(frame),
            Some(Tick::Stopped) => {
                self.teardown();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            None => {}
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(frame) = &self.last_frame {
                    paint_scene(ui.painter(), ui.max_rect().min, frame);
                }
            });

        if self.frame_loop.state() == LoopState::Running {
            let wait = self.frame_loop.clock().remaining(Instant::now());
            ctx.request_repaint_after(wait);
        }
    }
}

impl Drop for VisualizerApp {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub fn run_ui(frame_loop: FrameLoop<Box<dyn DmxSource>>) -> eframe::Result {
    let layout = &frame_loop.config().layout;
    let size = [layout.screen_width as f32, layout.screen_height as f32];

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_app_id("io.github.robmorgan.stagelight")
            .with_inner_size(size)
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(|cc| Ok(Box::new(VisualizerApp::new(cc, frame_loop)))),
    )
}
