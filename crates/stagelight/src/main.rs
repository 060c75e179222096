use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use stagelight_core::scene::{ChannelOrder, ColorMode};
use stagelight_core::{
    BackgroundPoller, ConfigManager, DmxSource, FrameLoop, HttpDmxSource, PollMode, Settings,
};

mod headless;

use headless::HeadlessSink;

/// Stage light visualizer driven by DMX values polled over HTTP.
#[derive(Parser, Debug)]
#[command(name = "stagelight")]
#[command(about = "Stagelight stage visualizer")]
struct Args {
    /// Settings file to load (written with defaults if it doesn't exist)
    #[arg(long)]
    config: Option<PathBuf>,

    /// DMX endpoint, without the universe query
    #[arg(long)]
    endpoint: Option<String>,

    /// Universe to poll
    #[arg(short, long)]
    universe: Option<u16>,

    /// Per-fetch timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// How fixture channels become a color: brightness-scaled or raw
    #[arg(long, value_parser = parse_color_mode)]
    color_mode: Option<ColorMode>,

    /// Order of the color slots after red: rgb or rbg
    #[arg(long, value_parser = parse_channel_order)]
    channel_order: Option<ChannelOrder>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Fetch on a background thread instead of inside each frame
    #[arg(long, default_value = "false")]
    background_poll: bool,

    /// Run without a window, logging frame summaries
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Stop after this many frames (headless only)
    #[arg(long, requires = "headless")]
    frames: Option<u64>,
}

fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    s.parse()
}

fn parse_channel_order(s: &str) -> Result<ChannelOrder, String> {
    s.parse()
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            let mut manager = ConfigManager::new(Some(path.clone()));
            let settings = manager
                .load()
                .with_context(|| format!("loading {}", path.display()))?;
            log::info!("Loaded settings from {}", manager.config_path().display());
            settings
        }
        None => Settings::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        settings.source.endpoint = endpoint.clone();
    }
    if let Some(universe) = args.universe {
        settings.source.universe = universe;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.source.timeout_ms = timeout_ms;
    }
    if let Some(color_mode) = args.color_mode {
        settings.scene.color_mode = color_mode;
    }
    if let Some(channel_order) = args.channel_order {
        settings.scene.channel_order = channel_order;
    }
    if let Some(fps) = args.fps {
        settings.target_fps = fps;
    }
    if args.background_poll {
        settings.poll_mode = PollMode::Background;
    }

    ConfigManager::validate_settings(&settings)
        .map_err(|errors| anyhow!("Invalid settings: {}", errors.join(", ")))?;

    Ok(settings)
}

fn open_source(settings: &Settings) -> anyhow::Result<Box<dyn DmxSource>> {
    let num_lights = settings.scene.layout.num_lights;
    let http = HttpDmxSource::new(&settings.source, num_lights)?;

    let source: Box<dyn DmxSource> = match settings.poll_mode {
        PollMode::Blocking => Box::new(http),
        PollMode::Background => {
            let interval = Duration::from_nanos(1_000_000_000 / settings.target_fps.max(1) as u64);
            Box::new(BackgroundPoller::spawn(http, interval, num_lights)?)
        }
    };

    Ok(source)
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = load_settings(&args)?;

    log::info!("Configuring Stagelight:");
    log::info!(
        "Source: {}?u={} (timeout {}ms, {} polling)",
        settings.source.endpoint,
        settings.source.universe,
        settings.source.timeout_ms,
        settings.poll_mode
    );
    log::info!(
        "Scene: {} fixtures, color mode {}, channel order {}",
        settings.scene.layout.num_lights,
        settings.scene.color_mode,
        settings.scene.channel_order
    );
    log::info!("Target FPS: {}", settings.target_fps);

    let source = open_source(&settings)?;
    let mut frame_loop = FrameLoop::new(source, &settings);

    if args.headless {
        let mut sink = HeadlessSink::new(args.frames, settings.target_fps as u64);
        frame_loop.run(&mut sink);
        return Ok(());
    }

    stagelight_ui::run_ui(frame_loop).map_err(|e| anyhow!("UI error: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::parse_from([
            "stagelight",
            "--endpoint",
            "http://10.0.0.5:9090/get_dmx",
            "-u",
            "2",
            "--color-mode",
            "raw",
            "--channel-order",
            "rbg",
            "--fps",
            "25",
            "--background-poll",
        ]);
        let settings = load_settings(&args).unwrap();

        assert_eq!(settings.source.endpoint, "http://10.0.0.5:9090/get_dmx");
        assert_eq!(settings.source.universe, 2);
        assert_eq!(settings.scene.color_mode, ColorMode::Raw);
        assert_eq!(settings.scene.channel_order, ChannelOrder::Rbg);
        assert_eq!(settings.target_fps, 25);
        assert_eq!(settings.poll_mode, PollMode::Background);
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["stagelight"]);
        assert_eq!(load_settings(&args).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::parse_from(["stagelight", "--fps", "0"]);
        assert!(load_settings(&args).is_err());
    }

    #[test]
    fn test_unknown_color_mode_fails_to_parse() {
        assert!(Args::try_parse_from(["stagelight", "--color-mode", "sepia"]).is_err());
    }

    #[test]
    fn test_frames_requires_headless() {
        assert!(Args::try_parse_from(["stagelight", "--frames", "10"]).is_err());
        assert!(Args::try_parse_from(["stagelight", "--headless", "--frames", "10"]).is_ok());
    }
}
