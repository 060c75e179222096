pub use config::{ConfigError, ConfigManager, ConfigSchema, PollMode, Settings, SourceConfig};
pub use dmx::{
    parse_dmx_response, BackgroundPoller, ChannelBuffer, DmxSource, FetchError, FetchHealth,
    FixtureChannels, HttpDmxSource, LatestBuffer, CHANNELS_PER_FIXTURE,
};
pub use frame_loop::{FrameClock, FrameLoop, FrameSink, LoopState, Tick};

mod config;
pub mod dmx;
mod frame_loop;
pub mod scene;
