mod channel_buffer;
mod http_source;
mod poller;
mod source;

pub use channel_buffer::{ChannelBuffer, FixtureChannels, CHANNELS_PER_FIXTURE};
pub use http_source::{parse_dmx_response, HttpDmxSource};
pub use poller::{BackgroundPoller, LatestBuffer};
pub use source::{DmxSource, FetchError, FetchHealth};
