mod beam;
mod color;
mod layout;
mod renderer;

use serde::{Deserialize, Serialize};

pub use beam::{
    beam_heights, beam_intensity, beam_segments, beam_width, segments_per_beam, BeamSegment,
};
pub use color::{derive_color, scale_component, ChannelOrder, ColorMode, DerivedColor, Rgb};
pub use layout::{fixture_position, stage_outline, Position, StageLayout, StageOutline};
pub use renderer::{light_fixture, render_scene, FixtureDraw, LightFixture, SceneFrame};

/// Renderer configuration: layout plus the channel interpretation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: StageLayout,
    pub color_mode: ColorMode,
    pub channel_order: ChannelOrder,
}
