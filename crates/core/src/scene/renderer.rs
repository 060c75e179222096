use super::beam::{beam_segments, BeamSegment};
use super::color::{derive_color, Rgb};
use super::layout::{fixture_position, stage_outline, Position, StageOutline};
use super::SceneConfig;
use crate::dmx::ChannelBuffer;

/// A stage light as seen in a single frame. Nothing carries over between
/// frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightFixture {
    pub index: usize,
    pub position: Position,
    pub radius: f32,
    pub color: Rgb,
    pub brightness: Option<u8>,
    pub saturation: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDraw {
    pub fixture: LightFixture,
    pub beam: Vec<BeamSegment>,
}

/// Everything needed to paint one frame, in draw order: background, stage,
/// then each fixture followed by its beam.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub stage: StageOutline,
    pub fixtures: Vec<FixtureDraw>,
}

impl SceneFrame {
    pub fn segment_count(&self) -> usize {
        self.fixtures.iter().map(|f| f.beam.len()).sum()
    }

    pub fn lit_fixtures(&self) -> usize {
        self.fixtures
            .iter()
            .filter(|f| !f.fixture.color.is_black())
            .count()
    }
}

/// Fixture `index` derived from its channel slots.
///
/// Assumes the buffer holds at least `index + 1` fixtures.
pub fn light_fixture(buffer: &ChannelBuffer, index: usize, config: &SceneConfig) -> LightFixture {
    let derived = derive_color(
        &buffer.fixture(index),
        config.color_mode,
        config.channel_order,
    );

    LightFixture {
        index,
        position: fixture_position(index, &config.layout),
        radius: config.layout.light_radius as f32,
        color: derived.color,
        brightness: derived.brightness,
        saturation: derived.saturation,
    }
}

/// Pure mapping from a channel buffer to a drawable frame.
pub fn render_scene(buffer: &ChannelBuffer, config: &SceneConfig) -> SceneFrame {
    let layout = &config.layout;
    debug_assert_eq!(
        buffer.num_lights(),
        layout.num_lights,
        "channel buffer and layout disagree on fixture count"
    );

    let fixtures = (0..layout.num_lights)
        .map(|index| {
            let fixture = light_fixture(buffer, index, config);
            let beam = beam_segments(&fixture, layout);
            FixtureDraw { fixture, beam }
        })
        .collect();

    SceneFrame {
        width: layout.screen_width as f32,
        height: layout.screen_height as f32,
        background: layout.background,
        stage: stage_outline(layout),
        fixtures,
    }
}
