use super::color::Rgb;
use super::layout::StageLayout;
use super::renderer::LightFixture;

/// Distance-to-width ratio of the stylized beam cone
const BEAM_SPREAD: f32 = 10.0;

/// One horizontal slice of a beam cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSegment {
    pub y: f32,
    pub x_start: f32,
    pub x_end: f32,
    pub width: f32,
    pub color: Rgb,
    /// `min(brightness * 2, 255)`, only in the brightness-scaled mode
    pub intensity: Option<u8>,
    pub thickness: f32,
}

/// `min(distance / 10, max_width)`
pub fn beam_width(distance: f32, max_width: f32) -> f32 {
    (distance / BEAM_SPREAD).min(max_width)
}

pub fn beam_intensity(brightness: u8) -> u8 {
    brightness.saturating_mul(2)
}

/// Sample heights `0, speed, 2*speed, ...` below the screen height.
pub fn beam_heights(layout: &StageLayout) -> impl Iterator<Item = u32> {
    (0..layout.screen_height).step_by(layout.beam_speed.max(1) as usize)
}

pub fn segments_per_beam(layout: &StageLayout) -> usize {
    layout.screen_height.div_ceil(layout.beam_speed.max(1)) as usize
}

pub fn beam_segments(fixture: &LightFixture, layout: &StageLayout) -> Vec<BeamSegment> {
    let intensity = fixture.brightness.map(beam_intensity);
    let bottom = layout.screen_height as f32;

    beam_heights(layout)
        .map(|h| {
            let y = h as f32;
            let width = beam_width((bottom - y).abs(), layout.max_beam_width);
            BeamSegment {
                y,
                x_start: fixture.position.x - width / 2.0,
                x_end: fixture.position.x + width / 2.0,
                width,
                color: fixture.color,
                intensity,
                thickness: layout.beam_line_width as f32,
            }
        })
        .collect()
}
