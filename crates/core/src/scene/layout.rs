use serde::{Deserialize, Serialize};

use super::color::Rgb;

/// Fixed geometry of the canvas, the stage and the fixtures on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayout {
    pub screen_width: u32,
    pub screen_height: u32,
    pub num_lights: usize,
    pub light_radius: u32,
    pub stage_width: u32,
    pub stage_height: u32,
    /// Only used for the fixture z coordinate, which the 2D view ignores
    pub stage_depth: u32,
    pub stage_color: Rgb,
    pub stage_outline: u32,
    /// Vertical step between beam segments
    pub beam_speed: u32,
    pub max_beam_width: f32,
    pub beam_line_width: u32,
    pub background: Rgb,
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            num_lights: 8,
            light_radius: 10,
            stage_width: 600,
            stage_height: 100,
            stage_depth: 100,
            stage_color: Rgb::new(100, 100, 100),
            stage_outline: 3,
            beam_speed: 3,
            max_beam_width: 30.0,
            beam_line_width: 2,
            background: Rgb::BLACK,
        }
    }
}

/// Stage coordinates; `z` is carried but not projected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Outlined stage rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageOutline {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    pub thickness: f32,
}

/// Fixtures sit evenly spaced in a band above the stage footprint, left to
/// right in index order, on the bottom edge of the canvas.
pub fn fixture_position(index: usize, layout: &StageLayout) -> Position {
    let fraction = (index + 1) as f32 / (layout.num_lights + 1) as f32;
    let band = layout.screen_width as f32 - layout.stage_width as f32;

    Position {
        x: fraction * band + layout.stage_width as f32 / 2.0,
        y: layout.screen_height as f32 - layout.light_radius as f32,
        z: (layout.stage_depth / 2) as f32,
    }
}

pub fn stage_outline(layout: &StageLayout) -> StageOutline {
    let x = layout.screen_width.saturating_sub(layout.stage_width) / 2;
    let y = layout.screen_height.saturating_sub(layout.stage_height);

    StageOutline {
        x: x as f32,
        y: y as f32,
        width: layout.stage_width as f32,
        height: layout.stage_height as f32,
        color: layout.stage_color,
        thickness: layout.stage_outline as f32,
    }
}
