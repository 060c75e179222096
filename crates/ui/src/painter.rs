use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke, Vec2};
use stagelight_core::scene::{Rgb, SceneFrame};

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Turn a scene frame into egui shapes, offset by the canvas origin.
///
/// Order matches the frame: background, stage outline, then each fixture
/// followed by its beam.
pub fn scene_shapes(origin: Pos2, frame: &SceneFrame) -> Vec<Shape> {
    let offset = origin.to_vec2();
    let mut shapes = Vec::with_capacity(2 + frame.fixtures.len() + frame.segment_count());

    shapes.push(Shape::rect_filled(
        Rect::from_min_size(origin, Vec2::new(frame.width, frame.height)),
        0.0,
        color(frame.background),
    ));

    let stage = &frame.stage;
    shapes.push(Shape::rect_stroke(
        Rect::from_min_size(
            Pos2::new(stage.x, stage.y) + offset,
            Vec2::new(stage.width, stage.height),
        ),
        0.0,
        Stroke::new(stage.thickness, color(stage.color)),
        egui::StrokeKind::Inside,
    ));

    for draw in &frame.fixtures {
        let fixture = &draw.fixture;
        shapes.push(Shape::circle_filled(
            Pos2::new(fixture.position.x, fixture.position.y) + offset,
            fixture.radius,
            color(fixture.color),
        ));

        for segment in &draw.beam {
            shapes.push(Shape::line_segment(
                [
                    Pos2::new(segment.x_start, segment.y) + offset,
                    Pos2::new(segment.x_end, segment.y) + offset,
                ],
                Stroke::new(segment.thickness, color(segment.color)),
            ));
        }
    }

    shapes
}

pub fn paint_scene(painter: &egui::Painter, origin: Pos2, frame: &SceneFrame) {
    painter.extend(scene_shapes(origin, frame));
}

#[cfg(test)]
mod tests {
    use stagelight_core::scene::{render_scene, SceneConfig, StageLayout};
    use stagelight_core::ChannelBuffer;

    use super::*;

    #[test]
    fn test_shape_count() {
        let frame = render_scene(&ChannelBuffer::blackout(8), &SceneConfig::default());
        let shapes = scene_shapes(Pos2::ZERO, &frame);

        assert_eq!(shapes.len(), 2 + 8 + 8 * 200);
    }

    #[test]
    fn test_shapes_are_offset_by_origin() {
        let config = SceneConfig {
            layout: StageLayout {
                num_lights: 1,
                ..StageLayout::default()
            },
            ..SceneConfig::default()
        };
        let frame = render_scene(&ChannelBuffer::blackout(1), &config);
        let shapes = scene_shapes(Pos2::new(10.0, 20.0), &frame);

        assert_eq!(shapes.len(), 2 + 1 + 200);

        match &shapes[0] {
            Shape::Rect(rect) => {
                assert_eq!(rect.rect.min, Pos2::new(10.0, 20.0));
                assert_eq!(rect.fill, Color32::BLACK);
            }
            other => panic!("Expected background rect, got {:?}", other),
        }

        match &shapes[2] {
            Shape::Circle(circle) => {
                assert_eq!(circle.center, Pos2::new(410.0, 610.0));
                assert_eq!(circle.radius, 10.0);
            }
            other => panic!("Expected fixture circle, got {:?}", other),
        }
    }
}
