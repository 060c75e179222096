use approx::assert_relative_eq;
use stagelight_core::scene::{
    fixture_position, render_scene, ChannelOrder, ColorMode, Rgb, SceneConfig, StageLayout,
};
use stagelight_core::{ChannelBuffer, CHANNELS_PER_FIXTURE};

fn config(color_mode: ColorMode) -> SceneConfig {
    SceneConfig {
        color_mode,
        ..SceneConfig::default()
    }
}

fn red_first_fixture() -> ChannelBuffer {
    let mut values = vec![0i64; 8 * CHANNELS_PER_FIXTURE];
    values[..5].copy_from_slice(&[255, 255, 0, 0, 0]);
    ChannelBuffer::from_values(&values, 8).unwrap()
}

/// Cheap deterministic value spread over 0..=255
fn pseudo_buffer(seed: u64) -> ChannelBuffer {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let values: Vec<i64> = (0..40)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 256) as i64
        })
        .collect();
    ChannelBuffer::from_values(&values, 8).unwrap()
}

#[test]
fn test_draw_counts_for_any_buffer() {
    for seed in 0..50 {
        let buffer = pseudo_buffer(seed);
        for mode in [ColorMode::BrightnessScaled, ColorMode::Raw] {
            let frame = render_scene(&buffer, &config(mode));
            assert_eq!(frame.fixtures.len(), 8);
            assert_eq!(frame.segment_count(), 8 * (600 / 3));
        }
    }
}

#[test]
fn test_fixture_x_strictly_increasing_inside_band() {
    let layout = StageLayout::default();
    let frame = render_scene(&ChannelBuffer::blackout(8), &SceneConfig::default());

    let xs: Vec<f32> = frame.fixtures.iter().map(|f| f.fixture.position.x).collect();
    for pair in xs.windows(2) {
        assert!(pair[1] > pair[0]);
    }

    let low = layout.stage_width as f32 / 2.0;
    let high = low + (layout.screen_width - layout.stage_width) as f32;
    for (i, x) in xs.iter().enumerate() {
        assert!(*x > low && *x < high);
        assert_relative_eq!(*x, 300.0 + 200.0 * (i + 1) as f32 / 9.0, epsilon = 1e-3);
    }
}

#[test]
fn test_beam_widens_towards_top_and_caps() {
    let frame = render_scene(&red_first_fixture(), &SceneConfig::default());
    let beam = &frame.fixtures[0].beam;

    // Segments run top to bottom, so width never grows as we walk the list
    for pair in beam.windows(2) {
        assert!(pair[1].width <= pair[0].width);
    }
    assert_relative_eq!(beam[0].y, 0.0);
    assert_relative_eq!(beam[0].width, 30.0);
    assert!(beam.iter().all(|s| s.width <= 30.0));

    let x = frame.fixtures[0].fixture.position.x;
    for segment in beam {
        assert_relative_eq!((segment.x_start + segment.x_end) / 2.0, x, epsilon = 1e-3);
    }

    let last = beam.last().unwrap();
    assert_relative_eq!(last.y, 597.0);
    assert_relative_eq!(last.width, 0.3, epsilon = 1e-5);
}

#[test]
fn test_blackout_renders_everything_black() {
    for mode in [ColorMode::BrightnessScaled, ColorMode::Raw] {
        let frame = render_scene(&ChannelBuffer::blackout(8), &config(mode));

        assert_eq!(frame.fixtures.len(), 8);
        assert_eq!(frame.lit_fixtures(), 0);
        for draw in &frame.fixtures {
            assert_eq!(draw.fixture.color, Rgb::BLACK);
            assert!(draw.beam.iter().all(|s| s.color == Rgb::BLACK));
        }
    }
}

#[test]
fn test_single_red_fixture_raw() {
    let frame = render_scene(&red_first_fixture(), &config(ColorMode::Raw));

    assert_eq!(frame.fixtures[0].fixture.color, Rgb::new(255, 0, 0));
    assert!(frame.fixtures[0].beam.iter().all(|s| s.intensity.is_none()));
    for draw in &frame.fixtures[1..] {
        assert_eq!(draw.fixture.color, Rgb::BLACK);
    }

    let leftmost = fixture_position(0, &StageLayout::default());
    assert_relative_eq!(frame.fixtures[0].fixture.position.x, leftmost.x);
    assert_relative_eq!(leftmost.x, 300.0 + 200.0 / 9.0, epsilon = 1e-3);
}

#[test]
fn test_single_red_fixture_scaled() {
    let frame = render_scene(&red_first_fixture(), &config(ColorMode::BrightnessScaled));
    let first = &frame.fixtures[0];

    // 255 * 255 / 255 keeps full red
    assert_eq!(first.fixture.color, Rgb::new(255, 0, 0));
    assert_eq!(first.fixture.brightness, Some(255));
    assert!(first
        .beam
        .iter()
        .all(|s| s.color == Rgb::new(255, 0, 0) && s.intensity == Some(255)));
    assert_eq!(frame.lit_fixtures(), 1);
}

#[test]
fn test_scaled_and_raw_diverge_on_partial_brightness() {
    let mut values = vec![0i64; 40];
    values[..5].copy_from_slice(&[51, 200, 100, 50, 0]);
    let buffer = ChannelBuffer::from_values(&values, 8).unwrap();

    let raw = render_scene(&buffer, &config(ColorMode::Raw));
    let scaled = render_scene(&buffer, &config(ColorMode::BrightnessScaled));

    assert_eq!(raw.fixtures[0].fixture.color, Rgb::new(200, 100, 50));
    assert_eq!(scaled.fixtures[0].fixture.color, Rgb::new(40, 20, 10));
    assert_eq!(scaled.fixtures[0].beam[0].intensity, Some(102));
}

#[test]
fn test_channel_order_option() {
    let mut values = vec![0i64; 40];
    values[..5].copy_from_slice(&[255, 10, 20, 30, 0]);
    let buffer = ChannelBuffer::from_values(&values, 8).unwrap();

    let swapped = SceneConfig {
        color_mode: ColorMode::Raw,
        channel_order: ChannelOrder::Rbg,
        ..SceneConfig::default()
    };
    let frame = render_scene(&buffer, &swapped);
    assert_eq!(frame.fixtures[0].fixture.color, Rgb::new(10, 30, 20));
}

#[test]
fn test_render_is_idempotent() {
    let buffer = pseudo_buffer(7);
    let config = SceneConfig::default();

    assert_eq!(render_scene(&buffer, &config), render_scene(&buffer, &config));
}

#[test]
fn test_stage_is_static() {
    let a = render_scene(&pseudo_buffer(1), &SceneConfig::default());
    let b = render_scene(&pseudo_buffer(2), &SceneConfig::default());

    assert_eq!(a.stage, b.stage);
    assert_eq!(a.background, Rgb::BLACK);
    assert_relative_eq!(a.width, 800.0);
    assert_relative_eq!(a.height, 600.0);
}

#[test]
fn test_custom_layout_counts() {
    let config = SceneConfig {
        layout: StageLayout {
            num_lights: 3,
            screen_height: 100,
            beam_speed: 7,
            ..StageLayout::default()
        },
        ..SceneConfig::default()
    };
    let frame = render_scene(&ChannelBuffer::blackout(3), &config);

    assert_eq!(frame.fixtures.len(), 3);
    // 0, 7, ..., 98
    assert_eq!(frame.segment_count(), 3 * 15);
}
