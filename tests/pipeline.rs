use rand::{rngs::SmallRng, Rng, SeedableRng};

use underwater_enhancer::filters::{dehaze, gamma, Stage};
use underwater_enhancer::imgproc::to_gray;
use underwater_enhancer::{EnhanceParams, EnhancePipeline, Frame, ParamEvent, ParamKind};

fn noisy_frame(width: u32, height: u32, seed: u64) -> Frame {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut frame = Frame::new_filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            // blue-green biased, like most underwater footage
            let r = rng.gen_range(0..90u8);
            let g = rng.gen_range(60..200u8);
            let b = rng.gen_range(80..230u8);
            frame.set_pixel(x, y, [r, g, b]);
        }
    }
    frame
}

#[test]
fn test_golden_solid_frame() {
    let input = Frame::new_filled(3, 3, [30, 110, 140]);
    let output = EnhancePipeline::new()
        .process(&input, &EnhanceParams::default())
        .unwrap();
    assert_eq!(output, Frame::new_filled(3, 3, [255, 255, 255]));
}

#[test]
fn test_pipeline_is_deterministic() {
    let frame = noisy_frame(61, 47, 7);
    let pipeline = EnhancePipeline::new();
    let params = EnhanceParams {
        a_shift: 5,
        b_shift: -8,
        omega: 0.6,
        clahe_clip: 2.5,
        red_strength: 70,
    };

    let first = pipeline.process(&frame, &params).unwrap();
    let second = pipeline.process(&frame, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tiny_frames_keep_their_size() {
    let pipeline = EnhancePipeline::new();
    for (w, h) in [(1, 1), (1, 5), (5, 1), (2, 2), (9, 3)] {
        let frame = noisy_frame(w, h, (w * 31 + h) as u64);
        let output = pipeline.process(&frame, &EnhanceParams::default()).unwrap();
        assert_eq!(output.dimensions(), (w, h));
    }
}

#[test]
fn test_every_stage_handles_extremes() {
    let params = EnhanceParams::default();
    for color in [[0, 0, 0], [255, 255, 255]] {
        for stage in Stage::ORDER {
            let mut frame = Frame::new_filled(4, 4, color);
            stage.apply(&mut frame, &params);
            assert_eq!(frame.dimensions(), (4, 4));
        }
    }
}

#[test]
fn test_slider_extremes_are_valid_parameters() {
    let frame = noisy_frame(32, 24, 3);
    let pipeline = EnhancePipeline::new();

    for kind in ParamKind::ALL {
        for value in [*kind.range().start(), *kind.range().end()] {
            let mut params = EnhanceParams::default();
            params.apply(ParamEvent::new(kind, value)).unwrap();
            let output = pipeline.process(&frame, &params).unwrap();
            assert_eq!(output.dimensions(), (32, 24));
        }
    }
}

#[test]
fn test_enhancement_reduces_color_cast() {
    let frame = noisy_frame(64, 64, 11);
    let output = EnhancePipeline::new()
        .process(&frame, &EnhanceParams::default())
        .unwrap();

    let mean = |f: &Frame, c: usize| {
        f.as_rgb_bytes().iter().skip(c).step_by(3).map(|&v| v as f64).sum::<f64>()
            / (f.width() * f.height()) as f64
    };

    let before = mean(&frame, 2) - mean(&frame, 0);
    let after = mean(&output, 2) - mean(&output, 0);
    assert!(after.abs() < before.abs());
}

#[test]
fn test_haze_transmission_bounds() {
    let frame = Frame::new_filled(8, 8, [120, 120, 120]);
    let gray = to_gray(frame.as_image());
    let a = dehaze::atmospheric_light(&gray);
    let map = dehaze::transmission_map(&gray, a, 0.75);
    assert!(map.iter().all(|&t| t == dehaze::T_MIN));

    let black = to_gray(Frame::new_filled(8, 8, [0, 0, 0]).as_image());
    let a = dehaze::atmospheric_light(&black);
    let map = dehaze::transmission_map(&black, a, 0.75);
    assert!(map.iter().all(|&t| t == 1.0));
}

#[test]
fn test_gamma_roundtrip_on_frame() {
    let original = noisy_frame(16, 16, 5);
    let mut frame = original.clone();
    gamma::apply_gamma(&mut frame, gamma::GAMMA);
    gamma::apply_gamma(&mut frame, 1.0 / gamma::GAMMA);

    for (a, b) in original.as_rgb_bytes().iter().zip(frame.as_rgb_bytes()) {
        assert!((*a as i16 - *b as i16).abs() <= 2);
    }
}
