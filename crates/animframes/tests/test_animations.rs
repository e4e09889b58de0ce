/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
#![cfg(feature = "png")]

use animframes::animframes_core::colorspace::ColorSpace;
use animframes::animframes_core::options::DecoderOptions;
use animframes::{decode_apng, probe_apng, ErrorKind};
use nanorand::Rng;

mod common;

use common::{
    pixel, write_apng, FrameSpec, BLEND_OVER, DISPOSE_BACKGROUND, DISPOSE_NONE, DISPOSE_PREVIOUS
};

const RED: [u8; 4] = [255, 0, 0, 255];

fn random_pixels(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = nanorand::WyRand::new_seed(seed);
    let mut pixels = vec![0_u8; len];
    rng.fill(&mut pixels);
    pixels
}

#[test]
fn test_transparent_over_keeps_red() {
    let frames = [
        FrameSpec::solid(4, 4, 0, 0, RED),
        FrameSpec::solid(2, 2, 1, 1, [0, 0, 0, 0]).blend(BLEND_OVER),
    ];
    let data = write_apng(4, 4, 0, None, &frames);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();

    assert_eq!(sequence.frame_count(), 2);
    assert_eq!(sequence.loop_count(), 0);

    for frame in sequence.frames() {
        assert_eq!(frame.image().dimensions(), (4, 4));
        assert_eq!(frame.image().colorspace(), ColorSpace::RGBA);
        assert_eq!(frame.image().pixels(), RED.repeat(16).as_slice());
        assert!((frame.delay() - 0.1).abs() < 1e-6);
    }
}

#[test]
fn test_max_frames_limits_output() {
    let frames: Vec<FrameSpec> = (0..5)
        .map(|x| FrameSpec::solid(4, 4, 0, 0, [x * 10, 0, 0, 255]))
        .collect();
    let data = write_apng(4, 4, 0, None, &frames);

    let options = DecoderOptions::default().set_max_frames(2);
    let sequence = decode_apng(&data, options).unwrap();

    assert_eq!(sequence.frame_count(), 2);
    assert_eq!(pixel(sequence.frame_image(1).unwrap().pixels(), 4, 0, 0), [10, 0, 0, 255]);
}

#[test]
fn test_padding_frame_extends_previous() {
    let frames = [
        FrameSpec::solid(4, 4, 0, 0, RED).delay(1, 10),
        FrameSpec::solid(2, 2, 0, 0, [0, 255, 0, 255]).delay(1, 4),
        FrameSpec::solid(1, 1, 3, 3, [0, 0, 0, 0])
            .blend(BLEND_OVER)
            .delay(1, 2),
        FrameSpec::solid(1, 1, 3, 0, [0, 0, 255, 255]).delay(1, 10),
    ];
    let data = write_apng(4, 4, 0, None, &frames);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();

    assert_eq!(sequence.frame_count(), 3);
    assert!((sequence.frame_delay(0).unwrap() - 0.1).abs() < 1e-6);
    assert!((sequence.frame_delay(1).unwrap() - 0.75).abs() < 1e-6);
    assert!((sequence.frame_delay(2).unwrap() - 0.1).abs() < 1e-6);
    assert!((sequence.total_duration() - 0.95).abs() < 1e-6);

    let last = sequence.frame_image(2).unwrap().pixels();
    assert_eq!(pixel(last, 4, 0, 0), [0, 255, 0, 255]);
    assert_eq!(pixel(last, 4, 3, 0), [0, 0, 255, 255]);
    assert_eq!(pixel(last, 4, 3, 3), RED);
}

#[test]
fn test_previous_disposal_restores_canvas() {
    let base = random_pixels(1, 8 * 8 * 4);
    let frames = [
        FrameSpec::new(8, 8, 0, 0, base.clone()),
        FrameSpec::new(5, 3, 2, 4, random_pixels(2, 5 * 3 * 4))
            .dispose(DISPOSE_PREVIOUS)
            .blend(BLEND_OVER),
        // fully transparent over, shows exactly what the restore left
        FrameSpec::solid(8, 8, 0, 0, [0, 0, 0, 0]).blend(BLEND_OVER),
    ];
    let data = write_apng(8, 8, 0, None, &frames);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();

    assert_eq!(sequence.frame_count(), 3);
    assert_eq!(sequence.frame_image(0).unwrap().pixels(), base.as_slice());
    assert_eq!(sequence.frame_image(2).unwrap().pixels(), base.as_slice());
}

#[test]
fn test_none_disposal_accumulates() {
    let base = random_pixels(3, 6 * 6 * 4);
    let patch = random_pixels(4, 2 * 3 * 4);

    let frames = [
        FrameSpec::new(6, 6, 0, 0, base.clone()),
        FrameSpec::new(2, 3, 4, 1, patch.clone()).dispose(DISPOSE_NONE),
    ];
    let data = write_apng(6, 6, 0, None, &frames);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();
    let second = sequence.frame_image(1).unwrap().pixels();

    let mut expected = base;
    for (row, src) in patch.chunks_exact(2 * 4).enumerate() {
        let start = ((1 + row) * 6 + 4) * 4;
        expected[start..start + 8].copy_from_slice(src);
    }
    assert_eq!(second, expected.as_slice());
}

#[test]
fn test_background_disposal_clears() {
    let frames = [
        FrameSpec::solid(4, 4, 0, 0, RED).dispose(DISPOSE_BACKGROUND),
        FrameSpec::solid(1, 1, 0, 0, [1, 2, 3, 255]),
    ];
    let data = write_apng(4, 4, 0, None, &frames);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();
    let second = sequence.frame_image(1).unwrap().pixels();

    assert_eq!(pixel(second, 4, 0, 0), [1, 2, 3, 255]);
    assert_eq!(pixel(second, 4, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn test_hidden_default_image_seeds_canvas() {
    let hidden = RED.repeat(16);
    let frames = [
        FrameSpec::solid(2, 2, 0, 0, [0, 0, 255, 255]),
        FrameSpec::solid(1, 1, 3, 3, [0, 255, 0, 255]),
    ];
    let data = write_apng(4, 4, 2, Some(hidden.as_slice()), &frames);

    let info = probe_apng(&data, DecoderOptions::default()).unwrap();
    assert!(info.first_frame_hidden);
    assert_eq!(info.frame_count, 2);

    let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();
    assert_eq!(sequence.frame_count(), 2);
    assert_eq!(sequence.loop_count(), 2);

    let first = sequence.frame_image(0).unwrap().pixels();
    assert_eq!(pixel(first, 4, 0, 0), [0, 0, 255, 255]);
    assert_eq!(pixel(first, 4, 3, 3), RED);

    let second = sequence.frame_image(1).unwrap().pixels();
    assert_eq!(pixel(second, 4, 3, 3), [0, 255, 0, 255]);
    assert_eq!(pixel(second, 4, 2, 2), RED);
}

#[test]
fn test_animation_disabled_gives_default_image() {
    let frames = [
        FrameSpec::solid(4, 4, 0, 0, RED),
        FrameSpec::solid(4, 4, 0, 0, [0, 0, 255, 255]),
    ];
    let data = write_apng(4, 4, 0, None, &frames);

    let options = DecoderOptions::default().set_decode_animated(false);
    let sequence = decode_apng(&data, options).unwrap();

    assert_eq!(sequence.frame_count(), 1);
    assert_eq!(sequence.frame_image(0).unwrap().pixels(), RED.repeat(16).as_slice());
}

#[test]
fn test_error_kinds() {
    let frames = [
        FrameSpec::solid(4, 4, 0, 0, RED),
        FrameSpec::solid(4, 4, 0, 0, RED),
    ];
    let data = write_apng(4, 4, 0, None, &frames);

    let err = decode_apng(&data[..data.len() - 40], DecoderOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptStream);

    let mut bad = data.clone();
    bad[1] = b'X';
    let err = decode_apng(&bad, DecoderOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

    let options = DecoderOptions::default().set_max_width(2);
    let err = decode_apng(&data, options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
}
