/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Padding frame detection
//!
//! Some encoders stretch the display time of a frame by appending a
//! 1x1 fully transparent sub-frame blended over the canvas. Such frames
//! change nothing, so instead of emitting a duplicate frame their delay is
//! folded into the frame before them.
use animframes_core::frame::{BlendOp, SubFrame};

/// Return true if `frame`, the sub-frame at `index` in display order,
/// only pads the display time of its predecessor
///
/// The first sub-frame is never padding.
pub fn is_padding_frame(frame: &SubFrame, index: usize) -> bool {
    index != 0
        && frame.width == 1
        && frame.height == 1
        && frame.blend == BlendOp::Over
        && !frame.pixels.is_empty()
        && frame.pixels.iter().all(|x| *x == 0)
}

#[cfg(test)]
mod tests {
    use animframes_core::frame::{BlendOp, SubFrame};

    use crate::elision::is_padding_frame;

    fn padding() -> SubFrame {
        SubFrame {
            width: 1,
            height: 1,
            blend: BlendOp::Over,
            pixels: vec![0; 4],
            ..Default::default()
        }
    }

    #[test]
    fn test_padding_detected() {
        assert!(is_padding_frame(&padding(), 1));
    }

    #[test]
    fn test_first_frame_never_padding() {
        assert!(!is_padding_frame(&padding(), 0));
    }

    #[test]
    fn test_near_padding_frames() {
        let mut frame = padding();
        frame.blend = BlendOp::Source;
        assert!(!is_padding_frame(&frame, 3));

        let mut frame = padding();
        frame.pixels[3] = 1;
        assert!(!is_padding_frame(&frame, 3));

        let mut frame = padding();
        frame.width = 2;
        frame.pixels = vec![0; 8];
        assert!(!is_padding_frame(&frame, 3));
    }
}
