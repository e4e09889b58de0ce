/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode driver
//!
//! Pulls sub-frames from any [`FrameSource`], composites them and
//! collects the result into a [`FrameSequence`].
use log::{info, trace};

use animframes_core::frame::FrameSource;
use animframes_core::options::DecoderOptions;

use crate::compositor::Compositor;
use crate::elision::is_padding_frame;
use crate::errors::AnimationErrors;
use crate::sequence::{FrameImage, FrameSequence};

/// Decode every frame of `source` into a frame sequence
///
/// At most [`DecoderOptions::get_max_frames`] frames are produced when
/// the limit is non zero, hitting it is not an error.
///
/// # Errors
/// Any error from the frame source or the compositor aborts the decode,
/// a stream ending before its declared frames have been produced is
/// a corrupt stream.
pub fn decode_frames<S>(
    source: &mut S, options: &DecoderOptions
) -> Result<FrameSequence, AnimationErrors>
where
    S: FrameSource,
    AnimationErrors: From<S::Error>
{
    let info = source.begin()?;

    info!("Canvas: {}x{} {:?}", info.width, info.height, info.colorspace);
    info!("Animated: {}", info.is_animated);
    info!("Declared frames: {}", info.frame_count);

    let mut compositor = Compositor::new(info.width, info.height, info.colorspace)?;

    if info.first_frame_hidden {
        let hidden = source
            .next_sub_frame()?
            .ok_or("Stream ended before the hidden frame")?;
        compositor.seed(&hidden)?;
    }

    let declared = if info.is_animated {
        info.frame_count
    } else {
        1
    };
    let mut capacity = match options.get_max_frames() {
        0 => declared,
        max => declared.min(max)
    };

    let mut sequence = FrameSequence::new();
    sequence.set_loop_count(info.loop_count);
    sequence.set_frame_count(capacity)?;

    let mut emitted = 0;
    let mut paddings = 0;
    let mut index = 0;

    while emitted < capacity {
        let frame = source.next_sub_frame()?.ok_or_else(|| {
            AnimationErrors::CorruptStream(format!(
                "Stream ended after {emitted} of {capacity} frames"
            ))
        })?;

        if is_padding_frame(&frame, index) {
            // Padding never becomes the previous sub-frame, its dispose op is
            // ignored and the last rendered frame's disposal applies next.
            // emitted is non zero since the first frame is never padding
            let previous = emitted - 1;
            let delay = sequence.frame_delay(previous).unwrap_or(0.0) + frame.delay();
            sequence.set_frame_delay(previous, delay)?;

            paddings += 1;
            capacity = capacity
                .min(declared.saturating_sub(paddings))
                .max(emitted);
            sequence.set_frame_count(capacity)?;

            trace!("Sub-frame {index} is padding, frame {previous} now lasts {delay} s");
            index += 1;
            continue;
        }
        let pixels = compositor.render(&frame)?;
        let image = FrameImage::new(info.width, info.height, info.colorspace, pixels)?;

        sequence.set_frame_image(emitted, image)?;
        sequence.set_frame_delay(emitted, frame.delay())?;

        emitted += 1;
        index += 1;
    }
    compositor.finish();

    info!("Decoded {emitted} frames");

    Ok(sequence)
}

/// Decode an animated png into a frame sequence
///
/// Non animated pngs, or animated ones decoded with
/// [`set_decode_animated(false)`](DecoderOptions::set_decode_animated), give a
/// single frame holding the default image.
///
/// # Example
/// ```no_run
/// use animframes::decoder::decode_apng;
/// use animframes::animframes_core::options::DecoderOptions;
///
/// let data = std::fs::read("animation.png").unwrap();
/// let sequence = decode_apng(&data, DecoderOptions::default()).unwrap();
///
/// for frame in sequence.frames() {
///     println!("{:?} for {} s", frame.image().dimensions(), frame.delay());
/// }
/// ```
#[cfg(feature = "png")]
pub fn decode_apng(data: &[u8], options: DecoderOptions) -> Result<FrameSequence, AnimationErrors> {
    #[cfg(not(feature = "apng"))]
    let options = {
        log::warn!("Animated png support is not compiled in, decoding the default image only");
        options.set_decode_animated(false)
    };
    let mut decoder = animframes_png::PngDecoder::new_with_options(data, options);

    decode_frames(&mut decoder, &options)
}

/// Read the headers of a png and return its animation information
/// without decoding any frames
#[cfg(feature = "png")]
pub fn probe_apng(
    data: &[u8], options: DecoderOptions
) -> Result<animframes_core::frame::AnimationInfo, AnimationErrors> {
    #[cfg(not(feature = "apng"))]
    let options = options.set_decode_animated(false);

    let mut decoder = animframes_png::PngDecoder::new_with_options(data, options);

    Ok(decoder.begin()?)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use animframes_core::colorspace::ColorSpace;
    use animframes_core::frame::{AnimationInfo, BlendOp, DisposeOp, FrameSource, SubFrame};
    use animframes_core::options::DecoderOptions;

    use crate::decoder::decode_frames;
    use crate::errors::{AnimationErrors, ErrorKind};

    /// A frame source replaying prepared sub-frames
    struct ScriptedSource {
        info:   AnimationInfo,
        frames: VecDeque<SubFrame>
    }

    impl FrameSource for ScriptedSource {
        type Error = AnimationErrors;

        fn begin(&mut self) -> Result<AnimationInfo, AnimationErrors> {
            Ok(self.info)
        }

        fn next_sub_frame(&mut self) -> Result<Option<SubFrame>, AnimationErrors> {
            Ok(self.frames.pop_front())
        }
    }

    fn luma(x: usize, value: u8, dispose: DisposeOp) -> SubFrame {
        SubFrame {
            width: 1,
            height: 1,
            x_offset: x,
            delay_num: 1,
            delay_den: 10,
            dispose,
            pixels: vec![value],
            ..Default::default()
        }
    }

    fn source(frames: Vec<SubFrame>, declared: usize, hidden: bool) -> ScriptedSource {
        ScriptedSource {
            info:   AnimationInfo {
                width: 2,
                height: 1,
                colorspace: ColorSpace::Luma,
                is_animated: true,
                frame_count: declared,
                loop_count: 3,
                first_frame_hidden: hidden
            },
            frames: frames.into()
        }
    }

    #[test]
    fn test_cumulative_none_disposal() {
        let frames = vec![luma(0, 10, DisposeOp::None), luma(1, 20, DisposeOp::None)];
        let mut src = source(frames, 2, false);

        let sequence = decode_frames(&mut src, &DecoderOptions::default()).unwrap();
        assert_eq!(sequence.frame_count(), 2);
        assert_eq!(sequence.loop_count(), 3);
        assert_eq!(sequence.frame_image(0).unwrap().pixels(), &[10, 0]);
        assert_eq!(sequence.frame_image(1).unwrap().pixels(), &[10, 20]);
    }

    #[test]
    fn test_hidden_frame_not_emitted() {
        let frames = vec![
            SubFrame {
                width: 2,
                height: 1,
                pixels: vec![5, 5],
                ..Default::default()
            },
            luma(1, 9, DisposeOp::None),
        ];
        let mut src = source(frames, 1, true);

        let sequence = decode_frames(&mut src, &DecoderOptions::default()).unwrap();
        assert_eq!(sequence.frame_count(), 1);
        assert_eq!(sequence.frame_image(0).unwrap().pixels(), &[5, 9]);
    }

    #[test]
    fn test_max_frames_stops_early() {
        let frames = (0..5).map(|x| luma(0, x, DisposeOp::None)).collect();
        let mut src = source(frames, 5, false);
        let options = DecoderOptions::default().set_max_frames(2);

        let sequence = decode_frames(&mut src, &options).unwrap();
        assert_eq!(sequence.frame_count(), 2);
        // the rest is never pulled
        assert_eq!(src.frames.len(), 3);
    }

    #[test]
    fn test_padding_folded_into_previous() {
        let mut padding = luma(0, 0, DisposeOp::None);
        padding.blend = BlendOp::Over;
        padding.delay_num = 3;

        let frames = vec![
            luma(0, 10, DisposeOp::None),
            padding,
            luma(1, 20, DisposeOp::None),
        ];
        let mut src = source(frames, 3, false);

        let sequence = decode_frames(&mut src, &DecoderOptions::default()).unwrap();
        assert_eq!(sequence.frame_count(), 2);
        assert!((sequence.frame_delay(0).unwrap() - 0.4).abs() < 1e-6);
        assert!((sequence.frame_delay(1).unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(sequence.frame_image(1).unwrap().pixels(), &[10, 20]);
    }

    #[test]
    fn test_padding_dispose_is_ignored() {
        let frame = |pixels: Vec<u8>, dispose, blend| SubFrame {
            width: 1,
            height: 1,
            delay_num: 1,
            delay_den: 10,
            dispose,
            blend,
            pixels,
            ..Default::default()
        };
        let frames = vec![
            frame(vec![200, 200], DisposeOp::None, BlendOp::Source),
            frame(vec![0, 0], DisposeOp::Background, BlendOp::Over),
            frame(vec![50, 10], DisposeOp::None, BlendOp::Over),
        ];
        let mut src = ScriptedSource {
            info:   AnimationInfo {
                width: 1,
                height: 1,
                colorspace: ColorSpace::LumaA,
                is_animated: true,
                frame_count: 3,
                loop_count: 0,
                first_frame_hidden: false
            },
            frames: frames.into()
        };

        let sequence = decode_frames(&mut src, &DecoderOptions::default()).unwrap();
        assert_eq!(sequence.frame_count(), 2);
        // blended over the first frame, the padding's background disposal never ran
        // u = 2550, v = 245 * 200 = 49000, a1 = 51550
        assert_eq!(sequence.frame_image(1).unwrap().pixels(), &[192, 202]);
    }

    #[test]
    fn test_early_end_is_corrupt() {
        let frames = vec![luma(0, 10, DisposeOp::None)];
        let mut src = source(frames, 4, false);

        let err = decode_frames(&mut src, &DecoderOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }

    #[test]
    fn test_too_many_declared_frames() {
        let mut src = source(vec![], 5000, false);

        let err = decode_frames(&mut src, &DecoderOptions::default()).unwrap_err();
        assert!(matches!(err, AnimationErrors::TooManyFrames(5000, _)));
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
    }
}
