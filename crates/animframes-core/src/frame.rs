/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Raw animation sub-frames and the trait frame sources implement
//!
//! A frame source turns an animated bitstream into a lazy sequence of
//! [`SubFrame`]s, each one a rectangle of 8 bit pixels to be placed on a
//! canvas together with instructions on how to blend it and how to dispose of it
//! once its display time is over.
//!
//! Compositing the rectangles into full frames is not the job of the frame source,
//! see the `animframes` crate for that.
use crate::colorspace::ColorSpace;

/// What happens to the canvas region of a sub-frame
/// after its display time ends, before the next one is rendered
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum DisposeOp {
    /// Leave the canvas as is
    #[default]
    None,
    /// Clear the canvas to fully transparent black
    Background,
    /// Revert the canvas to what it was before the sub-frame was rendered
    Previous
}

impl DisposeOp {
    /// Map the APNG dispose code to a disposal operation,
    /// returns `None` for unknown codes
    pub const fn from_u8(value: u8) -> Option<DisposeOp> {
        match value {
            0 => Some(DisposeOp::None),
            1 => Some(DisposeOp::Background),
            2 => Some(DisposeOp::Previous),
            _ => None
        }
    }
}

/// How a sub-frame's pixels are combined with the canvas
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum BlendOp {
    /// Overwrite the canvas region, alpha included
    #[default]
    Source,
    /// Alpha composite the sub-frame over the canvas
    Over
}

impl BlendOp {
    /// Map the APNG blend code to a blend operation,
    /// returns `None` for unknown codes
    pub const fn from_u8(value: u8) -> Option<BlendOp> {
        match value {
            0 => Some(BlendOp::Source),
            1 => Some(BlendOp::Over),
            _ => None
        }
    }
}

/// A single decoded animation sub-frame
///
/// Pixels are 8 bits per component, in the colorspace reported by the
/// frame source, laid out row by row with `width * components` bytes per row.
#[derive(Clone, Debug, Default)]
pub struct SubFrame {
    pub width:     usize,
    pub height:    usize,
    pub x_offset:  usize,
    pub y_offset:  usize,
    /// Numerator of the display time fraction
    pub delay_num: u16,
    /// Denominator of the display time fraction, zero means 100
    pub delay_den: u16,
    pub dispose:   DisposeOp,
    pub blend:     BlendOp,
    pub pixels:    Vec<u8>
}

impl SubFrame {
    /// Display time of this sub-frame in seconds
    ///
    /// A zero denominator is treated as 100, i.e the numerator
    /// counts hundredths of a second.
    pub fn delay(&self) -> f32 {
        let den = if self.delay_den == 0 {
            100
        } else {
            self.delay_den
        };
        f32::from(self.delay_num) / f32::from(den)
    }
}

/// Top level animation information, returned by a frame source
/// once its headers have been parsed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AnimationInfo {
    /// Canvas width
    pub width:              usize,
    /// Canvas height
    pub height:             usize,
    /// Colorspace of every sub-frame the source yields
    pub colorspace:         ColorSpace,
    /// Whether the stream carries animation control data
    pub is_animated:        bool,
    /// Number of visible sub-frames declared by the stream
    ///
    /// A hidden first frame is not counted.
    pub frame_count:        usize,
    /// Number of times to play the animation, 0 means forever
    pub loop_count:         u32,
    /// Whether the first sub-frame yielded initializes the canvas
    /// without being displayed
    pub first_frame_hidden: bool
}

/// An animated format decoder yielding raw sub-frames
///
/// Implementors read their headers in [`begin`](FrameSource::begin) and then hand
/// out sub-frames one at a time in stream order. If
/// [`AnimationInfo::first_frame_hidden`] is set, the first sub-frame returned
/// is the hidden one.
pub trait FrameSource {
    type Error;

    /// Parse the stream headers and return animation information
    fn begin(&mut self) -> Result<AnimationInfo, Self::Error>;

    /// Decode the next sub-frame, returning `Ok(None)` once
    /// the stream has no more frames
    fn next_sub_frame(&mut self) -> Result<Option<SubFrame>, Self::Error>;
}
