/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A sequence of fully composited frames
//!
//! This is what a decode hands back, frames in playback order each
//! paired with its display time plus the number of times the animation
//! should play.
//!
//! The container is a plain data holder, it can also be built by hand
//! ```
//! use animframes::sequence::{FrameImage, FrameSequence};
//! use animframes::animframes_core::colorspace::ColorSpace;
//!
//! let red = FrameImage::new(1, 1, ColorSpace::RGB, vec![255, 0, 0]).unwrap();
//! let blue = FrameImage::new(1, 1, ColorSpace::RGB, vec![0, 0, 255]).unwrap();
//!
//! let sequence = FrameSequence::from_frames(vec![red, blue], &[0.5, 0.25]).unwrap();
//! assert_eq!(sequence.frame_count(), 2);
//! assert_eq!(sequence.total_duration(), 0.75);
//! ```
use animframes_core::colorspace::ColorSpace;

use crate::errors::AnimationErrors;

/// Maximum number of frames a single animation may hold
pub const MAX_FRAMES: usize = 4096;

/// Pixels of a single frame
///
/// 8 bits per component, interleaved, row by row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameImage {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    pixels:     Vec<u8>
}

impl Default for FrameImage {
    fn default() -> Self {
        FrameImage {
            width:      0,
            height:     0,
            colorspace: ColorSpace::RGBA,
            pixels:     Vec::new()
        }
    }
}

impl FrameImage {
    /// Create a new frame image
    ///
    /// # Errors
    /// If `pixels` isn't exactly `width*height*components` bytes long
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace, pixels: Vec<u8>
    ) -> Result<FrameImage, AnimationErrors> {
        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(colorspace.num_components()));

        if expected != Some(pixels.len()) {
            return Err(AnimationErrors::CorruptStream(format!(
                "Frame of {width}x{height} {colorspace:?} does not match a buffer of {} bytes",
                pixels.len()
            )));
        }
        Ok(FrameImage {
            width,
            height,
            colorspace,
            pixels
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns true if the image holds no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// A single frame and its display time
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    image: FrameImage,
    delay: f32
}

impl Frame {
    pub fn new(image: FrameImage, delay: f32) -> Frame {
        Frame { image, delay }
    }

    pub const fn image(&self) -> &FrameImage {
        &self.image
    }

    /// Display time in seconds
    pub const fn delay(&self) -> f32 {
        self.delay
    }
}

/// Ordered frames plus a loop count
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSequence {
    frames:     Vec<Frame>,
    loop_count: u32
}

impl FrameSequence {
    /// Create an empty sequence that loops forever
    pub fn new() -> FrameSequence {
        FrameSequence::default()
    }

    /// Build a sequence from images and their delays
    ///
    /// Images without a matching delay get a delay of zero, extra
    /// delays are ignored.
    pub fn from_frames(
        images: Vec<FrameImage>, delays: &[f32]
    ) -> Result<FrameSequence, AnimationErrors> {
        if images.len() > MAX_FRAMES {
            return Err(AnimationErrors::TooManyFrames(images.len(), MAX_FRAMES));
        }
        let frames = images
            .into_iter()
            .enumerate()
            .map(|(pos, image)| Frame::new(image, delays.get(pos).copied().unwrap_or(0.0)))
            .collect();

        Ok(FrameSequence {
            frames,
            loop_count: 0
        })
    }

    /// Resize the sequence to hold `count` frames
    ///
    /// New frames are empty with a delay of zero, shrinking drops frames
    /// from the end.
    ///
    /// # Errors
    /// - [`TooManyFrames`](AnimationErrors::TooManyFrames) if count exceeds [`MAX_FRAMES`]
    /// - [`AllocationFailed`](AnimationErrors::AllocationFailed) if space for the frames can't be reserved
    pub fn set_frame_count(&mut self, count: usize) -> Result<(), AnimationErrors> {
        if count > MAX_FRAMES {
            return Err(AnimationErrors::TooManyFrames(count, MAX_FRAMES));
        }
        if count > self.frames.len() {
            self.frames.try_reserve_exact(count - self.frames.len())?;
        }
        self.frames.resize_with(count, Frame::default);
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn set_frame_image(
        &mut self, index: usize, image: FrameImage
    ) -> Result<(), AnimationErrors> {
        let count = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(AnimationErrors::IndexOutOfBounds(index, count))?;
        frame.image = image;
        Ok(())
    }

    pub fn frame_image(&self, index: usize) -> Option<&FrameImage> {
        self.frames.get(index).map(|x| &x.image)
    }

    /// Set the display time in seconds of the frame at `index`
    pub fn set_frame_delay(&mut self, index: usize, delay: f32) -> Result<(), AnimationErrors> {
        let count = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(AnimationErrors::IndexOutOfBounds(index, count))?;
        frame.delay = delay;
        Ok(())
    }

    pub fn frame_delay(&self, index: usize) -> Option<f32> {
        self.frames.get(index).map(|x| x.delay)
    }

    /// Number of times the animation plays, 0 means forever
    pub const fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn set_loop_count(&mut self, loop_count: u32) {
        self.loop_count = loop_count;
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Sum of every frame's delay, in seconds
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|x| x.delay).sum()
    }

    /// Dimensions of the first frame, or `(0,0)` for an empty sequence
    pub fn dimensions(&self) -> (usize, usize) {
        self.frames
            .first()
            .map_or((0, 0), |x| x.image.dimensions())
    }
}
