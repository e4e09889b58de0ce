/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The frame canvas compositor
//!
//! Owns a persistent canvas the size of the animation and, when a sub-frame
//! asks for [`DisposeOp::Previous`], a backup buffer of the same size.
//!
//! Sub-frames are consumed in stream order, the disposal of each sub-frame is
//! applied lazily before the next one is rendered and every render hands out an
//! owned copy of the canvas.
use log::trace;

use animframes_core::colorspace::ColorSpace;
use animframes_core::frame::{BlendOp, DisposeOp, SubFrame};

use crate::blend::blend_over_row;
use crate::errors::AnimationErrors;

/// Compositor life cycle
///
/// A compositor starts in [`FirstFrame`](CompositorState::FirstFrame) once its canvas has
/// been allocated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompositorState {
    /// Nothing rendered yet, a hidden seed may still be applied
    FirstFrame,
    /// At least one sub-frame has been rendered
    SteadyState,
    /// Finished, the canvas can no longer be mutated
    Done
}

pub struct Compositor {
    width:            usize,
    height:           usize,
    components:       usize,
    alpha_position:   Option<usize>,
    canvas:           Vec<u8>,
    backup:           Option<Vec<u8>>,
    /// Disposal of the last rendered sub-frame, applied before the next render
    previous_dispose: DisposeOp,
    state:            CompositorState,
    rendered:         usize
}

fn alloc_zeroed(size: usize) -> Result<Vec<u8>, AnimationErrors> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size)?;
    buffer.resize(size, 0);
    Ok(buffer)
}

impl Compositor {
    /// Create a compositor with a zeroed `width` by `height` canvas
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace
    ) -> Result<Compositor, AnimationErrors> {
        if width == 0 || height == 0 {
            return Err(AnimationErrors::CorruptStream(format!(
                "Zero sized canvas {width}x{height}"
            )));
        }
        let components = colorspace.num_components();
        let size = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(components))
            .ok_or_else(|| {
                AnimationErrors::LimitExceeded(format!(
                    "Canvas {width}x{height} overflows the address space"
                ))
            })?;

        Ok(Compositor {
            width,
            height,
            components,
            alpha_position: colorspace.alpha_position(),
            canvas: alloc_zeroed(size)?,
            backup: None,
            previous_dispose: DisposeOp::None,
            state: CompositorState::FirstFrame,
            rendered: 0
        })
    }

    pub const fn state(&self) -> CompositorState {
        self.state
    }

    /// Current canvas contents
    pub fn canvas(&self) -> &[u8] {
        &self.canvas
    }

    /// Number of sub-frames rendered so far
    pub const fn rendered(&self) -> usize {
        self.rendered
    }

    /// Blit a hidden sub-frame onto the canvas without emitting anything
    ///
    /// Only valid before the first render.
    pub fn seed(&mut self, frame: &SubFrame) -> Result<(), AnimationErrors> {
        if self.state != CompositorState::FirstFrame || self.rendered != 0 {
            return Err(AnimationErrors::InternalConsistency(
                "Hidden frame seeded after rendering started"
            ));
        }
        self.validate(frame)?;
        trace!("Seeding canvas with hidden {}x{} frame", frame.width, frame.height);
        self.blit(frame, BlendOp::Source);
        Ok(())
    }

    /// Render the next sub-frame and return a copy of the resulting canvas
    pub fn render(&mut self, frame: &SubFrame) -> Result<Vec<u8>, AnimationErrors> {
        self.validate(frame)?;

        let mut dispose = frame.dispose;

        match self.state {
            CompositorState::Done => {
                return Err(AnimationErrors::InternalConsistency(
                    "Compositor used after it finished"
                ));
            }
            CompositorState::FirstFrame => {
                if dispose == DisposeOp::Previous {
                    // nothing to revert to
                    dispose = DisposeOp::Background;
                    self.canvas.fill(0);
                }
                self.state = CompositorState::SteadyState;
            }
            CompositorState::SteadyState => {
                if self.previous_dispose == DisposeOp::Previous && dispose == DisposeOp::Previous
                {
                    // the snapshot taken for the last frame is also the state
                    // before this one, restore from it and keep it
                    self.restore_backup()?;
                } else {
                    self.dispose_previous()?;

                    if dispose == DisposeOp::Previous {
                        self.snapshot()?;
                    }
                }
            }
        }
        trace!(
            "Rendering sub-frame {} ({}x{} at {},{}), {:?} {:?}",
            self.rendered,
            frame.width,
            frame.height,
            frame.x_offset,
            frame.y_offset,
            dispose,
            frame.blend
        );
        self.blit(frame, frame.blend);
        self.previous_dispose = dispose;
        self.rendered += 1;

        let mut output = Vec::new();
        output.try_reserve_exact(self.canvas.len())?;
        output.extend_from_slice(&self.canvas);

        Ok(output)
    }

    /// Mark the compositor as done and release the backup buffer
    pub fn finish(&mut self) {
        self.state = CompositorState::Done;
        self.backup = None;
    }

    fn validate(&self, frame: &SubFrame) -> Result<(), AnimationErrors> {
        if frame.width == 0 || frame.height == 0 {
            return Err(AnimationErrors::CorruptStream(format!(
                "Zero sized sub-frame {}x{}",
                frame.width, frame.height
            )));
        }
        let expected = frame
            .width
            .checked_mul(frame.height)
            .and_then(|x| x.checked_mul(self.components))
            .ok_or("Sub-frame dimensions overflow")?;

        if frame.pixels.len() < expected {
            return Err(AnimationErrors::CorruptStream(format!(
                "Short sub-frame buffer, expected {expected} bytes but found {}",
                frame.pixels.len()
            )));
        }
        Ok(())
    }

    fn dispose_previous(&mut self) -> Result<(), AnimationErrors> {
        match self.previous_dispose {
            DisposeOp::None => Ok(()),
            DisposeOp::Background => {
                self.canvas.fill(0);
                Ok(())
            }
            DisposeOp::Previous => self.restore_backup()
        }
    }

    fn restore_backup(&mut self) -> Result<(), AnimationErrors> {
        debug_assert!(self.backup.is_some(), "Previous disposal without a backup");

        let backup = self.backup.as_ref().ok_or(AnimationErrors::InternalConsistency(
            "Previous disposal without a backup"
        ))?;
        self.canvas.copy_from_slice(backup);
        Ok(())
    }

    fn snapshot(&mut self) -> Result<(), AnimationErrors> {
        match &mut self.backup {
            Some(backup) => backup.copy_from_slice(&self.canvas),
            None => {
                let mut backup = Vec::new();
                backup.try_reserve_exact(self.canvas.len())?;
                backup.extend_from_slice(&self.canvas);
                self.backup = Some(backup);
            }
        }
        Ok(())
    }

    fn blit(&mut self, frame: &SubFrame, blend: BlendOp) {
        let components = self.components;
        let copy_width = self.width.saturating_sub(frame.x_offset).min(frame.width);
        let copy_height = self.height.saturating_sub(frame.y_offset).min(frame.height);

        if copy_width == 0 || copy_height == 0 {
            return;
        }
        let src_stride = frame.width * components;
        let dest_stride = self.width * components;
        let row_bytes = copy_width * components;

        for (row, src_row) in frame
            .pixels
            .chunks_exact(src_stride)
            .take(copy_height)
            .enumerate()
        {
            let start = (frame.y_offset + row) * dest_stride + frame.x_offset * components;
            let dest = &mut self.canvas[start..start + row_bytes];
            let src = &src_row[..row_bytes];

            match (blend, self.alpha_position) {
                (BlendOp::Over, Some(alpha)) => blend_over_row(src, dest, components, alpha),
                _ => dest.copy_from_slice(src)
            }
        }
    }
}
