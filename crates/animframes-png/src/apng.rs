/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Animated png frame walking
use animframes_core::frame::{AnimationInfo, BlendOp, DisposeOp, FrameSource, SubFrame};
use log::{trace, warn};

use crate::decoder::FctlChunk;
use crate::enums::PngChunkType;
use crate::error::PngDecodeErrors;
use crate::PngDecoder;

fn sub_frame_from_fctl(fctl: FctlChunk, pixels: Vec<u8>) -> SubFrame {
    SubFrame {
        width: fctl.width,
        height: fctl.height,
        x_offset: fctl.x_offset,
        y_offset: fctl.y_offset,
        delay_num: fctl.delay_num,
        delay_den: fctl.delay_den,
        dispose: fctl.dispose_op,
        blend: fctl.blend_op,
        pixels
    }
}

impl<'a> PngDecoder<'a> {
    /// The default image as a sub-frame
    ///
    /// Without an fcTL the default image covers the canvas, is shown for no time
    /// and is composited as a plain copy
    fn default_sub_frame(&mut self) -> Result<SubFrame, PngDecodeErrors> {
        let pixels = self.decode_raw()?;

        if !self.is_animating() {
            self.finished = true;
        }

        match self.default_fctl.filter(|_| self.is_animating()) {
            Some(fctl) => Ok(sub_frame_from_fctl(fctl, pixels)),
            None => Ok(SubFrame {
                width: self.png_info.width,
                height: self.png_info.height,
                x_offset: 0,
                y_offset: 0,
                delay_num: 0,
                delay_den: 0,
                dispose: DisposeOp::None,
                blend: BlendOp::Source,
                pixels
            })
        }
    }

    /// Walk chunks after the default image until the next complete frame
    fn next_animation_frame(&mut self) -> Result<Option<SubFrame>, PngDecodeErrors> {
        loop {
            let header = self.read_chunk_header()?;

            match header.chunk_type {
                PngChunkType::fcTL => {
                    let fctl = self.parse_fctl(header)?;

                    if self.pending_fctl.is_some() {
                        if self.options.get_error_on_sequence() {
                            return Err(PngDecodeErrors::GenericStatic(
                                "fcTL chunk without frame data"
                            ));
                        }
                        warn!("fcTL chunk without frame data, replacing it");
                    }
                    self.pending_fctl = Some(fctl);
                }
                PngChunkType::fdAT => {
                    let fctl = self.pending_fctl.take().ok_or(
                        PngDecodeErrors::GenericStatic("fdAT chunk without a preceding fcTL")
                    )?;
                    let data = self.collect_fdat(header)?;
                    let pixels = self.decode_frame_data(&data, fctl.width, fctl.height)?;

                    return Ok(Some(sub_frame_from_fctl(fctl, pixels)));
                }
                PngChunkType::IEND => {
                    if self.pending_fctl.is_some() {
                        warn!("Stream ended with a fcTL chunk that has no frame data");
                    }
                    self.finished = true;
                    return Ok(None);
                }
                PngChunkType::IDAT => {
                    return Err(PngDecodeErrors::GenericStatic(
                        "IDAT chunk after animation frames"
                    ));
                }
                PngChunkType::IHDR | PngChunkType::PLTE | PngChunkType::acTL => {
                    return Err(PngDecodeErrors::Generic(format!(
                        "{:?} chunk after image data",
                        header.chunk_type
                    )));
                }
                PngChunkType::tRNS => {
                    warn!("tRNS chunk after image data, ignoring");
                    self.stream.skip(header.length + 4);
                }
                PngChunkType::unkn => self.skip_chunk(header)?
            }
        }
    }
}

impl<'a> FrameSource for PngDecoder<'a> {
    type Error = PngDecodeErrors;

    fn begin(&mut self) -> Result<AnimationInfo, PngDecodeErrors> {
        self.decode_headers()?;

        let colorspace = self
            .get_colorspace()
            .ok_or(PngDecodeErrors::GenericStatic("Headers not decoded"))?;

        let info = match self.actl.filter(|_| self.is_animating()) {
            Some(actl) => AnimationInfo {
                width: self.png_info.width,
                height: self.png_info.height,
                colorspace,
                is_animated: true,
                frame_count: actl.num_frames as usize,
                loop_count: actl.num_plays,
                first_frame_hidden: self.default_fctl.is_none()
            },
            None => AnimationInfo {
                width: self.png_info.width,
                height: self.png_info.height,
                colorspace,
                is_animated: false,
                frame_count: 1,
                loop_count: 0,
                first_frame_hidden: false
            }
        };
        trace!("Animation info: {info:?}");

        Ok(info)
    }

    fn next_sub_frame(&mut self) -> Result<Option<SubFrame>, PngDecodeErrors> {
        if self.finished {
            return Ok(None);
        }
        if !self.default_decoded {
            return self.default_sub_frame().map(Some);
        }
        self.next_animation_frame()
    }
}
