/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use animframes_core::frame::{BlendOp, DisposeOp};
use log::{info, trace, warn};

use crate::decoder::{ActlChunk, FctlChunk, PngChunk};
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::PngDecoder;

impl<'a> PngDecoder<'a> {
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if self.seen_hdr {
            return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
        }

        if chunk.length != 13 {
            return Err(PngDecodeErrors::GenericStatic("BAD IHDR length"));
        }

        self.png_info.width = self.stream.get_u32_be_err()? as usize;
        self.png_info.height = self.stream.get_u32_be_err()? as usize;

        if self.png_info.width == 0 || self.png_info.height == 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "Width or height cannot be zero"
            ));
        }

        if self.png_info.width > self.options.get_max_width() {
            return Err(PngDecodeErrors::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                self.png_info.width
            ));
        }

        if self.png_info.height > self.options.get_max_height() {
            return Err(PngDecodeErrors::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                self.png_info.height
            ));
        }

        self.png_info.depth = self.stream.get_u8_err()?;
        let color = self.stream.get_u8_err()?;

        if let Some(img_color) = PngColor::from_int(color) {
            self.png_info.color = img_color;
        } else {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown color value {color}"
            )));
        }
        self.png_info.component = self.png_info.color.num_components();
        // verify colors plus bit depths
        match self.png_info.depth {
            1 | 2 | 4 => {
                if !matches!(self.png_info.color, PngColor::Luma | PngColor::Palette) {
                    let err_msg = format!(
                        "Bit depth of {} only allows Greyscale or Indexed color types, but found {:?}",
                        self.png_info.depth, self.png_info.color
                    );

                    return Err(PngDecodeErrors::Generic(err_msg));
                }
            }
            8 => { /*silent pass through since all color types support it */ }
            16 => {
                if self.png_info.color == PngColor::Palette {
                    return Err(PngDecodeErrors::GenericStatic(
                        "Indexed colour cannot have 16 bit depth"
                    ));
                }
            }
            _ => {
                return Err(PngDecodeErrors::Generic(format!(
                    "Unknown bit depth {}",
                    self.png_info.depth
                )))
            }
        }

        if self.stream.get_u8_err()? != 0 {
            return Err(PngDecodeErrors::GenericStatic("Unknown compression method"));
        }

        let filter_method = self.stream.get_u8_err()?;

        if filter_method != 0 {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown filter method {filter_method}"
            )));
        }

        let interlace_method = self.stream.get_u8_err()?;

        if let Some(method) = InterlaceMethod::from_int(interlace_method) {
            self.png_info.interlace_method = method;
        } else {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown interlace method {interlace_method}",
            )));
        }

        // skip crc
        self.stream.skip(4);

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Color type: {:?}", self.png_info.color);
        info!("Depth: {:?}", self.png_info.depth);
        info!("Interlace :{:?}", self.png_info.interlace_method);

        self.seen_hdr = true;

        Ok(())
    }

    pub(crate) fn parse_plte(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if chunk.length % 3 != 0 || chunk.length == 0 || chunk.length > 256 * 3 {
            return Err(PngDecodeErrors::GenericStatic(
                "Invalid PLTE length, corrupt PNG"
            ));
        }
        if self.seen_plte {
            return Err(PngDecodeErrors::GenericStatic("Multiple PLTE, corrupt PNG"));
        }

        let entries = self.stream.get_as_ref(chunk.length)?;

        if self.png_info.color == PngColor::Palette {
            for (entry, pal_chunk) in self.palette.iter_mut().zip(entries.chunks_exact(3)) {
                entry.red = pal_chunk[0];
                entry.green = pal_chunk[1];
                entry.blue = pal_chunk[2];
            }
            self.palette_len = chunk.length / 3;
        } else {
            // suggested palette for true colour images, not needed for decoding
            trace!("Ignoring PLTE chunk for colour type {:?}", self.png_info.color);
        }
        // skip crc chunk
        self.stream.skip(4);
        self.seen_plte = true;

        Ok(())
    }

    pub(crate) fn parse_trns(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        match self.png_info.color {
            PngColor::Luma | PngColor::RGB => {
                // colour keyed transparency is not applied, frames keep their
                // colorspace without an alpha channel
                trace!(
                    "Ignoring tRNS colour key for colour type {:?}",
                    self.png_info.color
                );
                self.stream.skip(chunk.length);
            }
            PngColor::Palette => {
                if !self.seen_plte {
                    return Err(PngDecodeErrors::GenericStatic("tRNS chunk before PLTE"));
                }
                if chunk.length > self.palette_len {
                    return Err(PngDecodeErrors::GenericStatic(
                        "tRNS chunk with too long entries"
                    ));
                }
                let alphas = self.stream.get_as_ref(chunk.length)?;

                for (entry, alpha) in self.palette.iter_mut().zip(alphas) {
                    entry.alpha = *alpha;
                }
                self.seen_trns = true;
            }
            _ => {
                let msg = format!("A tRNS chunk shall not appear for colour type {:?} as it is already transparent", self.png_info.color);

                return Err(PngDecodeErrors::Generic(msg));
            }
        }
        // skip crc
        self.stream.skip(4);

        Ok(())
    }

    pub(crate) fn parse_actl(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        if chunk.length != 8 {
            return Err(PngDecodeErrors::GenericStatic("Bad acTL length"));
        }
        if self.actl.is_some() {
            return Err(PngDecodeErrors::GenericStatic("Multiple acTL, corrupt PNG"));
        }
        let num_frames = self.stream.get_u32_be_err()?;
        let num_plays = self.stream.get_u32_be_err()?;

        if num_frames == 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "acTL declares an animation with zero frames"
            ));
        }
        info!("Animated png, frames: {num_frames}, plays: {num_plays}");

        self.actl = Some(ActlChunk {
            num_frames,
            num_plays
        });
        // skip crc
        self.stream.skip(4);

        Ok(())
    }

    pub(crate) fn parse_fctl(&mut self, chunk: PngChunk) -> Result<FctlChunk, PngDecodeErrors> {
        if chunk.length != 26 {
            return Err(PngDecodeErrors::GenericStatic("Bad fcTL length"));
        }
        let sequence_number = self.stream.get_u32_be_err()?;
        let width = self.stream.get_u32_be_err()? as usize;
        let height = self.stream.get_u32_be_err()? as usize;
        let x_offset = self.stream.get_u32_be_err()? as usize;
        let y_offset = self.stream.get_u32_be_err()? as usize;
        let delay_num = self.stream.get_u16_be_err()?;
        let delay_den = self.stream.get_u16_be_err()?;
        let dispose = self.stream.get_u8_err()?;
        let blend = self.stream.get_u8_err()?;

        // skip crc
        self.stream.skip(4);

        self.check_sequence(sequence_number)?;

        if width == 0 || height == 0 {
            return Err(PngDecodeErrors::GenericStatic(
                "fcTL frame width or height cannot be zero"
            ));
        }
        let fits_x = x_offset
            .checked_add(width)
            .map_or(false, |end| end <= self.png_info.width);
        let fits_y = y_offset
            .checked_add(height)
            .map_or(false, |end| end <= self.png_info.height);

        if !fits_x || !fits_y {
            return Err(PngDecodeErrors::Generic(format!(
                "Frame {width}x{height} at ({x_offset},{y_offset}) is outside the {}x{} canvas",
                self.png_info.width, self.png_info.height
            )));
        }
        let dispose_op = DisposeOp::from_u8(dispose)
            .ok_or_else(|| PngDecodeErrors::Generic(format!("Unknown dispose op {dispose}")))?;

        let blend_op = BlendOp::from_u8(blend)
            .ok_or_else(|| PngDecodeErrors::Generic(format!("Unknown blend op {blend}")))?;

        self.frames_seen += 1;

        if let Some(actl) = self.actl {
            if self.frames_seen > actl.num_frames as usize {
                if self.options.get_error_on_sequence() {
                    return Err(PngDecodeErrors::Generic(format!(
                        "More fcTL chunks than the {} frames declared in acTL",
                        actl.num_frames
                    )));
                }
                warn!(
                    "More fcTL chunks than the {} frames declared in acTL",
                    actl.num_frames
                );
            }
        }
        trace!("fcTL {sequence_number}: {width}x{height} at ({x_offset},{y_offset}), delay {delay_num}/{delay_den}, {dispose_op:?}, {blend_op:?}");

        Ok(FctlChunk {
            sequence_number,
            width,
            height,
            x_offset,
            y_offset,
            delay_num,
            delay_den,
            dispose_op,
            blend_op
        })
    }

    /// Ensure animation chunks carry consecutive sequence numbers
    pub(crate) fn check_sequence(&mut self, sequence_number: u32) -> Result<(), PngDecodeErrors> {
        if sequence_number != self.next_sequence {
            if self.options.get_error_on_sequence() {
                return Err(PngDecodeErrors::Generic(format!(
                    "Out of order sequence number, expected {} but found {sequence_number}",
                    self.next_sequence
                )));
            }
            warn!(
                "Out of order sequence number, expected {} but found {sequence_number}",
                self.next_sequence
            );
        }
        self.next_sequence = sequence_number.wrapping_add(1);

        Ok(())
    }
}
