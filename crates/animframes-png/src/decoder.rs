/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use animframes_core::bytestream::ZByteReader;
use animframes_core::colorspace::ColorSpace;
use animframes_core::frame::{BlendOp, DisposeOp};
use animframes_core::options::DecoderOptions;
use log::{trace, warn};
use zune_inflate::DeflateOptions;

use crate::crc::crc32;
use crate::enums::{FilterMethod, InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};

pub(crate) const PNG_SIGNATURE: u64 = 0x8950_4E47_0D0A_1A0A;

/// Largest chunk length allowed by the format, 2^31 - 1
const MAX_CHUNK_LENGTH: usize = (1 << 31) - 1;

#[derive(Copy, Clone)]
pub(crate) struct PLTEEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl Default for PLTEEntry {
    fn default() -> Self {
        // a tRNS chunk may contain fewer values than there are palette entries.
        // In this case, the alpha value for all remaining palette entries is assumed to be 255
        PLTEEntry {
            red:   0,
            green: 0,
            blue:  0,
            alpha: 255
        }
    }
}

#[derive(Copy, Clone)]
pub(crate) struct PngChunk {
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

#[derive(Default, Debug, Copy, Clone)]
pub struct PngInfo {
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub component:        u8,
    pub interlace_method: InterlaceMethod
}

/// Contents of the animation control chunk
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ActlChunk {
    /// Number of frames, including the default image
    /// when it is part of the animation
    pub num_frames: u32,
    /// Number of times to loop, 0 is forever
    pub num_plays:  u32
}

/// Contents of a frame control chunk, validated against the canvas
#[derive(Debug, Copy, Clone, Default)]
pub struct FctlChunk {
    pub sequence_number: u32,
    pub width:           usize,
    pub height:          usize,
    pub x_offset:        usize,
    pub y_offset:        usize,
    pub delay_num:       u16,
    pub delay_den:       u16,
    pub dispose_op:      DisposeOp,
    pub blend_op:        BlendOp
}

/// A PNG and APNG decoder
///
/// The decoder reads headers up to the first `IDAT` chunk, the default
/// image is then decoded with [`decode_raw`](PngDecoder::decode_raw) and
/// animation frames are handed out through the
/// [`FrameSource`](animframes_core::frame::FrameSource) implementation.
///
/// Every pixel handed out is 8 bits per component, palette images
/// are expanded to RGB(A) and 16 bit images are scaled down.
pub struct PngDecoder<'a> {
    pub(crate) seen_hdr:        bool,
    pub(crate) seen_headers:    bool,
    pub(crate) seen_plte:       bool,
    pub(crate) seen_trns:       bool,
    pub(crate) stream:          ZByteReader<'a>,
    pub(crate) options:         DecoderOptions,
    pub(crate) png_info:        PngInfo,
    pub(crate) palette:         Vec<PLTEEntry>,
    pub(crate) palette_len:     usize,
    pub(crate) actl:            Option<ActlChunk>,
    pub(crate) default_fctl:    Option<FctlChunk>,
    pub(crate) pending_fctl:    Option<FctlChunk>,
    pub(crate) next_sequence:   u32,
    pub(crate) frames_seen:     usize,
    pub(crate) default_decoded: bool,
    pub(crate) finished:        bool
}

impl<'a> PngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PngDecoder<'a> {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a> {
        PngDecoder {
            seen_hdr: false,
            seen_headers: false,
            seen_plte: false,
            seen_trns: false,
            stream: ZByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            palette: vec![PLTEEntry::default(); 256],
            palette_len: 0,
            actl: None,
            default_fctl: None,
            pending_fctl: None,
            next_sequence: 0,
            frames_seen: 0,
            default_decoded: false,
            finished: false
        }
    }

    /// Image dimensions, or `None` if headers haven't been decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.seen_hdr {
            return None;
        }
        Some((self.png_info.width, self.png_info.height))
    }

    /// Colorspace of the decoded pixels, or `None` if headers
    /// haven't been decoded
    pub fn get_colorspace(&self) -> Option<ColorSpace> {
        if !self.seen_headers {
            return None;
        }
        Some(self.png_info.color.output_colorspace(self.seen_trns))
    }

    /// Image information, or `None` if headers haven't been decoded
    pub const fn get_info(&self) -> Option<&PngInfo> {
        if !self.seen_hdr {
            return None;
        }
        Some(&self.png_info)
    }

    /// Animation control information, `None` for static images
    pub const fn get_animation_control(&self) -> Option<ActlChunk> {
        self.actl
    }

    /// Whether frames past the default image will be decoded
    pub(crate) fn is_animating(&self) -> bool {
        self.actl.is_some() && self.options.get_decode_animated()
    }

    pub(crate) fn read_chunk_header(&mut self) -> Result<PngChunk, PngDecodeErrors> {
        // Format is length - chunk type - [data] -  crc chunk
        let chunk_length = self.stream.get_u32_be_err()? as usize;
        let chunk = self.stream.get_u32_be_err()?.to_be_bytes();

        let chunk_type = PngChunkType::from_bytes(&chunk);

        if chunk_length > MAX_CHUNK_LENGTH {
            return Err(PngDecodeErrors::Generic(format!(
                "Chunk {chunk_type:?} length {chunk_length} is too large"
            )));
        }

        if !self.stream.has(chunk_length + 4 /*crc stream*/) {
            let err = format!(
                "Not enough bytes for chunk {:?}, bytes requested are {}, but bytes present are {}",
                chunk_type,
                chunk_length + 4,
                self.stream.remaining()
            );

            return Err(PngDecodeErrors::Generic(err));
        }

        if self.options.png_get_confirm_crc() {
            // go back and point to chunk type.
            self.stream.rewind(4)?;
            // read chunk type + chunk data
            let bytes = self.stream.peek_at(0, chunk_length + 4)?;
            let calc_crc = crc32(bytes);
            let crc_bytes = self.stream.peek_at(chunk_length + 4, 4)?;
            let crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

            if crc != calc_crc {
                return Err(PngDecodeErrors::BadCrc(crc, calc_crc));
            }
            // the chunk parsers expect to start at the chunk data
            self.stream.skip(4);
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk,
            chunk_type
        })
    }

    /// Return the type of the next chunk without consuming it
    pub(crate) fn peek_chunk_type(&self) -> Result<PngChunkType, PngDecodeErrors> {
        let bytes = self.stream.peek_at(4, 4)?;
        let chunk = [bytes[0], bytes[1], bytes[2], bytes[3]];

        Ok(PngChunkType::from_bytes(&chunk))
    }

    /// Skip a chunk the decoder has no use for
    ///
    /// Unknown critical chunks are errors, ancillary ones are skipped.
    pub(crate) fn skip_chunk(&mut self, chunk: PngChunk) -> Result<(), PngDecodeErrors> {
        let chunk_name = std::str::from_utf8(&chunk.chunk).unwrap_or("XXXX");

        if chunk.chunk_type == PngChunkType::unkn && chunk.chunk[0] & (1 << 5) == 0 {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Marker {chunk_name} unknown but deemed necessary",
            )));
        }

        trace!("Skipping chunk {chunk_name:?}, {} bytes", chunk.length + 4);

        self.stream.skip(chunk.length + 4);

        Ok(())
    }

    /// Decode headers up to the first IDAT chunk
    ///
    /// Calling this more than once is a no-op
    pub fn decode_headers(&mut self) -> Result<(), PngDecodeErrors> {
        if self.seen_headers {
            return Ok(());
        }
        // READ PNG signature
        let signature = self.stream.get_u64_be_err()?;

        if signature != PNG_SIGNATURE {
            return Err(PngDecodeErrors::BadSignature);
        }

        // check if first chunk is ihdr here
        if self.stream.peek_at(4, 4)? != b"IHDR" {
            return Err(PngDecodeErrors::GenericStatic(
                "First chunk not IHDR, Corrupt PNG"
            ));
        }
        loop {
            if self.peek_chunk_type()? == PngChunkType::IDAT {
                break;
            }
            let header = self.read_chunk_header()?;

            match header.chunk_type {
                PngChunkType::IHDR => self.parse_ihdr(header)?,
                PngChunkType::PLTE => self.parse_plte(header)?,
                PngChunkType::tRNS => self.parse_trns(header)?,
                PngChunkType::acTL => self.parse_actl(header)?,
                PngChunkType::fcTL => {
                    if self.default_fctl.is_some() {
                        return Err(PngDecodeErrors::GenericStatic(
                            "Multiple fcTL chunks before IDAT"
                        ));
                    }
                    let fctl = self.parse_fctl(header)?;

                    if fctl.x_offset != 0
                        || fctl.y_offset != 0
                        || fctl.width != self.png_info.width
                        || fctl.height != self.png_info.height
                    {
                        return Err(PngDecodeErrors::GenericStatic(
                            "fcTL of the default image must cover the whole canvas"
                        ));
                    }
                    self.default_fctl = Some(fctl);
                }
                PngChunkType::fdAT => {
                    return Err(PngDecodeErrors::GenericStatic("fdAT chunk before IDAT"));
                }
                PngChunkType::IEND => {
                    return Err(PngDecodeErrors::GenericStatic("No IDAT chunks in image"));
                }
                _ => self.skip_chunk(header)?
            }
        }
        if self.png_info.color == PngColor::Palette && !self.seen_plte {
            return Err(PngDecodeErrors::EmptyPalette);
        }
        if self.actl.is_none() && self.default_fctl.is_some() {
            warn!("fcTL chunk without acTL, treating image as static");
            self.default_fctl = None;
        }
        self.seen_headers = true;

        Ok(())
    }

    /// Decode the default image returning its 8 bit pixels
    ///
    /// This is the image non-APNG aware decoders display.
    pub fn decode_raw(&mut self) -> Result<Vec<u8>, PngDecodeErrors> {
        self.decode_headers()?;

        if self.default_decoded {
            return Err(PngDecodeErrors::GenericStatic(
                "Default image has already been decoded"
            ));
        }
        let mut idat_chunks = Vec::new();

        while !self.stream.eof() && self.peek_chunk_type()? == PngChunkType::IDAT {
            let header = self.read_chunk_header()?;
            idat_chunks.extend_from_slice(self.stream.get_as_ref(header.length)?);
            // skip crc
            self.stream.skip(4);
        }
        self.default_decoded = true;

        let (width, height) = (self.png_info.width, self.png_info.height);

        self.decode_frame_data(&idat_chunks, width, height)
    }

    /// Collect data of consecutive fdAT chunks, starting with `first`
    pub(crate) fn collect_fdat(&mut self, first: PngChunk) -> Result<Vec<u8>, PngDecodeErrors> {
        let mut data = Vec::new();
        let mut header = first;

        loop {
            if header.length < 4 {
                return Err(PngDecodeErrors::GenericStatic("fdAT chunk too short"));
            }
            let sequence_number = self.stream.get_u32_be_err()?;
            self.check_sequence(sequence_number)?;

            data.extend_from_slice(self.stream.get_as_ref(header.length - 4)?);
            // skip crc
            self.stream.skip(4);

            if self.stream.eof() || self.peek_chunk_type()? != PngChunkType::fdAT {
                break;
            }
            header = self.read_chunk_header()?;
        }
        Ok(data)
    }

    /// Turn compressed frame data into 8 bit pixels of the output colorspace
    pub(crate) fn decode_frame_data(
        &self, compressed: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        let info = self.png_info;
        let deflate_data = self.inflate(compressed, width, height)?;

        let mut out = match info.interlace_method {
            InterlaceMethod::Standard => self.create_png_image_raw(&deflate_data, width, height)?,
            InterlaceMethod::Adam7 => self.deinterlace(&deflate_data, width, height)?
        };

        if info.depth == 16 {
            out = strip_16_bit(&out);
        }
        if info.color == PngColor::Palette {
            out = self.expand_palette(&out);
        }
        Ok(out)
    }

    fn deinterlace(
        &self, deflate_data: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        const XORIG: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
        const YORIG: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];

        const XSPC: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
        const YSPC: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];

        let info = &self.png_info;
        let bytes = if info.depth == 16 { 2 } else { 1 };
        // after bit expansion every sample is at least a byte wide
        let out_bytes = usize::from(info.component) * bytes;

        let mut final_out = alloc_zeroed(width * height * out_bytes)?;
        let mut image_offset = 0;

        for p in 0..7 {
            let x = (width + XSPC[p] - XORIG[p] - 1) / XSPC[p];
            let y = (height + YSPC[p] - YORIG[p] - 1) / YSPC[p];

            if x == 0 || y == 0 {
                continue;
            }
            let image_len = (self.scanline_bytes(x) + 1) * y;

            let deflate_slice = deflate_data
                .get(image_offset..image_offset + image_len)
                .ok_or(PngDecodeErrors::GenericStatic(
                    "Not enough pixels for interlaced pass"
                ))?;

            let pass = self.create_png_image_raw(deflate_slice, x, y)?;

            for j in 0..y {
                for i in 0..x {
                    let out_y = j * YSPC[p] + YORIG[p];
                    let out_x = i * XSPC[p] + XORIG[p];

                    let final_start = (out_y * width + out_x) * out_bytes;
                    let out_start = (j * x + i) * out_bytes;

                    final_out[final_start..final_start + out_bytes]
                        .copy_from_slice(&pass[out_start..out_start + out_bytes]);
                }
            }
            image_offset += image_len;
        }
        Ok(final_out)
    }

    /// Number of bytes in one unfiltered scanline of `width` pixels
    fn scanline_bytes(&self, width: usize) -> usize {
        let info = &self.png_info;

        (usize::from(info.component) * width * usize::from(info.depth) + 7) / 8
    }

    /// Undo scanline filtering for a `width` x `height` image
    ///
    /// Images below 8 bits per sample are expanded so that every
    /// sample occupies a byte
    fn create_png_image_raw(
        &self, deflate_data: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        let info = &self.png_info;
        let width_stride = self.scanline_bytes(width);
        // filter type
        let chunk_size = width_stride + 1;

        let image_len = width_stride * height;

        if deflate_data.len() < chunk_size * height {
            let msg = format!(
                "Not enough pixels, expected {} but found {}",
                chunk_size * height,
                deflate_data.len()
            );
            return Err(PngDecodeErrors::Generic(msg));
        }
        let mut out = alloc_zeroed(image_len)?;

        // bytes per complete pixel, the filter's left neighbour distance
        let components = ((usize::from(info.component) * usize::from(info.depth)) / 8).max(1);

        let mut first_row = true;
        let mut out_position = 0;
        let mut prev_row_start = 0;

        for in_stride in deflate_data.chunks_exact(chunk_size).take(height) {
            // Split output into current and previous
            let (prev, current) = out.split_at_mut(out_position);

            let prev_row: &[u8] = if first_row {
                &[]
            } else {
                &prev[prev_row_start..prev_row_start + width_stride]
            };
            if !first_row {
                prev_row_start += width_stride;
            }
            out_position += width_stride;

            let filter_byte = in_stride[0];
            let raw = &in_stride[1..];
            let current = &mut current[..width_stride];

            let mut filter = FilterMethod::from_int(filter_byte).ok_or_else(|| {
                PngDecodeErrors::Generic(format!("Unknown filter {filter_byte}"))
            })?;

            if first_row {
                // the row above the first is treated as zero
                filter = match filter {
                    FilterMethod::Paeth => FilterMethod::PaethFirst,
                    FilterMethod::Up => FilterMethod::None,
                    FilterMethod::Average => FilterMethod::AvgFirst,
                    other => other
                };
                first_row = false;
            }

            match filter {
                FilterMethod::None => current.copy_from_slice(raw),

                FilterMethod::Average => handle_avg(prev_row, raw, current, components),

                FilterMethod::Sub => handle_sub(raw, current, components),

                FilterMethod::Up => handle_up(prev_row, raw, current),

                FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components),

                FilterMethod::PaethFirst => handle_paeth_first(raw, current, components),

                FilterMethod::AvgFirst => handle_avg_first(raw, current, components)
            }
        }
        if info.depth < 8 {
            return self.expand_bits_to_byte(&out, width, height);
        }
        Ok(out)
    }

    /// Expand images with less than 8 bits per sample to a byte per sample
    ///
    /// Greyscale samples are scaled to the full 0..255 range, palette
    /// indices are kept as is
    fn expand_bits_to_byte(
        &self, input: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        const DEPTH_SCALE_TABLE: [u8; 9] = [0, 0xff, 0x55, 0, 0x11, 0, 0, 0, 0x01];

        let info = &self.png_info;
        let depth = usize::from(info.depth);
        let samples = width * usize::from(info.component);
        let width_stride = self.scanline_bytes(width);
        let mask = ((1_u16 << depth) - 1) as u8;

        let scale = if info.color == PngColor::Palette {
            1
        } else {
            DEPTH_SCALE_TABLE[depth]
        };
        let mut new_out = alloc_zeroed(samples * height)?;

        for (in_row, out_row) in input
            .chunks_exact(width_stride)
            .zip(new_out.chunks_exact_mut(samples))
        {
            for (i, sample) in out_row.iter_mut().enumerate() {
                let bit_position = i * depth;
                let byte = in_row[bit_position / 8];
                let shift = 8 - depth - (bit_position % 8);

                *sample = scale * ((byte >> shift) & mask);
            }
        }
        Ok(new_out)
    }

    /// Undo deflate decoding
    fn inflate(
        &self, data: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        // Deflate doesn't store its uncompressed size, the hint
        // lets the decoder allocate once for well formed streams
        let size_hint = (self.scanline_bytes(width) + 1) * height;

        let option = DeflateOptions::default()
            .set_size_hint(size_hint)
            .set_limit(self.options.inflate_get_limit())
            .set_confirm_checksum(self.options.inflate_get_confirm_adler());

        let mut decoder = zune_inflate::DeflateDecoder::new_with_options(data, option);

        decoder
            .decode_zlib()
            .map_err(PngDecodeErrors::ZlibDecodeErrors)
    }

    /// Expand a palettized image to RGB, or RGBA when a
    /// tRNS chunk was present
    fn expand_palette(&self, data: &[u8]) -> Vec<u8> {
        let components = if self.seen_trns { 4 } else { 3 };
        let mut out = vec![0; data.len() * components];

        for (px, entry) in out.chunks_exact_mut(components).zip(data) {
            // palette is always 256 entries long, so any u8 index is in bounds
            let entry = self.palette[usize::from(*entry)];

            px[0] = entry.red;
            px[1] = entry.green;
            px[2] = entry.blue;

            if components == 4 {
                px[3] = entry.alpha;
            }
        }
        out
    }
}

/// Scale big endian 16 bit samples down to 8 bits, rounding to nearest
fn strip_16_bit(input: &[u8]) -> Vec<u8> {
    input
        .chunks_exact(2)
        .map(|pair| {
            let value = u32::from(u16::from_be_bytes([pair[0], pair[1]]));
            ((value * 255 + 32895) >> 16) as u8
        })
        .collect()
}

/// Allocate a zeroed buffer, reporting allocation failure as an error
fn alloc_zeroed(size: usize) -> Result<Vec<u8>, PngDecodeErrors> {
    let mut buffer = Vec::new();

    buffer
        .try_reserve_exact(size)
        .map_err(|_| PngDecodeErrors::AllocationFailed(size))?;
    buffer.resize(size, 0);

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use crate::decoder::strip_16_bit;

    #[test]
    fn test_strip_16_bit_extremes() {
        let input = [0x00, 0x00, 0xFF, 0xFF, 0x80, 0x80, 0x01, 0x01];
        // a sample with equal bytes maps exactly to that byte
        assert_eq!(strip_16_bit(&input), [0x00, 0xFF, 0x80, 0x01]);
    }
}
