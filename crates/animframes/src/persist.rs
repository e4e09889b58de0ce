/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Persisted frame sequences
//!
//! A simple streamable container for decoded animations, so that
//! they can be stored once and loaded without decoding again.
//!
//! # Layout
//! All integers are little endian.
//!
//! | field        | size  |
//! |--------------|-------|
//! | magic `AFSQ` | 4     |
//! | version      | u32   |
//! | width        | u32   |
//! | height       | u32   |
//! | flags        | u32   |
//! | frame count  | u32   |
//! | loop flag    | u8    |
//! | loop count   | u32   |
//! | reserved     | 3*u32 |
//!
//! followed by every frame in playback order
//!
//! | field       | size  |
//! |-------------|-------|
//! | reserved    | 3*u32 |
//! | delay       | f32   |
//! | colorspace  | u8    |
//! | width       | u32   |
//! | height      | u32   |
//! | compression | u8    |
//! | length      | u32   |
//! | payload     | length|
//!
//! Compression `0` stores raw pixels, `1` stores a zlib stream.
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{info, trace};
use zune_inflate::{DeflateDecoder, DeflateOptions};

use animframes_core::bytestream::{ZByteReader, ZByteWriter};
use animframes_core::colorspace::ColorSpace;
use animframes_core::options::{DecoderOptions, EncoderOptions};

use crate::errors::AnimationErrors;
use crate::sequence::{FrameImage, FrameSequence, MAX_FRAMES};

/// Magic bytes starting every persisted sequence
pub const MAGIC: [u8; 4] = *b"AFSQ";
/// Newest layout version understood by this library
pub const FORMAT_VERSION: u32 = 1;

/// Set in the header flags when frame payloads are compressed
pub const FLAG_COMPRESSED: u32 = 1;

const COMPRESSION_NONE: u8 = 0;
const COMPRESSION_ZLIB: u8 = 1;

/// Top level information of a persisted sequence
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SequenceHeader {
    pub version:     u32,
    pub width:       usize,
    pub height:      usize,
    pub flags:       u32,
    pub frame_count: usize,
    /// Whether the animation repeats
    pub loops:       bool,
    pub loop_count:  u32
}

fn to_u32(value: usize, what: &'static str) -> Result<u32, AnimationErrors> {
    u32::try_from(value).map_err(|_| {
        AnimationErrors::LimitExceeded(format!("{what} {value} does not fit in 32 bits"))
    })
}

/// Encodes a [`FrameSequence`] into the persisted layout
///
/// # Example
/// ```
/// use animframes::persist::{SequenceDecoder, SequenceEncoder};
/// use animframes::sequence::{FrameImage, FrameSequence};
/// use animframes::animframes_core::colorspace::ColorSpace;
/// use animframes::animframes_core::options::{DecoderOptions, EncoderOptions};
///
/// let image = FrameImage::new(2, 1, ColorSpace::Luma, vec![10, 20]).unwrap();
/// let sequence = FrameSequence::from_frames(vec![image], &[0.1]).unwrap();
///
/// let bytes = SequenceEncoder::new(&sequence, EncoderOptions::default()).encode().unwrap();
/// let decoded = SequenceDecoder::new(&bytes, DecoderOptions::default()).decode().unwrap();
///
/// assert_eq!(decoded, sequence);
/// ```
pub struct SequenceEncoder<'a> {
    sequence: &'a FrameSequence,
    options:  EncoderOptions
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(sequence: &'a FrameSequence, options: EncoderOptions) -> SequenceEncoder<'a> {
        SequenceEncoder { sequence, options }
    }

    fn encode_headers(&self, stream: &mut ZByteWriter) -> Result<(), AnimationErrors> {
        let (width, height) = self.sequence.dimensions();
        let flags = if self.options.get_compress() {
            FLAG_COMPRESSED
        } else {
            0
        };
        let loop_count = self.sequence.loop_count();

        stream.write_all(&MAGIC);
        stream.write_u32_le(FORMAT_VERSION);
        stream.write_u32_le(to_u32(width, "Width")?);
        stream.write_u32_le(to_u32(height, "Height")?);
        stream.write_u32_le(flags);
        stream.write_u32_le(to_u32(self.sequence.frame_count(), "Frame count")?);
        stream.write_u8(u8::from(loop_count != 1));
        stream.write_u32_le(loop_count);
        // reserved
        for _ in 0..3 {
            stream.write_u32_le(0);
        }
        Ok(())
    }

    fn encode_payload(
        &self, image: &FrameImage, stream: &mut ZByteWriter
    ) -> Result<(), AnimationErrors> {
        stream.write_u8(image.colorspace().to_u8());
        stream.write_u32_le(to_u32(image.width(), "Width")?);
        stream.write_u32_le(to_u32(image.height(), "Height")?);

        if self.options.get_compress() {
            let mut encoder = ZlibEncoder::new(
                Vec::new(),
                Compression::new(u32::from(self.options.get_level()))
            );
            encoder
                .write_all(image.pixels())
                .map_err(|e| AnimationErrors::LimitExceeded(format!("Compressing frame: {e}")))?;
            let compressed = encoder
                .finish()
                .map_err(|e| AnimationErrors::LimitExceeded(format!("Compressing frame: {e}")))?;

            stream.write_u8(COMPRESSION_ZLIB);
            stream.write_u32_le(to_u32(compressed.len(), "Payload length")?);
            stream.write_all(&compressed);
        } else {
            stream.write_u8(COMPRESSION_NONE);
            stream.write_u32_le(to_u32(image.pixels().len(), "Payload length")?);
            stream.write_all(image.pixels());
        }
        Ok(())
    }

    /// Encode the sequence returning the bytes
    pub fn encode(&self) -> Result<Vec<u8>, AnimationErrors> {
        let mut stream = ZByteWriter::new();

        self.encode_headers(&mut stream)?;

        for (pos, frame) in self.sequence.frames().iter().enumerate() {
            // reserved
            for _ in 0..3 {
                stream.write_u32_le(0);
            }
            stream.write_f32_le(frame.delay());
            self.encode_payload(frame.image(), &mut stream)?;
            trace!("Frame {pos} written, {} bytes so far", stream.bytes_written());
        }
        Ok(stream.into_inner())
    }
}

/// Decodes a persisted sequence
pub struct SequenceDecoder<'a> {
    stream:  ZByteReader<'a>,
    options: DecoderOptions,
    header:  Option<SequenceHeader>
}

impl<'a> SequenceDecoder<'a> {
    pub fn new(data: &'a [u8], options: DecoderOptions) -> SequenceDecoder<'a> {
        SequenceDecoder {
            stream: ZByteReader::new(data),
            options,
            header: None
        }
    }

    /// Read the sequence header, returning it
    ///
    /// Calling this more than once returns the cached header.
    pub fn decode_headers(&mut self) -> Result<SequenceHeader, AnimationErrors> {
        if let Some(header) = self.header {
            return Ok(header);
        }
        let magic = self.stream.read_fixed_bytes_or_error::<4>()?;

        if magic != MAGIC {
            return Err(AnimationErrors::UnsupportedFormat(format!(
                "Bad magic bytes {magic:?}, not a persisted frame sequence"
            )));
        }
        let version = self.stream.get_u32_le_err()?;

        if version > FORMAT_VERSION {
            return Err(AnimationErrors::UnsupportedFormat(format!(
                "Sequence version {version} is newer than the supported version {FORMAT_VERSION}"
            )));
        }
        let width = self.stream.get_u32_le_err()? as usize;
        let height = self.stream.get_u32_le_err()? as usize;
        let flags = self.stream.get_u32_le_err()?;
        let frame_count = self.stream.get_u32_le_err()? as usize;
        let loops = self.stream.get_u8_err()? != 0;
        let loop_count = self.stream.get_u32_le_err()?;
        self.stream.get_as_ref(12)?;

        if frame_count > MAX_FRAMES {
            return Err(AnimationErrors::TooManyFrames(frame_count, MAX_FRAMES));
        }
        self.check_dimensions(width, height)?;

        info!("Sequence version: {version}");
        info!("Width: {width}");
        info!("Height: {height}");
        info!("Frames: {frame_count}");
        info!("Loop count: {loop_count}");

        let header = SequenceHeader {
            version,
            width,
            height,
            flags,
            frame_count,
            loops,
            loop_count
        };
        self.header = Some(header);

        Ok(header)
    }

    fn check_dimensions(&self, width: usize, height: usize) -> Result<(), AnimationErrors> {
        if width > self.options.get_max_width() {
            return Err(AnimationErrors::LimitExceeded(format!(
                "Width {width} greater than max width {}",
                self.options.get_max_width()
            )));
        }
        if height > self.options.get_max_height() {
            return Err(AnimationErrors::LimitExceeded(format!(
                "Height {height} greater than max height {}",
                self.options.get_max_height()
            )));
        }
        Ok(())
    }

    fn decode_payload(&mut self) -> Result<FrameImage, AnimationErrors> {
        let colorspace_tag = self.stream.get_u8_err()?;
        let colorspace = ColorSpace::from_u8(colorspace_tag).ok_or_else(|| {
            AnimationErrors::CorruptStream(format!("Unknown colorspace tag {colorspace_tag}"))
        })?;
        let width = self.stream.get_u32_le_err()? as usize;
        let height = self.stream.get_u32_le_err()? as usize;

        self.check_dimensions(width, height)?;

        let compression = self.stream.get_u8_err()?;
        let length = self.stream.get_u32_le_err()? as usize;
        let payload = self.stream.get_as_ref(length)?;

        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(colorspace.num_components()))
            .ok_or("Frame dimensions overflow")?;

        let pixels = match compression {
            COMPRESSION_NONE => {
                if payload.len() != expected {
                    return Err(AnimationErrors::CorruptStream(format!(
                        "Raw payload of {length} bytes, expected {expected}"
                    )));
                }
                let mut pixels = Vec::new();
                pixels.try_reserve_exact(expected)?;
                pixels.extend_from_slice(payload);
                pixels
            }
            COMPRESSION_ZLIB => {
                let options = DeflateOptions::default()
                    .set_size_hint(expected)
                    .set_limit(expected.min(self.options.inflate_get_limit()))
                    .set_confirm_checksum(self.options.inflate_get_confirm_adler());

                DeflateDecoder::new_with_options(payload, options)
                    .decode_zlib()
                    .map_err(|e| {
                        AnimationErrors::CorruptStream(format!("Bad frame payload: {e:?}"))
                    })?
            }
            tag => {
                return Err(AnimationErrors::UnsupportedFormat(format!(
                    "Unknown compression tag {tag}"
                )));
            }
        };
        FrameImage::new(width, height, colorspace, pixels)
    }

    /// Decode the whole sequence
    pub fn decode(&mut self) -> Result<FrameSequence, AnimationErrors> {
        let header = self.decode_headers()?;

        let mut sequence = FrameSequence::new();
        sequence.set_frame_count(header.frame_count)?;
        sequence.set_loop_count(header.loop_count);

        for pos in 0..header.frame_count {
            self.stream.get_as_ref(12)?;
            let delay = self.stream.get_f32_le_err()?;
            let image = self.decode_payload()?;

            trace!("Frame {pos}: {}x{} {:?}", image.width(), image.height(), image.colorspace());

            sequence.set_frame_image(pos, image)?;
            sequence.set_frame_delay(pos, delay)?;
        }
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use animframes_core::colorspace::ColorSpace;
    use animframes_core::options::{DecoderOptions, EncoderOptions};

    use crate::errors::ErrorKind;
    use crate::persist::{SequenceDecoder, SequenceEncoder, FORMAT_VERSION};
    use crate::sequence::{FrameImage, FrameSequence};

    fn small_sequence() -> FrameSequence {
        let a = FrameImage::new(2, 2, ColorSpace::RGBA, (0..16).collect()).unwrap();
        let b = FrameImage::new(2, 2, ColorSpace::RGBA, (16..32).collect()).unwrap();
        let mut sequence = FrameSequence::from_frames(vec![a, b], &[0.1, 0.5]).unwrap();
        sequence.set_loop_count(2);
        sequence
    }

    #[test]
    fn test_header_fields() {
        let sequence = small_sequence();
        let bytes = SequenceEncoder::new(&sequence, EncoderOptions::default())
            .encode()
            .unwrap();

        let mut decoder = SequenceDecoder::new(&bytes, DecoderOptions::default());
        let header = decoder.decode_headers().unwrap();

        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!((header.width, header.height), (2, 2));
        assert_eq!(header.frame_count, 2);
        assert_eq!(header.loop_count, 2);
        assert!(header.loops);
    }

    #[test]
    fn test_uncompressed_roundtrip() {
        let sequence = small_sequence();
        let options = EncoderOptions::default().set_compress(false);
        let bytes = SequenceEncoder::new(&sequence, options).encode().unwrap();

        let decoded = SequenceDecoder::new(&bytes, DecoderOptions::default())
            .decode()
            .unwrap();
        assert_eq!(decoded, sequence);
    }

    #[test]
    fn test_newer_version_rejected() {
        let sequence = small_sequence();
        let mut bytes = SequenceEncoder::new(&sequence, EncoderOptions::default())
            .encode()
            .unwrap();
        bytes[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());

        let err = SequenceDecoder::new(&bytes, DecoderOptions::default())
            .decode()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let err = SequenceDecoder::new(b"GIF89a.........", DecoderOptions::default())
            .decode()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_truncated_is_corrupt() {
        let sequence = small_sequence();
        let bytes = SequenceEncoder::new(&sequence, EncoderOptions::default())
            .encode()
            .unwrap();

        for end in [10, 40, bytes.len() - 1] {
            let err = SequenceDecoder::new(&bytes[..end], DecoderOptions::default())
                .decode()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CorruptStream, "truncated at {end}");
        }
    }

    #[test]
    fn test_payload_size_mismatch() {
        let sequence = small_sequence();
        let options = EncoderOptions::default().set_compress(false);
        let mut bytes = SequenceEncoder::new(&sequence, options).encode().unwrap();

        // first frame width, after the 41 byte header, 12 reserved bytes,
        // the delay and the colorspace tag
        let width_pos = 41 + 12 + 4 + 1;
        bytes[width_pos..width_pos + 4].copy_from_slice(&3_u32.to_le_bytes());

        let err = SequenceDecoder::new(&bytes, DecoderOptions::default())
            .decode()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }
}
