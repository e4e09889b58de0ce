/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Decoder options

fn decoder_strict_mode() -> DecoderFlags {
    DecoderFlags {
        inflate_confirm_adler: true,
        png_confirm_crc:       true,
        error_on_sequence:     true,
        decode_animated:       true
    }
}

/// Command line options error resilient and fast
///
/// Features
/// - Ignore CRC and Adler in png
/// - Warn on out of order sequence numbers instead of erroring
fn cmd_options() -> DecoderFlags {
    DecoderFlags {
        inflate_confirm_adler: false,
        png_confirm_crc:       false,
        error_on_sequence:     false,
        decode_animated:       true
    }
}

/// Decoder options that are flags
///
/// NOTE: When you extend this, add true or false to
/// all options above that return a `DecoderFlag`
#[derive(Copy, Debug, Clone)]
struct DecoderFlags {
    /// Whether the decoder should confirm and report adler mismatch
    inflate_confirm_adler: bool,
    /// Whether the PNG decoder should confirm crc
    png_confirm_crc:       bool,
    /// Whether out of order animation sequence numbers are errors
    error_on_sequence:     bool,
    /// Decode all frames for animated images
    decode_animated:       bool
}

impl Default for DecoderFlags {
    fn default() -> Self {
        DecoderFlags {
            inflate_confirm_adler: true,
            png_confirm_crc:       true,
            error_on_sequence:     false,
            decode_animated:       true
        }
    }
}

/// Decoder options
///
/// Not all options are respected by all frame sources
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_width:     usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_height:    usize,
    /// Maximum number of composited frames to produce,
    /// zero means no limit beyond what the stream declares
    ///
    /// - Default value: 0
    /// - Respected by: `compositor`
    max_frames:    usize,
    /// Maximum size for deflate.
    /// Respected by all decoders that use inflate/deflate
    deflate_limit: usize,
    /// Boolean flags that influence decoding
    flags:         DecoderFlags
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:     1 << 14,
            max_height:    1 << 14,
            max_frames:    0,
            deflate_limit: 1 << 30,
            flags:         DecoderFlags::default()
        }
    }
}

/// Initializers
impl DecoderOptions {
    /// Create the decoder with options setting most configurable
    /// options to be their safe counterparts
    ///
    /// This is the same as `default`
    pub fn new_safe() -> DecoderOptions {
        DecoderOptions::default()
    }

    /// Create the decoder options with the following characteristics
    ///
    /// - Ignore error checksuming, e.g in png we do not confirm adler and crc in this mode
    /// - Tolerate out of order sequence numbers
    pub fn new_cmd() -> DecoderOptions {
        DecoderOptions::default().set_decoder_flags(cmd_options())
    }

    fn set_decoder_flags(mut self, flags: DecoderFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Global options respected by all decoders
impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    ///
    /// # Arguments
    ///
    /// * `width`:  The maximum width allowed
    ///
    /// returns: DecoderOptions
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    /// # Arguments
    ///
    /// * `height`: The maximum height allowed
    ///
    /// returns: DecoderOptions
    ///
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Get the maximum number of output frames, 0 means unlimited
    pub const fn get_max_frames(&self) -> usize {
        self.max_frames
    }

    /// Stop decoding after `frames` composited frames have been produced.
    ///
    /// Reaching the limit is not an error, the sequence is
    /// simply cut short. Zero disables the limit.
    pub fn set_max_frames(mut self, frames: usize) -> Self {
        self.max_frames = frames;
        self
    }

    /// Return true whether the decoder should be in strict mode
    /// And reject most errors
    pub const fn get_strict_mode(&self) -> bool {
        self.flags.error_on_sequence
            | self.flags.png_confirm_crc
            | self.flags.inflate_confirm_adler
    }

    /// Set whether the decoder should be in standards conforming/
    /// strict mode
    ///
    /// This reduces the error tolerance level for the decoders and invalid
    /// samples will be rejected by the decoder
    ///
    /// # Arguments
    ///
    /// * `yes`:
    ///
    /// returns: DecoderOptions
    ///
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        if yes {
            let animated = self.flags.decode_animated;
            self.flags = decoder_strict_mode();
            self.flags.decode_animated = animated;
        } else {
            self.flags.error_on_sequence = false;
            self.flags.png_confirm_crc = false;
            self.flags.inflate_confirm_adler = false;
        }
        self
    }

    /// Whether out of order animation sequence numbers
    /// should be reported as errors instead of warnings
    pub const fn get_error_on_sequence(&self) -> bool {
        self.flags.error_on_sequence
    }

    /// Return whether animated images should be decoded fully or
    /// whether we should just decode the default image only
    pub const fn get_decode_animated(&self) -> bool {
        self.flags.decode_animated
    }
    /// Set whether animated images should be decoded fully or
    /// whether we should just decode the default image only
    pub const fn set_decode_animated(mut self, yes: bool) -> Self {
        self.flags.decode_animated = yes;
        self
    }
}

/// PNG specific options
impl DecoderOptions {
    /// Whether the inflate decoder should confirm
    /// adler checksums
    pub const fn inflate_get_confirm_adler(&self) -> bool {
        self.flags.inflate_confirm_adler
    }
    /// Set whether the inflate decoder should confirm
    /// adler checksums
    pub fn inflate_set_confirm_adler(mut self, yes: bool) -> Self {
        self.flags.inflate_confirm_adler = yes;
        self
    }
    /// Get default inflate limit for which the decoder
    /// will not try to decompress further
    pub const fn inflate_get_limit(&self) -> usize {
        self.deflate_limit
    }
    /// Set the default inflate limit for which decompressors
    /// relying on inflate won't surpass this limit
    #[must_use]
    pub fn inflate_set_limit(mut self, limit: usize) -> Self {
        self.deflate_limit = limit;
        self
    }
    /// Whether the png decoder should confirm
    /// crc 32 checksums
    pub const fn png_get_confirm_crc(&self) -> bool {
        self.flags.png_confirm_crc
    }
    /// Set whether the png decoder should confirm
    /// CRC 32 checksums
    #[must_use]
    pub fn png_set_confirm_crc(mut self, yes: bool) -> Self {
        self.flags.png_confirm_crc = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::options::DecoderOptions;

    #[test]
    fn test_strict_mode_keeps_animation_flag() {
        let options = DecoderOptions::default()
            .set_decode_animated(false)
            .set_strict_mode(true);

        assert!(options.get_strict_mode());
        assert!(options.get_error_on_sequence());
        assert!(!options.get_decode_animated());

        let relaxed = options.set_strict_mode(false);
        assert!(!relaxed.get_strict_mode());
        assert!(!relaxed.png_get_confirm_crc());
    }

    #[test]
    fn test_defaults() {
        let options = DecoderOptions::default();

        assert_eq!(options.get_max_width(), 16384);
        assert_eq!(options.get_max_height(), 16384);
        assert_eq!(options.get_max_frames(), 0);
        assert!(options.get_decode_animated());
        assert!(!DecoderOptions::new_cmd().png_get_confirm_crc());
    }
}
