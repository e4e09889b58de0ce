/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global encoder options

/// Encoder options
///
/// Respected by the persisted sequence encoder
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    /// Whether frame payloads should be deflate compressed
    ///
    /// - Default value: true
    compress: bool,
    /// Compression level, 0-9, higher is smaller but slower
    ///
    /// - Default value: 6
    level:    u8
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            compress: true,
            level:    6
        }
    }
}

impl EncoderOptions {
    /// Return whether frame payloads will be compressed
    pub const fn get_compress(&self) -> bool {
        self.compress
    }
    /// Set whether frame payloads should be compressed
    pub fn set_compress(mut self, yes: bool) -> Self {
        self.compress = yes;
        self
    }
    /// Get the configured compression level
    pub const fn get_level(&self) -> u8 {
        self.level
    }
    /// Set the compression level, values above 9 are clamped to 9
    pub fn set_level(mut self, level: u8) -> Self {
        self.level = level.min(9);
        self
    }
}
