/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during png decoding
use core::fmt::{Debug, Display, Formatter};

use animframes_core::bytestream::ZByteIoError;
use zune_inflate::errors::InflateDecodeErrors;

/// Errors possible during decoding
pub enum PngDecodeErrors {
    /// Image signature is not a valid PNG signature
    BadSignature,
    /// Bad CRC, expected and found
    BadCrc(u32, u32),
    /// Generic message
    GenericStatic(&'static str),
    /// Generic message
    Generic(String),
    /// A stream feature this decoder does not handle
    Unsupported(String),
    /// Dimension that exceeds the configured limit,
    /// name of the dimension, configured limit, found value
    TooLargeDimensions(&'static str, usize, usize),
    /// Palette image without a PLTE chunk
    EmptyPalette,
    /// Could not allocate a buffer of the given size
    AllocationFailed(usize),
    /// Errors from the inflate decoder
    ZlibDecodeErrors(InflateDecodeErrors),
    /// Not enough bytes or a bad seek in the stream
    IoErrors(ZByteIoError)
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::BadCrc(expected, found) => writeln!(
                f,
                "CRC does not match, expected {expected:#010x} but found {found:#010x}"
            ),
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::Unsupported(val) => writeln!(f, "Unsupported: {val}"),
            Self::TooLargeDimensions(dimension, limit, found) => writeln!(
                f,
                "Image {dimension} {found} larger than maximum configured {dimension} {limit}, aborting"
            ),
            Self::EmptyPalette => writeln!(f, "Palette image without a PLTE chunk"),
            Self::AllocationFailed(size) => writeln!(f, "Could not allocate {size} bytes"),
            Self::ZlibDecodeErrors(err) => writeln!(f, "Error decoding idat chunks {err:?}"),
            Self::IoErrors(err) => writeln!(f, "I/O error {err:?}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<InflateDecodeErrors> for PngDecodeErrors {
    fn from(val: InflateDecodeErrors) -> Self {
        Self::ZlibDecodeErrors(val)
    }
}

impl From<ZByteIoError> for PngDecodeErrors {
    fn from(val: ZByteIoError) -> Self {
        Self::IoErrors(val)
    }
}
