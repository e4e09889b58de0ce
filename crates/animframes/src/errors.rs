/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when decoding, compositing and persisting animations
//!
//! Every error belongs to one [`ErrorKind`] so callers can tell
//! a bad file apart from an exhausted machine.
use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

use animframes_core::bytestream::ZByteIoError;

/// Broad classes of failures
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The input is malformed or truncated
    CorruptStream,
    /// The input is well formed but not something we handle
    UnsupportedFormat,
    /// An allocation failed or a configured limit was exceeded
    ResourceExhaustion,
    /// A broken internal invariant, should never be reachable
    InternalConsistency
}

pub enum AnimationErrors {
    /// Malformed or truncated data
    CorruptStream(String),
    /// A format or format feature we can't decode
    UnsupportedFormat(String),
    /// A configured limit was exceeded
    LimitExceeded(String),
    /// More frames than an animation may hold, requested and maximum
    TooManyFrames(usize, usize),
    /// Allocating a buffer failed
    AllocationFailed(TryReserveError),
    /// An index past the end of a frame sequence, index and frame count
    IndexOutOfBounds(usize, usize),
    /// A broken internal invariant
    InternalConsistency(&'static str),
    /// Errors from the bytestream reader
    IoErrors(ZByteIoError)
}

impl AnimationErrors {
    /// The class this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CorruptStream(_) | Self::IoErrors(_) => ErrorKind::CorruptStream,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::LimitExceeded(_) | Self::TooManyFrames(_, _) | Self::AllocationFailed(_) => {
                ErrorKind::ResourceExhaustion
            }
            Self::IndexOutOfBounds(_, _) | Self::InternalConsistency(_) => {
                ErrorKind::InternalConsistency
            }
        }
    }
}

impl Debug for AnimationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptStream(err) => writeln!(f, "Corrupt stream: {err}"),
            Self::UnsupportedFormat(err) => writeln!(f, "Unsupported format: {err}"),
            Self::LimitExceeded(err) => writeln!(f, "Limit exceeded: {err}"),
            Self::TooManyFrames(requested, max) => writeln!(
                f,
                "Animation has {requested} frames, more than the maximum of {max}"
            ),
            Self::AllocationFailed(err) => writeln!(f, "Allocation failed: {err}"),
            Self::IndexOutOfBounds(index, count) => writeln!(
                f,
                "Frame index {index} out of bounds for a sequence of {count} frames"
            ),
            Self::InternalConsistency(err) => writeln!(f, "Internal error: {err}"),
            Self::IoErrors(err) => writeln!(f, "I/O error: {err:?}")
        }
    }
}

impl Display for AnimationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for AnimationErrors {}

impl From<&'static str> for AnimationErrors {
    fn from(value: &'static str) -> Self {
        Self::CorruptStream(value.to_string())
    }
}

impl From<String> for AnimationErrors {
    fn from(value: String) -> Self {
        Self::CorruptStream(value)
    }
}

impl From<TryReserveError> for AnimationErrors {
    fn from(value: TryReserveError) -> Self {
        Self::AllocationFailed(value)
    }
}

impl From<ZByteIoError> for AnimationErrors {
    fn from(value: ZByteIoError) -> Self {
        Self::IoErrors(value)
    }
}

#[cfg(feature = "png")]
impl From<animframes_png::PngDecodeErrors> for AnimationErrors {
    fn from(from: animframes_png::PngDecodeErrors) -> Self {
        use animframes_png::PngDecodeErrors;

        let err = format!("png: {from:?}");

        match from {
            PngDecodeErrors::BadSignature | PngDecodeErrors::Unsupported(_) => {
                Self::UnsupportedFormat(err)
            }
            PngDecodeErrors::TooLargeDimensions(..) | PngDecodeErrors::AllocationFailed(_) => {
                Self::LimitExceeded(err)
            }
            _ => Self::CorruptStream(err)
        }
    }
}
