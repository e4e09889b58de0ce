/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! and writer.
//!
//! The reader works over an in-memory slice, since every
//! animation is read into memory once before decoding begins,
//! the writer appends to a growable vector.
use core::fmt::{Debug, Display, Formatter};

pub use reader::ZByteReader;
pub use writer::ZByteWriter;

mod reader;
mod writer;

/// Errors raised by the bytestream reader and writer
pub enum ZByteIoError {
    /// Requested more bytes than what is left in the stream
    ///
    /// Arguments are bytes requested, bytes present.
    NotEnoughBytes(usize, usize),
    /// A seek moved before the start of the stream
    SeekError(&'static str),
    /// A generic error
    Generic(&'static str)
}

impl Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ZByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ZByteIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
            ZByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for ZByteIoError {}

impl From<&'static str> for ZByteIoError {
    fn from(value: &'static str) -> Self {
        ZByteIoError::Generic(value)
    }
}
