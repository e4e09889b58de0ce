/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::ZByteIoError;

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// it provides fine grained options for reading different integer data types from
/// the underlying buffer.
///
/// There are two variants mainly error and non error variants,
/// the error variants return an `Err` when the underlying buffer doesn't
/// have enough bytes, the non error variants return zero.
pub struct ZByteReader<'a> {
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

impl<'a> ZByteReader<'a> {
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Skip `num` bytes ahead of the stream.
    ///
    /// Skipping past the end clamps the position to the end of the stream
    pub fn skip(&mut self, num: usize) {
        self.position = self.position.saturating_add(num).min(self.stream.len());
    }
    /// Undo a buffer read by moving the position pointer `num`
    /// bytes behind.
    pub fn rewind(&mut self, num: usize) -> Result<(), ZByteIoError> {
        self.position = self
            .position
            .checked_sub(num)
            .ok_or(ZByteIoError::SeekError("Rewind before start of stream"))?;
        Ok(())
    }
    /// Return whether the underlying buffer
    /// has `num` bytes available for reading
    #[inline]
    pub const fn has(&self, num: usize) -> bool {
        self.position.saturating_add(num) <= self.stream.len()
    }
    /// Get number of bytes available in the stream
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.stream.len().saturating_sub(self.position)
    }
    /// Get current position of the reader
    #[inline]
    pub const fn get_position(&self) -> usize {
        self.position
    }
    /// Set the position of the reader, clamped to the stream length
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.stream.len());
    }
    /// Return true if the reader has consumed every byte
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Return a reference to the next `num` bytes, advancing the stream
    ///
    /// Errors out if the stream does not have `num` bytes
    pub fn get_as_ref(&mut self, num: usize) -> Result<&'a [u8], ZByteIoError> {
        if !self.has(num) {
            return Err(ZByteIoError::NotEnoughBytes(num, self.remaining()));
        }
        let data = &self.stream[self.position..self.position + num];
        self.position += num;
        Ok(data)
    }

    /// Look ahead position bytes and return a reference
    /// to num_bytes from that position, or an error if the
    /// peek would be out of bounds.
    ///
    /// This doesn't increment the position, bytes would have to be discarded
    /// at a later point.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ZByteIoError> {
        let start = self.position.saturating_add(position);
        let end = start.saturating_add(num_bytes);

        if end > self.stream.len() {
            return Err(ZByteIoError::NotEnoughBytes(
                position + num_bytes,
                self.remaining()
            ));
        }
        Ok(&self.stream[start..end])
    }

    /// Read `N` bytes into an array, erroring out if the stream
    /// does not have enough bytes
    #[inline]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ZByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        byte_store.copy_from_slice(self.get_as_ref(N)?);
        Ok(byte_store)
    }

    /// Read a single byte, erroring out if the stream has been exhausted
    #[inline]
    pub fn get_u8_err(&mut self) -> Result<u8, ZByteIoError> {
        Ok(self.read_fixed_bytes_or_error::<1>()?[0])
    }

    /// Read a single byte returning 0 if the stream has been exhausted
    #[inline]
    pub fn get_u8(&mut self) -> u8 {
        self.get_u8_err().unwrap_or(0)
    }

    /// Read a little endian `f32`, erroring out if the stream
    /// does not have four bytes
    pub fn get_f32_le_err(&mut self) -> Result<f32, ZByteIoError> {
        Ok(f32::from_bits(self.get_u32_le_err()?))
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$name4:tt,$name5:tt,$int_type:tt) => {
        impl<'a> ZByteReader<'a> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> Result<$int_type, ZByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes_or_error::<SIZE_OF_VAL>()?;

                match mode {
                    Mode::BE => Ok($int_type::from_be_bytes(space)),
                    Mode::LE => Ok($int_type::from_le_bytes(space))
                }
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name2(&mut self) -> Result<$int_type, ZByteIoError> {
                self.$name(Mode::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name3(&mut self) -> Result<$int_type, ZByteIoError> {
                self.$name(Mode::LE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning 0 if the underlying  buffer does not have enough bytes for a ",stringify!($int_type)," read.")]
            #[inline(always)]
            pub fn $name4(&mut self) -> $int_type {
                self.$name(Mode::BE).unwrap_or(0)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning 0 if the underlying buffer does not have enough bytes for a ",stringify!($int_type)," read.")]
            #[inline(always)]
            pub fn $name5(&mut self) -> $int_type {
                self.$name(Mode::LE).unwrap_or(0)
            }
        }
    };
}

get_single_type!(
    get_u16_inner,
    get_u16_be_err,
    get_u16_le_err,
    get_u16_be,
    get_u16_le,
    u16
);
get_single_type!(
    get_u32_inner,
    get_u32_be_err,
    get_u32_le_err,
    get_u32_be,
    get_u32_le,
    u32
);
get_single_type!(
    get_u64_inner,
    get_u64_be_err,
    get_u64_le_err,
    get_u64_be,
    get_u64_le,
    u64
);
