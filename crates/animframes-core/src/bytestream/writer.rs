/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Encapsulates a simple Byte writer with
/// support for Endian aware writes
///
/// Bytes are appended to an owned vector, so writes never fail,
/// the vector can be retrieved via [`ZByteWriter::into_inner`]
#[derive(Default)]
pub struct ZByteWriter {
    buffer: Vec<u8>
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

impl ZByteWriter {
    /// Create a new writer
    pub fn new() -> ZByteWriter {
        ZByteWriter::default()
    }
    /// Create a new writer whose buffer can hold
    /// `capacity` bytes before reallocating
    pub fn with_capacity(capacity: usize) -> ZByteWriter {
        ZByteWriter {
            buffer: Vec::with_capacity(capacity)
        }
    }
    /// Number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }
    /// Write all bytes from `buf`
    pub fn write_all(&mut self, buf: &[u8]) {
        self.buffer.extend_from_slice(buf);
    }
    /// Write a single byte
    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }
    /// Write a little endian `f32`
    pub fn write_f32_le(&mut self, value: f32) {
        self.write_u32_le(value.to_bits());
    }
    /// Consume the writer returning the bytes written
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

macro_rules! write_single_type {
    ($name:tt,$name2:tt,$name3:tt,$int_type:tt) => {
        impl ZByteWriter {
            #[inline(always)]
            fn $name(&mut self, byte: $int_type, mode: Mode) {
                let bytes = match mode {
                    Mode::BE => byte.to_be_bytes(),
                    Mode::LE => byte.to_le_bytes()
                };
                self.write_all(&bytes);
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a big endian integer")]
            #[inline]
            pub fn $name2(&mut self, byte: $int_type) {
                self.$name(byte, Mode::BE)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[inline]
            pub fn $name3(&mut self, byte: $int_type) {
                self.$name(byte, Mode::LE)
            }
        }
    };
}

write_single_type!(write_u16_inner, write_u16_be, write_u16_le, u16);
write_single_type!(write_u32_inner, write_u32_be, write_u32_le, u32);
write_single_type!(write_u64_inner, write_u64_be, write_u64_le, u64);
