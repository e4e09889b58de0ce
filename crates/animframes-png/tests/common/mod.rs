/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Builds small png and apng streams chunk by chunk
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

pub const COLOR_LUMA: u8 = 0;
pub const COLOR_RGB: u8 = 2;
pub const COLOR_PALETTE: u8 = 3;
pub const COLOR_RGBA: u8 = 6;

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Prefix every `row_bytes` wide row with the `None` filter byte
pub fn filter_none(pixels: &[u8], row_bytes: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() + pixels.len() / row_bytes);

    for row in pixels.chunks_exact(row_bytes) {
        out.push(0);
        out.extend_from_slice(row);
    }
    out
}

pub struct ApngBuilder {
    width:    u32,
    height:   u32,
    bpp:      usize,
    out:      Vec<u8>,
    sequence: u32
}

impl ApngBuilder {
    /// An 8 bit image of the given png colour type
    pub fn new(width: u32, height: u32, color: u8) -> ApngBuilder {
        Self::with_depth(width, height, color, 8, 0)
    }

    pub fn with_depth(width: u32, height: u32, color: u8, depth: u8, interlace: u8) -> ApngBuilder {
        let components = match color {
            0 | 3 => 1,
            2 => 3,
            4 => 2,
            _ => 4
        };
        let mut builder = ApngBuilder {
            width,
            height,
            bpp: components * usize::from(depth) / 8,
            out: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            sequence: 0
        };
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[depth, color, 0, 0, interlace]);

        builder.chunk(b"IHDR", &ihdr);
        builder
    }

    pub fn chunk(&mut self, name: &[u8; 4], data: &[u8]) -> &mut Self {
        let mut crc = Crc::new();
        crc.update(name);
        crc.update(data);

        self.out
            .extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.out.extend_from_slice(name);
        self.out.extend_from_slice(data);
        self.out.extend_from_slice(&crc.sum().to_be_bytes());
        self
    }

    pub fn actl(&mut self, num_frames: u32, num_plays: u32) -> &mut Self {
        let mut data = num_frames.to_be_bytes().to_vec();
        data.extend_from_slice(&num_plays.to_be_bytes());
        self.chunk(b"acTL", &data)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fctl(
        &mut self, width: u32, height: u32, x: u32, y: u32, delay_num: u16, delay_den: u16,
        dispose: u8, blend: u8
    ) -> &mut Self {
        let mut data = self.sequence.to_be_bytes().to_vec();
        self.sequence += 1;

        for value in [width, height, x, y] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        data.extend_from_slice(&delay_num.to_be_bytes());
        data.extend_from_slice(&delay_den.to_be_bytes());
        data.push(dispose);
        data.push(blend);

        self.chunk(b"fcTL", &data)
    }

    /// IDAT holding the canvas sized default image
    pub fn idat(&mut self, pixels: &[u8]) -> &mut Self {
        let row_bytes = self.width as usize * self.bpp;
        let data = zlib(&filter_none(pixels, row_bytes));
        self.chunk(b"IDAT", &data)
    }

    /// IDAT from already filtered scanlines
    pub fn idat_raw(&mut self, scanlines: &[u8]) -> &mut Self {
        let data = zlib(scanlines);
        self.chunk(b"IDAT", &data)
    }

    /// fdAT holding a `width` pixels wide frame
    pub fn fdat(&mut self, pixels: &[u8], width: u32) -> &mut Self {
        let row_bytes = width as usize * self.bpp;
        let compressed = zlib(&filter_none(pixels, row_bytes));

        let mut data = self.sequence.to_be_bytes().to_vec();
        self.sequence += 1;
        data.extend_from_slice(&compressed);

        self.chunk(b"fdAT", &data)
    }

    /// Overwrite the sequence number used by the next animation chunk
    pub fn set_sequence(&mut self, sequence: u32) -> &mut Self {
        self.sequence = sequence;
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.chunk(b"IEND", &[]);
        std::mem::take(&mut self.out)
    }
}
