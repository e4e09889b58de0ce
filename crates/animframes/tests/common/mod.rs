/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Writes small animated pngs out of frame descriptions
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

pub const DISPOSE_NONE: u8 = 0;
pub const DISPOSE_BACKGROUND: u8 = 1;
pub const DISPOSE_PREVIOUS: u8 = 2;

pub const BLEND_SOURCE: u8 = 0;
pub const BLEND_OVER: u8 = 1;

/// One animation frame, 8 bit RGBA pixels
#[derive(Clone)]
pub struct FrameSpec {
    pub width:     u32,
    pub height:    u32,
    pub x:         u32,
    pub y:         u32,
    pub delay_num: u16,
    pub delay_den: u16,
    pub dispose:   u8,
    pub blend:     u8,
    pub pixels:    Vec<u8>
}

impl FrameSpec {
    pub fn solid(width: u32, height: u32, x: u32, y: u32, pixel: [u8; 4]) -> FrameSpec {
        FrameSpec::new(width, height, x, y, pixel.repeat((width * height) as usize))
    }

    pub fn new(width: u32, height: u32, x: u32, y: u32, pixels: Vec<u8>) -> FrameSpec {
        FrameSpec {
            width,
            height,
            x,
            y,
            delay_num: 1,
            delay_den: 10,
            dispose: DISPOSE_NONE,
            blend: BLEND_SOURCE,
            pixels
        }
    }

    pub fn dispose(mut self, dispose: u8) -> FrameSpec {
        self.dispose = dispose;
        self
    }

    pub fn blend(mut self, blend: u8) -> FrameSpec {
        self.blend = blend;
        self
    }

    pub fn delay(mut self, num: u16, den: u16) -> FrameSpec {
        self.delay_num = num;
        self.delay_den = den;
        self
    }
}

fn chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    let mut crc = Crc::new();
    crc.update(name);
    crc.update(data);

    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

fn compress(pixels: &[u8], width: u32) -> Vec<u8> {
    let mut filtered = Vec::new();

    for row in pixels.chunks_exact(width as usize * 4) {
        filtered.push(0);
        filtered.extend_from_slice(row);
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(&filtered).unwrap();
    encoder.finish().unwrap()
}

fn fctl(out: &mut Vec<u8>, sequence: &mut u32, frame: &FrameSpec) {
    let mut data = sequence.to_be_bytes().to_vec();
    *sequence += 1;

    for value in [frame.width, frame.height, frame.x, frame.y] {
        data.extend_from_slice(&value.to_be_bytes());
    }
    data.extend_from_slice(&frame.delay_num.to_be_bytes());
    data.extend_from_slice(&frame.delay_den.to_be_bytes());
    data.extend_from_slice(&[frame.dispose, frame.blend]);

    chunk(out, b"fcTL", &data);
}

/// Write an RGBA apng
///
/// The first frame is stored in `IDAT` and must cover the canvas, unless
/// `hidden` is given, in which case `hidden` becomes the default image and every
/// frame goes into `fdAT` chunks.
pub fn write_apng(
    width: u32, height: u32, plays: u32, hidden: Option<&[u8]>, frames: &[FrameSpec]
) -> Vec<u8> {
    let mut out = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    let mut sequence = 0;

    let mut ihdr = width.to_be_bytes().to_vec();
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    chunk(&mut out, b"IHDR", &ihdr);

    let mut actl = (frames.len() as u32).to_be_bytes().to_vec();
    actl.extend_from_slice(&plays.to_be_bytes());
    chunk(&mut out, b"acTL", &actl);

    let mut rest = frames;

    match hidden {
        Some(pixels) => chunk(&mut out, b"IDAT", &compress(pixels, width)),
        None => {
            let first = &frames[0];
            fctl(&mut out, &mut sequence, first);
            chunk(&mut out, b"IDAT", &compress(&first.pixels, first.width));
            rest = &frames[1..];
        }
    }
    for frame in rest {
        fctl(&mut out, &mut sequence, frame);

        let mut fdat = sequence.to_be_bytes().to_vec();
        sequence += 1;
        fdat.extend_from_slice(&compress(&frame.pixels, frame.width));
        chunk(&mut out, b"fdAT", &fdat);
    }
    chunk(&mut out, b"IEND", &[]);
    out
}

/// Read the RGBA pixel at `(x,y)` of a `width` wide buffer
pub fn pixel(pixels: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let start = (y * width + x) * 4;
    let mut px = [0; 4];
    px.copy_from_slice(&pixels[start..start + 4]);
    px
}
