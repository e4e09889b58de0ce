/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An animated png frame source
//!
//! This features a PNG reader which supports decoding of valid
//! ISO/IEC 15948:2003 (E) images and the APNG extension on top of it.
//!
//! Every frame handed out is 8 bits per component: palette images are
//! expanded to RGB (or RGBA if a `tRNS` chunk is present), images below
//! 8 bits are scaled up and 16 bit images are scaled down.
//!
//! # Decoding the default image
//!
//!```no_run
//! use animframes_png::PngDecoder;
//! let mut decoder = PngDecoder::new(&[]);
//!
//! let pixels = decoder.decode_raw();
//! ```
//!
//! # Walking animation frames
//!
//! The decoder implements [`FrameSource`](animframes_core::frame::FrameSource),
//! yielding raw sub-frames that still need compositing onto a canvas.
//!
//!```no_run
//! use animframes_core::frame::FrameSource;
//! use animframes_png::PngDecoder;
//!
//! let mut decoder = PngDecoder::new(&[]);
//! let info = decoder.begin().unwrap();
//!
//! while let Some(frame) = decoder.next_sub_frame().unwrap() {
//!     println!("{}x{} for {} s", frame.width, frame.height, frame.delay());
//! }
//! ```
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
#![allow(clippy::op_ref, clippy::identity_op)]

pub use animframes_core;
pub use decoder::{ActlChunk, FctlChunk, PngDecoder, PngInfo};
pub use enums::{InterlaceMethod, PngColor};
pub use error::PngDecodeErrors;

mod apng;
mod crc;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
