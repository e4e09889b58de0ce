/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode animated images into fully composited frames
//!
//! Animated formats store frames as rectangles drawn over what
//! came before, each with its own rules on how to blend onto the canvas and
//! how to clean up afterwards. This crate replays those rules and hands out
//! every frame as a complete image together with its display time.
//!
//! # Example
//! ```no_run
//! use animframes::decode_apng;
//! use animframes::animframes_core::options::DecoderOptions;
//!
//! let data = std::fs::read("animation.png").unwrap();
//! let sequence = decode_apng(&data, DecoderOptions::default().set_max_frames(10)).unwrap();
//!
//! println!("{} frames, {} s", sequence.frame_count(), sequence.total_duration());
//! ```
//!
//! # Features
//! - `png`: Animated png frame source, on by default
//! - `apng`: Decode every animation frame of pngs, without it only the default
//!   image is decoded. On by default
//! - `serde-support`: Serialization of animation information
//!
//! Other formats can be decoded by implementing
//! [`FrameSource`](animframes_core::frame::FrameSource) and calling [`decode_frames`].
pub use animframes_core;
#[cfg(feature = "png")]
pub use decoder::{decode_apng, probe_apng};
pub use decoder::decode_frames;
pub use errors::{AnimationErrors, ErrorKind};
pub use sequence::{Frame, FrameImage, FrameSequence, MAX_FRAMES};

pub mod blend;
pub mod compositor;
pub mod decoder;
pub mod elision;
pub mod errors;
pub mod persist;
pub mod sequence;
