/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all animframes libraries
//!
//! This crate provides a set of core routines shared
//! by the frame sources and the compositor under the `animframes` umbrella
//!
//! It currently contains
//!
//! - A bytestream reader and writer with endian aware reads and writes
//! - Colorspace information shared by frames
//! - Decoder and encoder options
//! - The raw sub-frame model and the [`FrameSource`](frame::FrameSource) trait
//!   implemented by every animated format adapter
//!
//! # Features
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
pub mod bytestream;
pub mod colorspace;
pub mod frame;
pub mod options;
pub mod serde;
