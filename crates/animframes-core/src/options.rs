/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder and encoder options
//!
//! This module exposes a struct for which all implemented
//! frame sources get shared options for decoding, and a struct
//! configuring how composited sequences are persisted
//!
//! All supported options are put into one `DecoderOptions` to allow for global configurations
//! options i.e the same  `DecoderOption` can be reused for all other frame sources
pub use decoder::DecoderOptions;
pub use encoder::EncoderOptions;

mod decoder;
mod encoder;
