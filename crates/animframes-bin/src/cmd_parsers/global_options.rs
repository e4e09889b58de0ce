/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use animframes_core::options::{DecoderOptions, EncoderOptions};
use clap::ArgMatches;
use log::{info, Level};

/// Build decoder options from the `decode` subcommand arguments
pub fn parse_decoder_options(options: &ArgMatches) -> DecoderOptions {
    let max_frames = options.get_one::<usize>("max-frames").copied().unwrap_or(0);
    let max_width = options.get_one::<usize>("max-width").copied().unwrap_or(16384);
    let max_height = options.get_one::<usize>("max-height").copied().unwrap_or(16384);

    let strict = options.get_flag("strict");

    // strict mode turns checksum verification back on
    let decoder_options = if strict {
        info!("Strict mode enabled");
        DecoderOptions::new_safe().set_strict_mode(true)
    } else {
        DecoderOptions::new_cmd()
    };

    if options.get_flag("no-animation") {
        info!("Decoding only the default image");
    }

    decoder_options
        .set_max_frames(max_frames)
        .set_max_width(max_width)
        .set_max_height(max_height)
        .set_decode_animated(!options.get_flag("no-animation"))
}

/// Build options for writing frame sequences
pub fn parse_encoder_options(options: &ArgMatches) -> EncoderOptions {
    let level = options.get_one::<u8>("level").copied().unwrap_or(6);

    EncoderOptions::default()
        .set_compress(!options.get_flag("no-compress"))
        .set_level(level)
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
