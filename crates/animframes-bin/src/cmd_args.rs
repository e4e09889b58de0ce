/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

#[rustfmt::skip]
fn probe() -> Command {
    Command::new("probe")
        .about("Print animation information of png files as json")
        .arg(Arg::new("in")
            .help("Files to probe")
            .action(ArgAction::Append)
            .required(true))
}

#[rustfmt::skip]
fn decode() -> Command {
    Command::new("decode")
        .about("Decode an animated png into a frame sequence file")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input png to decode")
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Where to write the frame sequence")
            .required(true))
        .arg(Arg::new("max-frames")
            .long("max-frames")
            .help_heading("DECODING")
            .help("Stop after this many frames, 0 decodes every frame")
            .value_parser(value_parser!(usize))
            .default_value("0"))
        .arg(Arg::new("no-animation")
            .long("no-animation")
            .help_heading("DECODING")
            .action(ArgAction::SetTrue)
            .help("Decode only the default image"))
        .arg(Arg::new("strict")
            .long("strict")
            .help_heading("DECODING")
            .action(ArgAction::SetTrue)
            .help("Treat recoverable stream errors as fatal")
            .long_help("Confirm checksums and error out on out of order animation chunks instead of warning"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of an animation")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of an animation")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("no-compress")
            .long("no-compress")
            .help_heading("OUTPUT")
            .action(ArgAction::SetTrue)
            .help("Store frame pixels uncompressed"))
        .arg(Arg::new("level")
            .long("level")
            .help_heading("OUTPUT")
            .help("Compression level, 0 to 9")
            .value_parser(value_parser!(u8).range(0..=9))
            .default_value("6"))
}

#[rustfmt::skip]
fn dump() -> Command {
    Command::new("dump")
        .about("Print the header and frame delays of a frame sequence file as json")
        .arg(Arg::new("in")
            .help("Frame sequence file")
            .required(true))
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("animframes")
        .about("Decode animated pngs into composited frames")
        .subcommand_required(true)
        .subcommand(probe())
        .subcommand(decode())
        .subcommand(dump())
        .arg(Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}
