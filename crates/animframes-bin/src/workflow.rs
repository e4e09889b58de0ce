/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;
use std::path::Path;

use animframes::persist::{SequenceDecoder, SequenceEncoder};
use animframes::{decode_apng, probe_apng};
use animframes_core::options::DecoderOptions;
use clap::ArgMatches;
use log::{info, warn};

use crate::cmd_parsers::global_options::{parse_decoder_options, parse_encoder_options};
use crate::errors::CmdErrors;
use crate::serde::{ProbeReport, SequenceReport};

pub fn run_subcommand(options: &ArgMatches) -> Result<(), CmdErrors> {
    match options.subcommand() {
        Some(("probe", args)) => probe_files(args),
        Some(("decode", args)) => decode_file(args),
        Some(("dump", args)) => dump_file(args),
        _ => Err(CmdErrors::Generic("No subcommand given"))
    }
}

fn first_raw<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a std::ffi::OsStr> {
    args.get_raw(id).and_then(|mut x| x.next())
}

/// Print animation information of every input file
fn probe_files(args: &ArgMatches) -> Result<(), CmdErrors> {
    // set to high to remove restrictions.
    // We'll just be reading headers so it doesn't matter
    let options = DecoderOptions::new_cmd()
        .set_max_height(usize::MAX)
        .set_max_width(usize::MAX);

    for in_file in args.get_raw("in").into_iter().flatten() {
        if !Path::new(in_file).exists() {
            warn!("File {:?} does not exist, skipping", in_file);
            continue;
        }
        let data = std::fs::read(in_file)?;

        match probe_apng(&data, options) {
            Ok(info) => {
                let report = ProbeReport::new(in_file.to_os_string(), data.len() as u64, info);
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(err) => warn!("Could not probe {:?}: {:?}", in_file, err)
        }
    }
    Ok(())
}

fn decode_file(args: &ArgMatches) -> Result<(), CmdErrors> {
    let in_file = first_raw(args, "in").ok_or("Missing input file")?;
    let out_file = first_raw(args, "out").ok_or("Missing output file")?;

    let decoder_options = parse_decoder_options(args);
    let encoder_options = parse_encoder_options(args);

    let data = std::fs::read(in_file)?;
    let sequence = decode_apng(&data, decoder_options)?;

    info!(
        "Decoded {} frames lasting {} s",
        sequence.frame_count(),
        sequence.total_duration()
    );
    let bytes = SequenceEncoder::new(&sequence, encoder_options).encode()?;
    std::fs::write(out_file, &bytes)?;

    info!("Wrote {} bytes to {:?}", bytes.len(), out_file);

    Ok(())
}

fn dump_file(args: &ArgMatches) -> Result<(), CmdErrors> {
    let in_file = first_raw(args, "in").ok_or("Missing input file")?;
    let data = std::fs::read(in_file)?;

    let mut decoder = SequenceDecoder::new(&data, DecoderOptions::new_cmd());
    let header = decoder.decode_headers()?;
    let sequence = decoder.decode()?;

    let report = SequenceReport::new(OsString::from(in_file), header, &sequence);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
