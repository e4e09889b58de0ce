/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;

use animframes::persist::SequenceHeader;
use animframes::FrameSequence;
use animframes_core::frame::AnimationInfo;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Probe output for a single file
pub struct ProbeReport {
    file: OsString,
    size: u64,
    info: AnimationInfo
}

impl ProbeReport {
    pub fn new(file: OsString, size: u64, info: AnimationInfo) -> ProbeReport {
        ProbeReport { file, size, info }
    }
}

impl Serialize for ProbeReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ProbeReport", 3)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("info", &self.info)?;

        state.end()
    }
}

/// Header and per frame delays of a frame sequence file
pub struct SequenceReport<'a> {
    file:     OsString,
    header:   SequenceHeader,
    sequence: &'a FrameSequence
}

impl<'a> SequenceReport<'a> {
    pub fn new(
        file: OsString, header: SequenceHeader, sequence: &'a FrameSequence
    ) -> SequenceReport<'a> {
        SequenceReport {
            file,
            header,
            sequence
        }
    }
}

impl<'a> Serialize for SequenceReport<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let delays: Vec<f32> = self.sequence.frames().iter().map(|x| x.delay()).collect();

        let mut state = serializer.serialize_struct("SequenceReport", 8)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("version", &self.header.version)?;
        state.serialize_field("width", &self.header.width)?;
        state.serialize_field("height", &self.header.height)?;
        state.serialize_field("frame_count", &self.sequence.frame_count())?;
        state.serialize_field("loop_count", &self.sequence.loop_count())?;
        state.serialize_field("total_duration", &self.sequence.total_duration())?;
        state.serialize_field("delays", &delays)?;

        state.end()
    }
}

#[cfg(test)]
mod tests {
    use animframes::animframes_core::colorspace::ColorSpace;
    use animframes::animframes_core::frame::AnimationInfo;

    use crate::serde::ProbeReport;

    #[test]
    fn test_probe_json_fields() {
        let info = AnimationInfo {
            width:              4,
            height:             2,
            colorspace:         ColorSpace::RGBA,
            is_animated:        true,
            frame_count:        3,
            loop_count:         0,
            first_frame_hidden: false
        };
        let report = ProbeReport::new("a.png".into(), 100, info);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["file"], "a.png");
        assert_eq!(json["info"]["colorspace"], "RGBA");
        assert_eq!(json["info"]["frame_count"], 3);
    }
}
