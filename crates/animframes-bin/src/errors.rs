/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Formatter};

use animframes::AnimationErrors;

/// Errors that stop a command
pub enum CmdErrors {
    Io(std::io::Error),
    Animation(AnimationErrors),
    Json(serde_json::Error),
    Generic(&'static str)
}

impl Debug for CmdErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => writeln!(f, "I/O error: {err}"),
            Self::Animation(err) => writeln!(f, "{err:?} ({:?})", err.kind()),
            Self::Json(err) => writeln!(f, "Json error: {err}"),
            Self::Generic(err) => writeln!(f, "{err}")
        }
    }
}

impl From<std::io::Error> for CmdErrors {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<AnimationErrors> for CmdErrors {
    fn from(value: AnimationErrors) -> Self {
        Self::Animation(value)
    }
}

impl From<serde_json::Error> for CmdErrors {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<&'static str> for CmdErrors {
    fn from(value: &'static str) -> Self {
        Self::Generic(value)
    }
}
