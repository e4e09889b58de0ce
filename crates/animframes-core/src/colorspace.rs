/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image Colorspace information
//!
//! Frames handed to the compositor are always 8 bits per
//! component, so the colorspace alone determines the pixel stride.

/// All colorspaces a composited animation can be stored in
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColorSpace {
    /// Grayscale colorspace
    Luma,
    /// Grayscale with alpha colorspace
    LumaA,
    /// Red, Green , Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::RGB => 3,
            Self::RGBA => 4
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA)
    }

    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::LumaA | Self::Luma)
    }

    /// Returns the position of the alpha pixel in a pixel
    ///
    /// That is for an array of color components say `[0,1,2,3]` if the image has an alpha channel
    /// and is in RGBA format, this will return `Some(3)`, indicating alpha is found in the third index
    ///
    /// If an image doesn't have an alpha channel returns `None`
    pub const fn alpha_position(&self) -> Option<usize> {
        match self {
            ColorSpace::RGBA => Some(3),
            ColorSpace::LumaA => Some(1),
            _ => None
        }
    }

    /// Tag used when a colorspace is written to a byte stream
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::RGB => 3,
            Self::RGBA => 4
        }
    }

    /// Inverse of [`ColorSpace::to_u8`]
    pub const fn from_u8(value: u8) -> Option<ColorSpace> {
        match value {
            1 => Some(Self::Luma),
            2 => Some(Self::LumaA),
            3 => Some(Self::RGB),
            4 => Some(Self::RGBA),
            _ => None
        }
    }
}

/// Encapsulates all colorspaces supported by
/// the library
pub static ALL_COLORSPACES: [ColorSpace; 4] = [
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::RGB,
    ColorSpace::RGBA
];

#[cfg(test)]
mod tests {
    use crate::colorspace::{ColorSpace, ALL_COLORSPACES};

    #[test]
    fn test_alpha_position_within_stride() {
        for colorspace in ALL_COLORSPACES {
            if let Some(position) = colorspace.alpha_position() {
                assert!(colorspace.has_alpha());
                assert!(position < colorspace.num_components());
            } else {
                assert!(!colorspace.has_alpha());
            }
        }
    }

    #[test]
    fn test_tag_roundtrip() {
        for colorspace in ALL_COLORSPACES {
            assert_eq!(ColorSpace::from_u8(colorspace.to_u8()), Some(colorspace));
        }
        assert_eq!(ColorSpace::from_u8(0), None);
    }
}
