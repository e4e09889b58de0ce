/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Alpha compositing of a source row over a destination row
//!
//! Integer only, with the same rounding (truncation) on every platform.

/// Composite one `src` pixel over `dest`
///
/// `alpha` is the index of the alpha channel within the pixel,
/// every other channel is treated as a color channel, so the result does
/// not depend on channel order.
#[inline]
pub fn blend_over_pixel(src: &[u8], dest: &mut [u8], alpha: usize) {
    let src_alpha = src[alpha];

    if src_alpha == 255 {
        dest.copy_from_slice(src);
        return;
    }
    if src_alpha == 0 {
        return;
    }
    let dest_alpha = dest[alpha];

    if dest_alpha == 0 {
        dest.copy_from_slice(src);
        return;
    }
    let u = u32::from(src_alpha) * 255;
    let v = (255 - u32::from(src_alpha)) * u32::from(dest_alpha);
    // at least 255 since src_alpha is non zero
    let a1 = u + v;

    for (index, (d, s)) in dest.iter_mut().zip(src).enumerate() {
        if index == alpha {
            continue;
        }
        *d = ((u32::from(*s) * u + u32::from(*d) * v) / a1) as u8;
    }
    dest[alpha] = (a1 / 255) as u8;
}

/// Composite a row of pixels over another
///
/// Both rows must hold the same number of `components` wide pixels
pub fn blend_over_row(src: &[u8], dest: &mut [u8], components: usize, alpha: usize) {
    for (s, d) in src
        .chunks_exact(components)
        .zip(dest.chunks_exact_mut(components))
    {
        blend_over_pixel(s, d, alpha);
    }
}
