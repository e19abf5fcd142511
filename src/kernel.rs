// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.
//!
//! Every pixel maps to a point `c` on the complex plane.  Starting
//! with `z = c`, we repeatedly compute `z = z * z + c` and count how
//! many steps it takes for `z` to get at least 2.0 away from the
//! origin.  Points that never get there within the iteration limit
//! are considered to be inside the set and are painted black;
//! everything else gets a shade of red that cycles every 64 steps.
//!
//! Pixels are packed as `0x00RRGGBB`.

use itertools::iproduct;
use num::Complex;

use crate::planes::{PlaneMapper, Pixel, Viewport};

/// The number of iterations after which a point is assumed to be
/// inside the set.
pub const MAX_ITERATIONS: u32 = 1000;

/// Packed color for points inside the set.
pub const BLACK: u32 = 0;

/// The knobs a render task is handed.  Only the defaults are used by
/// the view, but tests and benchmarks like smaller planes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// The region of the complex plane to draw.
    pub viewport: Viewport,
    /// The iteration limit.
    pub max_iterations: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            viewport: Viewport::default(),
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// This is our classic iterator function, which either returns the
/// number of iterations it took to escape the Mandelbrot set, or it
/// returns nothing at all.  The seed is checked before the first step,
/// so a point already outside the radius escapes after zero steps.
pub fn escape_time(c: Complex<f64>, max_iterations: u32) -> Option<u32> {
    let mut z = c;
    for i in 0..max_iterations {
        if z.norm_sqr() >= 4.0 {
            return Some(i);
        }
        z = z * z + c;
    }
    None
}

/// Map an escape count to a packed pixel.
#[inline]
pub fn color(escape: Option<u32>) -> u32 {
    match escape {
        None => BLACK,
        Some(iter) => pack_rgb(((iter % 64) * 4) as u8, 0, 0),
    }
}

/// Pack three channels as `0x00RRGGBB`.
#[inline]
pub fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue)
}

/// Split a packed pixel back into its channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// The color of a single pixel of a `width` by `height` image.
pub fn compute(
    px: usize,
    py: usize,
    width: usize,
    height: usize,
    viewport: &Viewport,
    max_iterations: u32,
) -> u32 {
    let plane = PlaneMapper::new(width, height, *viewport);
    color(escape_time(plane.pixel_to_point(&Pixel(px, py)), max_iterations))
}

/// Fill a whole buffer, rows outer and columns inner, so that the
/// buffer is written front to back.
pub fn render(plane: &PlaneMapper, pixels: &mut [u32], max_iterations: u32) {
    assert!(pixels.len() == plane.len());
    let rows = 0..plane.integral_plane.1;
    let columns = 0..plane.integral_plane.0;
    for ((row, column), pixel) in iproduct!(rows, columns).zip(pixels.iter_mut()) {
        let point = plane.pixel_to_point(&Pixel(column, row));
        *pixel = color(escape_time(point, max_iterations));
    }
}
