// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper-left corner, and a rectangle on the complex plane
//! described by a Viewport.  Row 0 of the integral plane is the top
//! of the image, and so maps to the *largest* imaginary value.
use crate::errors::RenderError;
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a point in a region: column first, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane that gets stretched over the
/// whole image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real value of the left edge.
    pub re_min: f64,
    /// Real value of the right edge.
    pub re_max: f64,
    /// Imaginary value of the bottom edge.
    pub im_min: f64,
    /// Imaginary value of the top edge.
    pub im_max: f64,
}

/// The classic framing of the whole set.
pub const MANDELBROT: Viewport = Viewport {
    re_min: -2.1,
    re_max: 1.0,
    im_min: -1.3,
    im_max: 1.3,
};

impl Viewport {
    /// Constructor.  The maximums must lie strictly beyond the
    /// minimums on both axes.
    pub fn new(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Result<Viewport, RenderError> {
        if !(re_max > re_min) {
            return Err(RenderError::InvalidViewport(
                "The left edge is not to the left of the right edge.".to_string(),
            ));
        }

        if !(im_max > im_min) {
            return Err(RenderError::InvalidViewport(
                "The bottom edge is not lower than the top edge.".to_string(),
            ));
        }

        Ok(Viewport {
            re_min,
            re_max,
            im_min,
            im_max,
        })
    }

    /// Same as `new`, but from the left-lower and right-upper corners,
    /// treating the real part of each as x and the imaginary part as y.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<Viewport, RenderError> {
        Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// Upper-left corner; the point pixel 0,0 lands on.
    pub fn upper_left(&self) -> Complex<f64> {
        Complex::new(self.re_min, self.im_max)
    }

    /// Lower-right corner; the point the last pixel lands on.
    pub fn lower_right(&self) -> Complex<f64> {
        Complex::new(self.re_max, self.im_min)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        MANDELBROT
    }
}

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps pixels from one to the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The width and height of the integral plane.
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane being drawn.
    pub viewport: Viewport,
    // The distance on the complex plane between two neighbouring
    // pixels, along the real and imaginary axes respectively.
    grid_factors: (f64, f64),
}

// The first and last pixel of an axis land exactly on the viewport's
// edges, so a plane n pixels wide has n - 1 steps.  A one-pixel axis
// has no steps at all and sits on the starting edge.
fn grid_factor(span: f64, pixels: usize) -> f64 {
    if pixels > 1 {
        span / ((pixels - 1) as f64)
    } else {
        0.0
    }
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the
    /// viewport it should be stretched over.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> PlaneMapper {
        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
            grid_factors: (
                grid_factor(viewport.re_max - viewport.re_min, width),
                grid_factor(viewport.im_max - viewport.im_min, height),
            ),
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// point it covers on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.viewport.re_min + (pixel.0 as f64) * self.grid_factors.0,
            self.viewport.im_max - (pixel.1 as f64) * self.grid_factors.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fails_on_bad_shape() {
        let vp = Viewport::from_corners(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(vp.is_err());
        let vp = Viewport::new(1.0, -1.0, -1.0, 1.0);
        assert!(vp.is_err());
    }

    #[test]
    fn viewport_fails_on_flat_shape() {
        assert!(Viewport::new(0.0, 0.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 0.5, 0.5).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        let vp = Viewport::from_corners(Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(vp.is_ok());
    }

    #[test]
    fn default_viewport_frames_the_whole_set() {
        let vp = Viewport::default();
        assert_eq!(vp.upper_left(), Complex::new(-2.1, 1.3));
        assert_eq!(vp.lower_right(), Complex::new(1.0, -1.3));
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let vp = Viewport::new(0.0, 4.0, 0.0, 4.0).unwrap();
        let pm = PlaneMapper::new(5, 5, vp);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 4.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.0, 0.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let vp = Viewport::new(-2.0, 2.0, -2.0, 2.0).unwrap();
        let pm = PlaneMapper::new(5, 5, vp);
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 0)), Complex::new(2.0, 2.0));
    }

    #[test]
    fn corners_land_on_the_viewport_edges() {
        let pm = PlaneMapper::new(640, 480, MANDELBROT);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), MANDELBROT.upper_left());
        let last = pm.pixel_to_point(&Pixel(639, 479));
        assert!((last.re - MANDELBROT.re_max).abs() < 1e-12);
        assert!((last.im - MANDELBROT.im_min).abs() < 1e-12);
    }

    #[test]
    fn single_pixel_axes_sit_on_the_starting_edge() {
        let pm = PlaneMapper::new(1, 1, MANDELBROT);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), MANDELBROT.upper_left());
    }

    #[test]
    fn plane_size() {
        let pm = PlaneMapper::new(7, 3, MANDELBROT);
        assert_eq!(pm.len(), 21);
        assert!(!pm.is_empty());
        assert!(PlaneMapper::new(0, 3, MANDELBROT).is_empty());
    }
}
