//! Flat 2-D rasterizer used by the reference domains.
//!
//! Frames follow the usual control-suite look: a blue sky backdrop, a grey
//! checker floor, and warm-coloured bodies. The sky is the only region where
//! blue dominates both other channels.

use image::{Rgb, RgbImage};

use crate::{Result, SuiteError};

const SKY_TOP: [f32; 3] = [36.0, 72.0, 140.0];
const SKY_BOTTOM: [f32; 3] = [92.0, 136.0, 196.0];
const FLOOR_LIGHT: Rgb<u8> = Rgb([112, 108, 96]);
const FLOOR_DARK: Rgb<u8> = Rgb([78, 75, 66]);
/// Checker tile size in metres.
const TILE: f32 = 0.25;

/// Orthographic view of the scene.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub center_x: f32,
    pub center_y: f32,
    /// Visible world height in metres.
    pub extent: f32,
}

/// Paintable frame with world-to-pixel mapping.
pub struct Canvas {
    image: RgbImage,
    view: View,
    scale: f32,
}

impl Canvas {
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidRenderSize`] if either side is zero.
    pub fn new(height: u32, width: u32, view: View) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(SuiteError::InvalidRenderSize { height, width });
        }
        Ok(Self {
            image: RgbImage::new(width, height),
            view,
            scale: height as f32 / view.extent,
        })
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// World coordinates of a pixel centre.
    fn to_world(&self, px: u32, py: u32) -> (f32, f32) {
        let (w, h) = self.image.dimensions();
        let x = (px as f32 + 0.5 - w as f32 / 2.0) / self.scale + self.view.center_x;
        let y = (h as f32 / 2.0 - (py as f32 + 0.5)) / self.scale + self.view.center_y;
        (x, y)
    }

    /// Paint every pixel for which `inside` holds.
    fn paint(&mut self, color: Rgb<u8>, inside: impl Fn(f32, f32) -> bool) {
        let (w, h) = self.image.dimensions();
        for py in 0..h {
            for px in 0..w {
                let (x, y) = self.to_world(px, py);
                if inside(x, y) {
                    self.image.put_pixel(px, py, color);
                }
            }
        }
    }

    /// Sky gradient over the whole frame.
    pub fn sky(&mut self) {
        let h = self.image.height().max(2) - 1;
        for (_, py, pixel) in self.image.enumerate_pixels_mut() {
            let t = py as f32 / h as f32;
            let mut c = [0u8; 3];
            for (i, channel) in c.iter_mut().enumerate() {
                *channel = (SKY_TOP[i] + (SKY_BOTTOM[i] - SKY_TOP[i]) * t).round() as u8;
            }
            *pixel = Rgb(c);
        }
    }

    /// Side-view floor: checker below `level`.
    pub fn floor_below(&mut self, level: f32) {
        let (w, h) = self.image.dimensions();
        for py in 0..h {
            for px in 0..w {
                let (x, y) = self.to_world(px, py);
                if y < level {
                    self.image.put_pixel(px, py, checker(x, y));
                }
            }
        }
    }

    /// Top-down floor: checker inside the axis-aligned square `|x|, |y| <= half`.
    pub fn floor_square(&mut self, half: f32) {
        let (w, h) = self.image.dimensions();
        for py in 0..h {
            for px in 0..w {
                let (x, y) = self.to_world(px, py);
                if x.abs() <= half && y.abs() <= half {
                    self.image.put_pixel(px, py, checker(x, y));
                }
            }
        }
    }

    pub fn rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
        let (lx, hx) = (x0.min(x1), x0.max(x1));
        let (ly, hy) = (y0.min(y1), y0.max(y1));
        self.paint(color, |x, y| x >= lx && x <= hx && y >= ly && y <= hy);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>) {
        let r2 = radius * radius;
        self.paint(color, |x, y| (x - cx).powi(2) + (y - cy).powi(2) <= r2);
    }

    /// Capsule between two points.
    pub fn segment(&mut self, a: (f32, f32), b: (f32, f32), radius: f32, color: Rgb<u8>) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = (dx * dx + dy * dy).max(f32::EPSILON);
        let r2 = radius * radius;
        self.paint(color, |x, y| {
            let t = (((x - a.0) * dx + (y - a.1) * dy) / len2).clamp(0.0, 1.0);
            let (qx, qy) = (a.0 + t * dx, a.1 + t * dy);
            (x - qx).powi(2) + (y - qy).powi(2) <= r2
        });
    }
}

fn checker(x: f32, y: f32) -> Rgb<u8> {
    let parity = ((x / TILE).floor() as i64 + (y / TILE).floor() as i64).rem_euclid(2);
    if parity == 0 {
        FLOOR_LIGHT
    } else {
        FLOOR_DARK
    }
}

/// Blend from `dim` to `bright` by `t` in `[0, 1]`.
#[must_use]
pub fn shade(dim: Rgb<u8>, bright: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0) as f32;
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let (a, b) = (f32::from(dim.0[i]), f32::from(bright.0[i]));
        *channel = (a + (b - a) * t).round() as u8;
    }
    Rgb(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sky(p: &Rgb<u8>) -> bool {
        p.0[2] > p.0[1] && p.0[2] > p.0[0]
    }

    #[test]
    fn sky_is_blue_dominant_and_floor_is_not() {
        let view = View { center_x: 0.0, center_y: 0.0, extent: 2.0 };
        let mut canvas = Canvas::new(32, 32, view).unwrap();
        canvas.sky();
        canvas.floor_below(0.0);
        let img = canvas.into_image();
        assert!(is_sky(img.get_pixel(16, 2)));
        assert!(!is_sky(img.get_pixel(16, 30)));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let view = View { center_x: 0.0, center_y: 0.0, extent: 1.0 };
        assert!(Canvas::new(0, 10, view).is_err());
    }

    #[test]
    fn shade_interpolates_endpoints() {
        let a = Rgb([0, 0, 0]);
        let b = Rgb([200, 100, 50]);
        assert_eq!(shade(a, b, 0.0), a);
        assert_eq!(shade(a, b, 1.0), b);
        assert_eq!(shade(a, b, 0.5), Rgb([100, 50, 25]));
    }
}
