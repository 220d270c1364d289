use crate::error::{InputError, Result};
use crate::texture::TexelRect;

/// Opacity query over a rectangular pixel region.
///
/// `y = 0` is the bottom row, matching texel rectangle coordinates.
pub trait AlphaMask {
    /// Width of the region in pixels.
    fn width(&self) -> usize;

    /// Height of the region in pixels.
    fn height(&self) -> usize;

    /// Returns `true` if the pixel at `(x, y)` counts as part of the sprite.
    ///
    /// Only called with `x < width()` and `y < height()`.
    fn opaque(&self, x: usize, y: usize) -> bool;
}

/// An 8-bit alpha channel thresholded into a binary mask.
#[derive(Debug, Clone)]
pub struct AlphaBitmap {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
    threshold: u8,
}

impl AlphaBitmap {
    /// Wraps a row-major alpha buffer, bottom row first.
    ///
    /// A pixel is opaque when its alpha is strictly greater than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::BitmapSize` if the buffer length does not match
    /// `width * height`.
    pub fn new(width: usize, height: usize, alpha: Vec<u8>, threshold: u8) -> Result<Self> {
        let expected = width * height;
        if alpha.len() != expected {
            return Err(InputError::BitmapSize {
                expected,
                actual: alpha.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            alpha,
            threshold,
        })
    }

    /// Builds a fully opaque/transparent mask from a predicate.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut alpha = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                alpha.push(if f(x, y) { u8::MAX } else { 0 });
            }
        }
        Self {
            width,
            height,
            alpha,
            threshold: 0,
        }
    }
}

impl AlphaMask for AlphaBitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn opaque(&self, x: usize, y: usize) -> bool {
        self.alpha[y * self.width + x] > self.threshold
    }
}

/// A view of a mask restricted to a sprite's texel rectangle.
///
/// The rectangle is rounded to whole pixels and clamped to the mask.
pub struct TexelCrop<'a, M: AlphaMask + ?Sized> {
    mask: &'a M,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
}

impl<'a, M: AlphaMask + ?Sized> TexelCrop<'a, M> {
    /// Crops `mask` to `rect`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(mask: &'a M, rect: &TexelRect) -> Self {
        let clamp = |v: f64, max: usize| -> usize { v.round().clamp(0.0, max as f64) as usize };
        let x0 = clamp(rect.x, mask.width());
        let y0 = clamp(rect.y, mask.height());
        let x1 = clamp(rect.x + rect.width, mask.width()).max(x0);
        let y1 = clamp(rect.y + rect.height, mask.height()).max(y0);
        Self {
            mask,
            x0,
            y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

impl<M: AlphaMask + ?Sized> AlphaMask for TexelCrop<'_, M> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn opaque(&self, x: usize, y: usize) -> bool {
        self.mask.opaque(self.x0 + x, self.y0 + y)
    }
}
