//! The display surface the processed frames are painted onto.

use image::{Rgb, RgbImage};

/// An owned RGB render target.
///
/// The surface is exclusively owned by one component instance; presentation
/// to an actual window or file is the shell's concern.
pub struct Surface {
    image: RgbImage,
    generation: u64,
}

impl Surface {
    /// Create a black surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            generation: 0,
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of times the surface has been redrawn.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resize the render target, discarding current contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.width() != width || self.image.height() != height {
            self.image = RgbImage::new(width, height);
        }
    }

    /// Fill the surface with black.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    /// Clear the surface and draw `image` horizontally flipped.
    ///
    /// The flip makes the displayed output match the mirrored live preview
    /// the user expects, even though the transmitted frame was unmirrored.
    pub fn present_mirrored(&mut self, image: &RgbImage) {
        self.resize(image.width(), image.height());
        self.clear();

        let width = image.width();
        for (x, y, pixel) in image.enumerate_pixels() {
            self.image.put_pixel(width - 1 - x, y, *pixel);
        }

        self.generation += 1;
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Borrow the current contents.
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}
