use crate::{
    color::Rgb,
    error::{SamplerError, SamplerResult},
};

/// Row-major RGB8 raster buffer, 3 bytes per pixel. Created per sample and
/// mutated in place by the scene composer and the post-processing passes;
/// only the optional blur stage promotes it to an alpha-carrying buffer.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&color.0);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self.index(x, y);
        Rgb([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&color.0);
    }

    /// Blend `color` over the pixel with the given coverage in `[0, 1]`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgb, coverage: f32) {
        let cov = coverage.clamp(0.0, 1.0);
        if cov <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        for (c, &src) in self.data[i..i + 3].iter_mut().zip(color.0.iter()) {
            let dst = f32::from(*c);
            *c = (dst + (f32::from(src) - dst) * cov).round() as u8;
        }
    }

    /// Expand to RGBA8 with opaque alpha. Fully opaque pixels are their own
    /// premultiplied form, so the result feeds the blur pass directly.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 3 * 4);
        for px in self.data.chunks_exact(3) {
            out.extend_from_slice(px);
            out.push(255);
        }
        out
    }

    pub fn into_rgb_image(self) -> SamplerResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| SamplerError::render("canvas buffer does not match its dimensions"))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.width as usize + x as usize) * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel() {
        let mut canvas = Canvas::new(4, 3);
        canvas.fill(Rgb([1, 2, 3]));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Rgb([1, 2, 3]));
            }
        }
    }

    #[test]
    fn blend_full_coverage_replaces_pixel() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Rgb([0, 0, 0]));
        canvas.blend_pixel(1, 1, Rgb([200, 100, 50]), 1.0);
        assert_eq!(canvas.pixel(1, 1), Rgb([200, 100, 50]));
        assert_eq!(canvas.pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn blend_half_coverage_mixes() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill(Rgb([0, 0, 0]));
        canvas.blend_pixel(0, 0, Rgb([200, 100, 50]), 0.5);
        assert_eq!(canvas.pixel(0, 0), Rgb([100, 50, 25]));
    }

    #[test]
    fn rgba_expansion_is_opaque() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set_pixel(0, 0, Rgb([9, 8, 7]));
        let rgba = canvas.to_rgba8();
        assert_eq!(rgba, vec![9, 8, 7, 255, 0, 0, 0, 255]);
    }
}
