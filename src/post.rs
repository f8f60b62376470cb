//! Per-pixel post-processing passes applied, in order, after the scene is
//! composed: linear brightness rescale, uniform per-channel color
//! disturbance, then independent per-pixel additive noise. All three share
//! one clamp rule; both the rule and the pass order are part of the output
//! contract for a fixed seed.

use crate::{canvas::Canvas, rng::SampleRng};

/// Per-channel deviation for [`disturb_colors`] as the pipeline invokes it.
/// Fixed, and distinct from the CLI color deviation used by color schemes.
pub const DISTURB_MAX_DEV: i32 = 11;

/// Clamp rule shared by every pass: above 254 saturates to 255, below 1
/// floors to 0, anything else truncates to an integer.
pub fn clip_channel(value: f32) -> u8 {
    if value > 254.0 {
        255
    } else if value < 1.0 {
        0
    } else {
        value as u8
    }
}

/// `new = old * alpha + beta` on every channel. The pipeline always passes
/// `beta = 0`; the offset stays plumbed for parity with the original tool.
pub fn linear_scale(canvas: &mut Canvas, alpha: f32, beta: f32) {
    for c in canvas.data_mut() {
        *c = clip_channel(f32::from(*c) * alpha + beta);
    }
}

/// One signed offset per channel, drawn once (R, G, B order) and applied
/// uniformly to the whole image.
pub fn disturb_colors(canvas: &mut Canvas, rng: &mut SampleRng, max_dev: i32) {
    let dev = f64::from(2 * max_dev);
    let r = (dev * (0.5 - rng.next_f64())) as f32;
    let g = (dev * (0.5 - rng.next_f64())) as f32;
    let b = (dev * (0.5 - rng.next_f64())) as f32;
    for px in canvas.data_mut().chunks_exact_mut(3) {
        px[0] = clip_channel(f32::from(px[0]) + r);
        px[1] = clip_channel(f32::from(px[1]) + g);
        px[2] = clip_channel(f32::from(px[2]) + b);
    }
}

/// Independent signed offset in `±max_dev` per pixel and channel, consuming
/// one draw each in R, G, B order.
pub fn add_random_noise(canvas: &mut Canvas, rng: &mut SampleRng, max_dev: i32) {
    let dev = f64::from(max_dev);
    for c in canvas.data_mut() {
        let offset = (2.0 * (0.5 - rng.next_f64()) * dev) as f32;
        *c = clip_channel(f32::from(*c) + offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn clip_matches_reference_rule() {
        assert_eq!(clip_channel(254.0), 254);
        assert_eq!(clip_channel(254.1), 255);
        assert_eq!(clip_channel(255.0), 255);
        assert_eq!(clip_channel(1.0), 1);
        assert_eq!(clip_channel(0.99), 0);
        assert_eq!(clip_channel(-3.0), 0);
        // Truncation, not rounding.
        assert_eq!(clip_channel(100.9), 100);
    }

    #[test]
    fn identity_scale_is_noop() {
        let mut canvas = Canvas::new(3, 2);
        canvas.fill(Rgb([120, 60, 200]));
        let before = canvas.data().to_vec();
        linear_scale(&mut canvas, 1.0, 0.0);
        assert_eq!(canvas.data(), before.as_slice());
    }

    #[test]
    fn scale_darkens_and_brightens() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill(Rgb([100, 100, 100]));
        linear_scale(&mut canvas, 0.5, 0.0);
        assert_eq!(canvas.pixel(0, 0), Rgb([50, 50, 50]));
        linear_scale(&mut canvas, 10.0, 0.0);
        assert_eq!(canvas.pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn disturbance_is_uniform_across_pixels() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(Rgb([128, 128, 128]));
        let mut rng = SampleRng::new(5);
        disturb_colors(&mut canvas, &mut rng, 11);
        let first = canvas.pixel(0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), first);
            }
        }
        let diff = i32::from(first.r()) - 128;
        assert!(diff.abs() <= 11);
    }

    #[test]
    fn zero_noise_bound_is_noop() {
        let mut canvas = Canvas::new(3, 3);
        canvas.fill(Rgb([90, 10, 250]));
        let before = canvas.data().to_vec();
        let mut rng = SampleRng::new(8);
        add_random_noise(&mut canvas, &mut rng, 0);
        assert_eq!(canvas.data(), before.as_slice());
    }

    #[test]
    fn noise_stays_within_bound() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill(Rgb([128, 128, 128]));
        let mut rng = SampleRng::new(13);
        add_random_noise(&mut canvas, &mut rng, 13);
        for c in canvas.data() {
            let diff = i32::from(*c) - 128;
            assert!(diff.abs() <= 13, "offset {diff} escaped the bound");
        }
    }
}
