//! Scene composition for one sample: background fill (solid or gradient),
//! then the phrase outline filled and stroked under a randomized affine.
//!
//! Draw order matters. Per sample this module consumes, in sequence: the
//! scheme branch draw, the scheme's own draws, the gradient selector and its
//! parameters (colorful branch only), the stroke color and width draws, and
//! finally rotation, translation jitter and per-axis scale.

use kurbo::{Affine, Point, Stroke, StrokeOpts};

use crate::{
    canvas::Canvas,
    color::{ColorScheme, Rgb},
    error::SamplerResult,
    font::FontCatalog,
    geometry::GeometryPlan,
    raster,
    rng::SampleRng,
};

const STROKE_TOLERANCE: f64 = 0.1;

pub fn compose(
    canvas: &mut Canvas,
    rng: &mut SampleRng,
    catalog: &FontCatalog,
    plan: &GeometryPlan,
    phrase: &str,
    angle_dev: f64,
    color_dev: i32,
) -> SamplerResult<()> {
    let scheme = paint_background(canvas, rng, color_dev);

    let stroke_color = if rng.next_f64() > 0.5 {
        scheme.border
    } else {
        scheme.foreground
    };
    let stroke_width = rng.next_f64();

    let transform = random_transform(rng, canvas.width(), canvas.height(), angle_dev);

    let origin = Point::new(
        f64::from(plan.border),
        f64::from(plan.height - plan.border),
    );
    let mut path = catalog
        .face(plan.font_index)
        .outline(phrase, plan.point_size, origin)?;
    path.apply_affine(transform);

    raster::fill_path(canvas, &path, scheme.foreground);

    // Width 0 means a hairline, matching the original pen semantics.
    let width = if stroke_width == 0.0 { 1.0 } else { stroke_width };
    let stroked = kurbo::stroke(
        path.elements().iter().copied(),
        &Stroke::new(width),
        &StrokeOpts::default(),
        STROKE_TOLERANCE,
    );
    raster::fill_path(canvas, &stroked, stroke_color);

    Ok(())
}

/// Fill the canvas with the sample's background. The near-grayscale branch
/// (~67%) is always a solid fill; the colorful branch overlays one of three
/// gradient styles for selector values 0..=2 and keeps the solid fill for
/// 3..=5.
fn paint_background(canvas: &mut Canvas, rng: &mut SampleRng, color_dev: i32) -> ColorScheme {
    if rng.next_f64() > 0.33 {
        let scheme = ColorScheme::near_grayscale(rng, false);
        canvas.fill(scheme.background);
        return scheme;
    }

    let scheme = ColorScheme::colorful(rng, color_dev, false);
    canvas.fill(scheme.background);

    let w = canvas.width();
    let h = canvas.height();
    let wf = f64::from(w);
    let hf = f64::from(h);
    match rng.next_u32() % 6 {
        0 => {
            // Vertical: endpoints extended above/below by the canvas width.
            let x0 = f64::from(rng.next_u32() % w);
            let x1 = f64::from(rng.next_u32() % w);
            let (c0, c1) = ordered_stops(rng, &scheme);
            fill_linear(
                canvas,
                Point::new(x0, -wf),
                Point::new(x1, hf + wf),
                c0,
                c1,
            );
        }
        1 => {
            // Horizontal: endpoints extended left/right by twice the width.
            let y0 = f64::from(rng.next_u32() % h);
            let y1 = f64::from(rng.next_u32() % h);
            let (c0, c1) = ordered_stops(rng, &scheme);
            fill_linear(
                canvas,
                Point::new(-wf, y0),
                Point::new(wf + wf, y1),
                c0,
                c1,
            );
        }
        2 => {
            let cx = f64::from(rng.next_u32() % w);
            let cy = f64::from(rng.next_u32() % h);
            let radius = f64::from(rng.next_u32() % 3) * wf;
            fill_radial(
                canvas,
                Point::new(cx, cy),
                radius,
                scheme.background,
                scheme.foreground,
            );
        }
        _ => {}
    }
    scheme
}

fn ordered_stops(rng: &mut SampleRng, scheme: &ColorScheme) -> (Rgb, Rgb) {
    if rng.next_f64() > 0.5 {
        (scheme.foreground, scheme.background)
    } else {
        (scheme.background, scheme.foreground)
    }
}

/// Rotation about the canvas center, then translation jitter, then per-axis
/// scale, composed exactly in that order.
fn random_transform(rng: &mut SampleRng, width: u32, height: u32, angle_dev: f64) -> Affine {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;

    let angle_deg = (2.0 * rng.next_f64() - 1.0) * angle_dev;
    let jitter_x = f64::from(width) * 0.05 * rng.next_f64();
    let jitter_y = f64::from(height) * 0.1 * (0.5 - rng.next_f64());
    let scale_x = 1.0 + 0.05 * rng.next_f64();
    let scale_y = 1.0 + 0.05 * rng.next_f64();

    Affine::translate((cx, cy))
        * Affine::rotate(angle_deg.to_radians())
        * Affine::translate((-cx, -cy))
        * Affine::translate((jitter_x, jitter_y))
        * Affine::scale_non_uniform(scale_x, scale_y)
}

/// Linear gradient with pad spread, evaluated per pixel center.
fn fill_linear(canvas: &mut Canvas, p0: Point, p1: Point, c0: Rgb, c1: Rgb) {
    let axis = p1 - p0;
    let denom = axis.hypot2();
    if denom == 0.0 {
        canvas.fill(c1);
        return;
    }
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = ((p - p0).dot(axis) / denom).clamp(0.0, 1.0);
            canvas.set_pixel(x, y, lerp_rgb(c0, c1, t));
        }
    }
}

/// Radial gradient with pad spread; a degenerate radius paints the edge
/// color everywhere.
fn fill_radial(canvas: &mut Canvas, center: Point, radius: f64, c0: Rgb, c1: Rgb) {
    if radius <= 0.0 {
        canvas.fill(c1);
        return;
    }
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = ((p - center).hypot() / radius).clamp(0.0, 1.0);
            canvas.set_pixel(x, y, lerp_rgb(c0, c1, t));
        }
    }
}

fn lerp_rgb(c0: Rgb, c1: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgb([
        mix(c0.0[0], c1.0[0]),
        mix(c0.0[1], c1.0[1]),
        mix(c0.0[2], c1.0[2]),
    ])
}
