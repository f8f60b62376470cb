//! Antialiased scanline fill for Bezier paths. Non-zero winding rule, 4x
//! vertical supersampling with exact horizontal span coverage, which is close
//! enough to the antialiased path renderer of the original toolkit.

use kurbo::{BezPath, PathEl, Point};

use crate::{canvas::Canvas, color::Rgb};

const FLATTEN_TOLERANCE: f64 = 0.1;
const SUBSAMPLES: usize = 4;

#[derive(Clone, Copy, Debug)]
struct Segment {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

/// Fill `path` (already in canvas coordinates) with `color`, blending by
/// coverage over whatever the canvas holds.
pub fn fill_path(canvas: &mut Canvas, path: &BezPath, color: Rgb) {
    let segments = flatten_to_segments(path);
    if segments.is_empty() {
        return;
    }

    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    let weight = 1.0 / SUBSAMPLES as f64;

    let mut coverage = vec![0f64; width];
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for y in 0..height {
        coverage.fill(0.0);
        let mut touched = false;

        for s in 0..SUBSAMPLES {
            let sample_y = y as f64 + (s as f64 + 0.5) * weight;
            crossings.clear();
            for seg in &segments {
                // Half-open [top, bottom) keeps shared vertices from
                // counting twice.
                let (top, bottom) = if seg.y0 <= seg.y1 {
                    (seg.y0, seg.y1)
                } else {
                    (seg.y1, seg.y0)
                };
                if sample_y < top || sample_y >= bottom {
                    continue;
                }
                let t = (sample_y - seg.y0) / (seg.y1 - seg.y0);
                let x = seg.x0 + t * (seg.x1 - seg.x0);
                let dir = if seg.y1 > seg.y0 { 1 } else { -1 };
                crossings.push((x, dir));
            }
            if crossings.is_empty() {
                continue;
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut span_start = 0.0;
            for &(x, dir) in &crossings {
                let prev = winding;
                winding += dir;
                if prev == 0 && winding != 0 {
                    span_start = x;
                } else if prev != 0 && winding == 0 {
                    touched |= add_span(&mut coverage, span_start, x, weight, width);
                }
            }
        }

        if !touched {
            continue;
        }
        for (x, &cov) in coverage.iter().enumerate() {
            if cov > 0.0 {
                canvas.blend_pixel(x as u32, y as u32, color, cov as f32);
            }
        }
    }
}

/// Accumulate one covered span into the row, clipped to the canvas. Returns
/// whether anything landed inside.
fn add_span(coverage: &mut [f64], x0: f64, x1: f64, weight: f64, width: usize) -> bool {
    let left = x0.max(0.0);
    let right = x1.min(width as f64);
    if right <= left {
        return false;
    }
    let first = left.floor() as usize;
    let last = (right.ceil() as usize).min(width);
    for (i, cov) in coverage.iter_mut().enumerate().take(last).skip(first) {
        let overlap = (right.min((i + 1) as f64) - left.max(i as f64)).max(0.0);
        *cov += overlap * weight;
    }
    true
}

fn flatten_to_segments(path: &BezPath) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;

    kurbo::flatten(
        path.elements().iter().copied(),
        FLATTEN_TOLERANCE,
        |el| match el {
            PathEl::MoveTo(p) => {
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                segments.push(Segment {
                    x0: current.x,
                    y0: current.y,
                    x1: p.x,
                    y1: p.y,
                });
                current = p;
            }
            PathEl::ClosePath => {
                segments.push(Segment {
                    x0: current.x,
                    y0: current.y,
                    x1: start.x,
                    y1: start.y,
                });
                current = start;
            }
            // flatten() only emits the variants above.
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => unreachable!(),
        },
    );

    segments
}
