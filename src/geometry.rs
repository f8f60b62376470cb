use crate::{error::SamplerResult, font::FontCatalog, rng::SampleRng};

/// Everything the scene composer needs to know about one sample's canvas:
/// which face at what size, the border margin and the resulting extent.
#[derive(Clone, Copy, Debug)]
pub struct GeometryPlan {
    pub font_index: usize,
    pub point_size: f64,
    pub border: u32,
    pub width: u32,
    pub height: u32,
}

/// Draw border, face and point size (in that order), measure the phrase and
/// derive the canvas extent.
pub fn plan_sample(
    rng: &mut SampleRng,
    catalog: &FontCatalog,
    phrase: &str,
) -> SamplerResult<GeometryPlan> {
    let border = 1 + rng.next_u32() % 7;
    let font_index = rng.next_u32() as usize % catalog.len();
    let point_size = 8.0 + 16.0 * rng.next_f64();

    let metrics = catalog.face(font_index).measure(phrase, point_size)?;
    let (width, height) = canvas_extent(metrics.advance, metrics.line_height, border);

    Ok(GeometryPlan {
        font_index,
        point_size,
        border,
        width,
        height,
    })
}

/// Width reserves a 5% trailing margin; height compresses the line height by
/// 1.7 to trim vertical whitespace. Both ratios are deliberate and preserved
/// exactly.
pub fn canvas_extent(advance: f64, line_height: f64, border: u32) -> (u32, u32) {
    let width = (advance * 1.05).round() as u32 + 2 * border;
    let height = (line_height / 1.7).round() as u32 + 2 * border;
    (width, height)
}
