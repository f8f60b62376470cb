//! Font loading, measurement and outline extraction. The catalog replaces
//! the original tool's process-global two-entry font family list with
//! explicit configuration passed to the geometry planner and scene composer.

use std::path::PathBuf;

use kurbo::{BezPath, Point};
use ttf_parser::{Face, GlyphId};

use crate::error::{SamplerError, SamplerResult};

/// Family requests mirroring the original list, each with a generic
/// fallback so the catalog resolves on systems without those exact fonts.
const FAMILY_REQUESTS: [(&str, fontdb::Family<'static>); 2] = [
    ("Times New Roman", fontdb::Family::Serif),
    ("Arial", fontdb::Family::SansSerif),
];

/// Advance width and line height of a phrase at some pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub advance: f64,
    pub line_height: f64,
}

pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    family: String,
}

/// Fixed list of faces a sample's font is drawn from.
pub struct FontCatalog {
    faces: Vec<FontFace>,
}

impl FontCatalog {
    /// Resolve the default serif/sans pair through system font discovery.
    pub fn discover() -> SamplerResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut faces = Vec::with_capacity(FAMILY_REQUESTS.len());
        for (name, fallback) in FAMILY_REQUESTS {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(name), fallback],
                ..fontdb::Query::default()
            };
            let id = db.query(&query).ok_or_else(|| {
                SamplerError::font(format!("no system font matches '{name}' or its fallback"))
            })?;
            let info = db
                .face(id)
                .ok_or_else(|| SamplerError::font("queried font face disappeared"))?;
            let family = info
                .families
                .first()
                .map(|(n, _)| n.clone())
                .unwrap_or_else(|| name.to_string());
            let index = info.index;
            let data = db
                .with_face_data(id, |bytes, _| bytes.to_vec())
                .ok_or_else(|| SamplerError::font(format!("cannot load font data for '{family}'")))?;
            faces.push(FontFace::from_bytes(data, index, family)?);
        }
        Ok(Self { faces })
    }

    /// Build the catalog from explicit font files, bypassing discovery.
    pub fn from_files(paths: &[PathBuf]) -> SamplerResult<Self> {
        if paths.is_empty() {
            return Err(SamplerError::validation("font file list must be non-empty"));
        }
        let mut faces = Vec::with_capacity(paths.len());
        for path in paths {
            let data = std::fs::read(path).map_err(|e| {
                SamplerError::font(format!("cannot read font file '{}': {e}", path.display()))
            })?;
            let family = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unnamed".to_string());
            faces.push(FontFace::from_bytes(data, 0, family)?);
        }
        Ok(Self { faces })
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face(&self, index: usize) -> &FontFace {
        &self.faces[index]
    }
}

impl FontFace {
    fn from_bytes(data: Vec<u8>, index: u32, family: String) -> SamplerResult<Self> {
        // Parse once up front so later per-sample parses cannot fail.
        Face::parse(&data, index)
            .map_err(|e| SamplerError::font(format!("cannot parse font '{family}': {e}")))?;
        Ok(Self {
            data,
            index,
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Measure the phrase at a fractional pixel size: advance is the summed
    /// horizontal advance, line height is ascender - descender + line gap.
    pub fn measure(&self, text: &str, size_px: f64) -> SamplerResult<TextMetrics> {
        let face = self.parse()?;
        let scale = scale_factor(&face, size_px)?;

        let mut advance_units = 0u64;
        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            advance_units += u64::from(face.glyph_hor_advance(glyph).unwrap_or(0));
        }
        let line_units =
            i32::from(face.ascender()) - i32::from(face.descender()) + i32::from(face.line_gap());

        Ok(TextMetrics {
            advance: advance_units as f64 * scale,
            line_height: f64::from(line_units) * scale,
        })
    }

    /// Build the filled outline of the phrase with its baseline anchored at
    /// `origin`, in canvas coordinates (y grows downward).
    pub fn outline(&self, text: &str, size_px: f64, origin: Point) -> SamplerResult<BezPath> {
        let face = self.parse()?;
        let scale = scale_factor(&face, size_px)?;

        let mut path = BezPath::new();
        let mut pen_x = origin.x;
        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            let mut pen = OutlinePen {
                path: &mut path,
                scale,
                dx: pen_x,
                dy: origin.y,
            };
            face.outline_glyph(glyph, &mut pen);
            pen_x += f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
        }
        Ok(path)
    }

    fn parse(&self) -> SamplerResult<Face<'_>> {
        Face::parse(&self.data, self.index)
            .map_err(|e| SamplerError::font(format!("cannot parse font '{}': {e}", self.family)))
    }
}

fn scale_factor(face: &Face<'_>, size_px: f64) -> SamplerResult<f64> {
    let upem = face.units_per_em();
    if upem == 0 {
        return Err(SamplerError::font("font reports zero units per em"));
    }
    Ok(size_px / f64::from(upem))
}

/// Maps font-unit outlines (y up) into canvas space (y down) at a pen
/// position.
struct OutlinePen<'a> {
    path: &'a mut BezPath,
    scale: f64,
    dx: f64,
    dy: f64,
}

impl OutlinePen<'_> {
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.dx + f64::from(x) * self.scale,
            self.dy - f64::from(y) * self.scale,
        )
    }
}

impl ttf_parser::OutlineBuilder for OutlinePen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(self.map(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(self.map(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(self.map(x1, y1), self.map(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path
            .curve_to(self.map(x1, y1), self.map(x2, y2), self.map(x, y));
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_catalog() -> Option<FontCatalog> {
        FontCatalog::discover().ok()
    }

    #[test]
    fn discover_returns_two_faces_when_fonts_exist() {
        let Some(catalog) = system_catalog() else {
            eprintln!("no system fonts available, skipping");
            return;
        };
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.face(0).family().is_empty());
    }

    #[test]
    fn measure_scales_linearly_with_size() {
        let Some(catalog) = system_catalog() else {
            eprintln!("no system fonts available, skipping");
            return;
        };
        let face = catalog.face(0);
        let small = face.measure("sample", 10.0).unwrap();
        let large = face.measure("sample", 20.0).unwrap();
        assert!(small.advance > 0.0);
        assert!((large.advance - 2.0 * small.advance).abs() < 1e-9);
        assert!((large.line_height - 2.0 * small.line_height).abs() < 1e-9);
    }

    #[test]
    fn empty_phrase_measures_zero_advance() {
        let Some(catalog) = system_catalog() else {
            eprintln!("no system fonts available, skipping");
            return;
        };
        let metrics = catalog.face(0).measure("", 14.0).unwrap();
        assert_eq!(metrics.advance, 0.0);
        assert!(metrics.line_height > 0.0);
    }

    #[test]
    fn outline_is_nonempty_and_near_origin() {
        let Some(catalog) = system_catalog() else {
            eprintln!("no system fonts available, skipping");
            return;
        };
        let face = catalog.face(0);
        let origin = Point::new(3.0, 20.0);
        let path = face.outline("Hg", 16.0, origin).unwrap();
        assert!(!path.elements().is_empty());
        let bbox = kurbo::Shape::bounding_box(&path);
        assert!(bbox.x0 >= 0.0 && bbox.x1 < 60.0);
        // Baseline-anchored: ascenders sit above origin.y, descenders below.
        assert!(bbox.y0 < origin.y && bbox.y1 > origin.y);
    }

    #[test]
    fn from_files_rejects_empty_list() {
        assert!(FontCatalog::from_files(&[]).is_err());
    }

    #[test]
    fn from_files_rejects_non_font_data() {
        let dir = std::path::PathBuf::from("target").join("font_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not_a_font.ttf");
        std::fs::write(&path, b"definitely not sfnt").unwrap();
        assert!(FontCatalog::from_files(&[path]).is_err());
    }
}
