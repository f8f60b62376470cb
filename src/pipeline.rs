//! The sample driver: per sample it draws a filename uuid, plans geometry,
//! composes the scene, runs the post-processing chain, decides on blur,
//! serializes the bitmap and appends one markup line.

use std::path::PathBuf;

use anyhow::Context as _;
use tracing::info;

use crate::{
    blur,
    canvas::Canvas,
    error::{SamplerError, SamplerResult},
    font::FontCatalog,
    geometry::{self, GeometryPlan},
    markup::MarkupWriter,
    post,
    rng::SampleRng,
    scene,
};

/// Point sizes above this threshold are eligible for the blur pass.
const BLUR_MIN_POINT_SIZE: f64 = 11.0;

#[derive(Clone, Debug)]
pub struct GenerateConfig {
    pub phrase: String,
    pub samples: u32,
    /// Output image extension; also selects the codec.
    pub extension: String,
    /// Max rotation in degrees.
    pub angle_dev: f64,
    /// Max color-scheme channel deviation for the colorful variant.
    pub color_dev: i32,
    /// Upper bound for the per-image additive-noise bound.
    pub noise_dev: i32,
}

impl GenerateConfig {
    pub fn validate(&self) -> SamplerResult<()> {
        self.image_format()?;
        if !self.angle_dev.is_finite() || !(0.0..=90.0).contains(&self.angle_dev) {
            return Err(SamplerError::validation("angledev must be in [0, 90]"));
        }
        if !(0..=55).contains(&self.color_dev) {
            return Err(SamplerError::validation("colordev must be in [0, 55]"));
        }
        if self.noise_dev < 0 {
            return Err(SamplerError::validation("noisedev must be >= 0"));
        }
        Ok(())
    }

    pub fn image_format(&self) -> SamplerResult<image::ImageFormat> {
        image::ImageFormat::from_extension(&self.extension).ok_or_else(|| {
            SamplerError::validation(format!("unknown image extension '{}'", self.extension))
        })
    }
}

/// Finished bitmap for one sample. Blurred samples carry an alpha channel;
/// everything else stays plain RGB.
pub enum SampleImage {
    Rgb(image::RgbImage),
    Rgba(image::RgbaImage),
}

pub struct SampleOutput {
    pub filename: String,
    pub plan: GeometryPlan,
    pub image: SampleImage,
}

/// Generate one sample, consuming stream draws in the pipeline's fixed
/// order: uuid bytes, geometry, scene, post-processing, blur decision.
pub fn generate_sample(
    rng: &mut SampleRng,
    catalog: &FontCatalog,
    config: &GenerateConfig,
) -> SamplerResult<SampleOutput> {
    let uuid = rng.uuid();

    let plan = geometry::plan_sample(rng, catalog, &config.phrase)?;
    let mut canvas = Canvas::new(plan.width, plan.height);

    scene::compose(
        &mut canvas,
        rng,
        catalog,
        &plan,
        &config.phrase,
        config.angle_dev,
        config.color_dev,
    )?;

    let alpha = (0.5 + rng.next_f64()) as f32;
    post::linear_scale(&mut canvas, alpha, 0.0);
    post::disturb_colors(&mut canvas, rng, post::DISTURB_MAX_DEV);
    // The per-image bound truncates to an integer before use.
    let noise_bound = (rng.next_f64() * f64::from(config.noise_dev)) as i32;
    post::add_random_noise(&mut canvas, rng, noise_bound);

    let filename = format!("{uuid}.{}", config.extension);

    // Short-circuit keeps small point sizes from consuming the blur draw.
    let image = if plan.point_size > BLUR_MIN_POINT_SIZE && rng.next_f64() > 0.4 {
        let radius = 1.0 + 2.0 * rng.next_f64();
        SampleImage::Rgba(blur::blur_canvas(&canvas, radius)?)
    } else {
        SampleImage::Rgb(canvas.into_rgb_image()?)
    };

    Ok(SampleOutput {
        filename,
        plan,
        image,
    })
}

/// Owns the only shared mutable state of a run: the random stream and the
/// markup handle.
pub struct SampleDriver<'a> {
    config: &'a GenerateConfig,
    catalog: &'a FontCatalog,
    rng: SampleRng,
    markup: MarkupWriter,
    samples_dir: PathBuf,
}

impl<'a> SampleDriver<'a> {
    pub fn new(
        config: &'a GenerateConfig,
        catalog: &'a FontCatalog,
        rng: SampleRng,
        markup: MarkupWriter,
        samples_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            catalog,
            rng,
            markup,
            samples_dir,
        }
    }

    /// Run the whole batch. Any failure, including image save, aborts the
    /// run; nothing is retried.
    pub fn run(&mut self) -> SamplerResult<u32> {
        let format = self.config.image_format()?;
        for _ in 0..self.config.samples {
            let output = generate_sample(&mut self.rng, self.catalog, self.config)?;
            save_image(
                &self.samples_dir.join(&output.filename),
                &output.image,
                format,
            )?;
            self.markup.append(
                &format!("{}/{}", crate::APP_NAME, output.filename),
                &self.config.phrase,
            )?;
        }
        info!(samples = self.config.samples, "batch complete");
        Ok(self.config.samples)
    }
}

fn save_image(
    path: &std::path::Path,
    image: &SampleImage,
    format: image::ImageFormat,
) -> SamplerResult<()> {
    let result = match image {
        SampleImage::Rgb(img) => img.save_with_format(path, format),
        // JPEG cannot carry alpha; flatten before encoding.
        SampleImage::Rgba(img) if format == image::ImageFormat::Jpeg => {
            image::DynamicImage::ImageRgba8(img.clone())
                .into_rgb8()
                .save_with_format(path, format)
        }
        SampleImage::Rgba(img) => img.save_with_format(path, format),
    };
    result
        .with_context(|| format!("save sample image '{}'", path.display()))
        .map_err(SamplerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extension: &str) -> GenerateConfig {
        GenerateConfig {
            phrase: "test".to_string(),
            samples: 1,
            extension: extension.to_string(),
            angle_dev: 3.0,
            color_dev: 55,
            noise_dev: 13,
        }
    }

    #[test]
    fn known_extensions_validate() {
        assert!(config("jpg").validate().is_ok());
        assert!(config("png").validate().is_ok());
        assert!(config("bmp").validate().is_ok());
    }

    #[test]
    fn unknown_extension_is_rejected_before_any_work() {
        let err = config("xyz").validate().unwrap_err();
        assert!(err.to_string().contains("unknown image extension"));
    }

    #[test]
    fn out_of_range_deviations_are_rejected() {
        let mut bad = config("jpg");
        bad.color_dev = 56;
        assert!(bad.validate().is_err());
        let mut bad = config("jpg");
        bad.angle_dev = 91.0;
        assert!(bad.validate().is_err());
        let mut bad = config("jpg");
        bad.noise_dev = -1;
        assert!(bad.validate().is_err());
    }
}
