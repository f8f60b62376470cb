use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use tracing::{error, info};

use textsampler::{
    APP_NAME, FontCatalog, GenerateConfig, MarkupWriter, SampleDriver, SampleRng, SamplerError,
    SamplerResult,
};

/// Generates pictures with text phrases; the output can feed CTC training.
#[derive(Parser, Debug)]
#[command(name = "textsampler", version)]
struct Cli {
    /// Input text phrase.
    #[arg(long = "text", short = 't')]
    text: Option<String>,

    /// Output directory where the sample subdirectory and markup file are
    /// stored.
    #[arg(long, short, default_value = "./")]
    outdir: PathBuf,

    /// Markup file name.
    #[arg(long, default_value = "gt.txt")]
    markupfilename: String,

    /// Samples to generate.
    #[arg(long, short, default_value_t = 2)]
    samples: u32,

    /// Seed value for the random generator, current time if 0.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Picture codec (jpg, png, ...).
    #[arg(long, default_value = "jpg")]
    extension: String,

    /// Max rotation angle in degrees.
    #[arg(long = "angledev", default_value_t = 3.0)]
    angle_dev: f64,

    /// Max color deviation.
    #[arg(long = "colordev", default_value_t = 55)]
    color_dev: i32,

    /// Max noise deviation.
    #[arg(long = "noisedev", default_value_t = 13)]
    noise_dev: i32,

    /// Font file to use instead of system font discovery; repeatable.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();

    let Some(phrase) = cli.text.clone() else {
        info!("no phrase specified, so there is nothing to generate; aborting");
        return ExitCode::from(1);
    };

    match run(cli, phrase) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            match err {
                SamplerError::MarkupAppend { .. } => ExitCode::from(2),
                SamplerError::MarkupCreate { .. } => ExitCode::from(3),
                _ => ExitCode::from(1),
            }
        }
    }
}

fn run(cli: Cli, phrase: String) -> SamplerResult<()> {
    let samples_dir = cli.outdir.join(APP_NAME);
    std::fs::create_dir_all(&samples_dir)
        .with_context(|| format!("create sample directory '{}'", samples_dir.display()))?;

    let markup_path = cli.outdir.join(&cli.markupfilename);
    let (markup, existed) = MarkupWriter::open(&markup_path)?;
    if existed {
        info!("markup file found in output directory, new lines will be appended");
    } else {
        info!("markup file will be created in output directory");
    }

    let seed = SampleRng::resolve_seed(cli.seed);
    info!(seed, "seed value");

    let catalog = if cli.fonts.is_empty() {
        FontCatalog::discover()?
    } else {
        FontCatalog::from_files(&cli.fonts)?
    };

    let config = GenerateConfig {
        phrase: phrase.clone(),
        samples: cli.samples,
        extension: cli.extension,
        angle_dev: cli.angle_dev,
        color_dev: cli.color_dev,
        noise_dev: cli.noise_dev,
    };
    config.validate()?;

    info!(%phrase, "phrase under processing");
    let mut driver = SampleDriver::new(
        &config,
        &catalog,
        SampleRng::new(seed),
        markup,
        samples_dir,
    );
    driver.run()?;

    info!("done");
    Ok(())
}
