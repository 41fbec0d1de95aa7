use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use image::ImageFormat;
use tracing_subscriber::EnvFilter;

use halftone::config::{Config, Settings};
use halftone::Raster;

#[derive(Parser)]
struct Opts {
    /// PNG or JPEG image to halftone.
    input: PathBuf,
    /// Where to write the PNG result. Defaults to a name describing the settings, next to the
    /// input.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Read all settings from this JSON file instead of the flags below.
    #[clap(long)]
    settings: Option<PathBuf>,
    #[clap(flatten)]
    config: Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("halftone=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let config = match &opts.settings {
        Some(path) => read_config(path)?,
        None => opts.config.clone(),
    };
    let settings = config.settings().context("Invalid settings")?;

    let image = read_image(&opts.input)?;
    let rendered = halftone::render(&image, &settings).context("Failed to render")?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output(&opts.input, &settings));
    write_png(rendered, &output)?;
    tracing::info!(path = %output.display(), "wrote png");
    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings at {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse settings at {}", path.display()))
}

fn read_image(path: &Path) -> anyhow::Result<Raster> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode image at {}", path.display()))?
        .into_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(Raster::from_rgba(width, height, decoded.into_raw())?)
}

fn write_png(raster: Raster, path: &Path) -> anyhow::Result<()> {
    let (width, height) = (raster.width(), raster.height());
    let buffer = image::RgbaImage::from_raw(width, height, raster.into_bytes())
        .context("Rendered buffer does not match its dimensions")?;
    buffer
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG at {}", path.display()))
}

fn default_output(input: &Path, settings: &Settings) -> PathBuf {
    let name = format!(
        "Halftone[{};{};{:.1}].png",
        settings.pattern.name(),
        settings.kernel_size,
        settings.angle
    );
    input.with_file_name(name)
}
