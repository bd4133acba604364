use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use logoshift::{Background, DecodeOptions, ExportConfig, ExportFormat, ExportPipeline, ImageSource, SoftwareBackend, Variant};

/// Derive a logo variant and export it as SVG, PNG, JPEG, or PDF
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image: a file path, `data:` URL, or http(s) URL
    input: String,

    /// Output file (defaults to logo_<variant>_<with_bg|transparent>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// color, bw, black, white, or a #rrggbb color
    #[arg(long, default_value_t = Variant::Original)]
    variant: Variant,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,

    /// Background color, or `transparent`
    #[arg(short, long, default_value_t = Background::Transparent)]
    background: Background,

    /// Export without the background even if one is given
    #[arg(long)]
    no_background: bool,

    /// Reject inputs larger than this many bytes
    #[arg(long)]
    max_bytes: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pipeline = ExportPipeline::new(
        SoftwareBackend,
        DecodeOptions {
            max_bytes: args.max_bytes,
        },
    );

    let image = pipeline
        .decode(ImageSource::from_reference(&args.input))
        .await
        .with_context(|| format!("failed to load {}", args.input))?;
    info!("decoded {} ({}x{})", args.input, image.width(), image.height());

    let config = ExportConfig::new(args.variant, args.format)
        .with_background(!args.no_background && !args.background.is_transparent());
    let artifact = pipeline
        .export(&image, &config, args.background, "logo")
        .with_context(|| format!("failed to export {} as {}", config.variant, config.format))?;

    let output = args
        .output
        .or_else(|| artifact.filename().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(config.file_name("logo")));

    tokio::fs::write(&output, artifact.bytes())
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("wrote {} bytes to {}", artifact.len(), output.display());
    println!("{}", output.display());
    Ok(())
}
