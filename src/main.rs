use clap::Parser;
use std::path::PathBuf;
use stickercut::output::svg;
use stickercut::render::{self, CutLineStyle};
use stickercut::{path, TraceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stickercut", about = "Trace a die-cut line around transparent artwork")]
struct Cli {
    /// Input image path (PNG with an alpha channel)
    #[arg(short, long)]
    input: PathBuf,

    /// Output SVG path (image reference + cut line)
    #[arg(short, long)]
    output: PathBuf,

    /// Alpha threshold (0-255); pixels at or below it are background
    #[arg(long, default_value = "10")]
    threshold: u8,

    /// Cut margin around the artwork, in pixels
    #[arg(short, long, default_value = "6.0")]
    margin: f64,

    /// RDP simplification before offsetting, in pixels (0 = off)
    #[arg(long, default_value = "0.5")]
    simplify: f64,

    /// Emit the raw traced contour instead of the offset cut line
    #[arg(long)]
    raw: bool,

    /// Also write a PNG preview with the cut line drawn over the image
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Cut line opacity in the preview and SVG (0.0-1.0)
    #[arg(long, default_value = "0.6")]
    opacity: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stickercut=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = TraceConfig {
        alpha_threshold: cli.threshold,
        margin: cli.margin,
        simplify_epsilon: cli.simplify,
        ..TraceConfig::default()
    };
    let style = CutLineStyle {
        opacity: cli.opacity,
        ..CutLineStyle::default()
    };

    // Header
    eprintln!();
    eprintln!("  stickercut \u{00b7} {}", cli.input.display());
    eprintln!();

    let image = image::open(&cli.input)
        .map_err(|e| stickercut::TraceError::ImageLoad(e.to_string()))?
        .into_rgba8();

    // Pipeline (lib logs each stage)
    let result = stickercut::trace(&image, &config)?;
    let cut = if cli.raw {
        path::emit(&result.contour, stickercut::kurbo::Affine::IDENTITY)
    } else {
        result.cut_path.clone()
    };

    let href = cli.input.file_name().and_then(|name| name.to_str());
    let document = svg::document(image.width(), image.height(), href, &cut, &style);
    std::fs::write(&cli.output, document)?;

    if let Some(preview_path) = &cli.preview {
        render::preview(&image, &cut, &style)?.save(preview_path)?;
        eprintln!("  Preview     {}", preview_path.display());
    }

    // Footer
    if let Some(e) = &result.offset_error {
        eprintln!("  Fallback    {}", e);
    }
    eprintln!("  \u{2713} {}", cli.output.display());
    eprintln!();

    Ok(())
}
