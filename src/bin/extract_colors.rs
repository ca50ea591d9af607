use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use cad_colors_wasm::{ExtractOptions, ExtractedColor, decode_rgba, extract_colors, label_swatches};
use anyhow::Context;
use anyhow::Result;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Table,
}

/// Extract the dominant exact colors of CAD images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Percentage of rows at the bottom to leave out (clamped to 0-12)
    #[arg(short = 'b', long)]
    ignore_bottom: Option<f64>,

    /// Maximum number of colors to report
    #[arg(short = 'k', long)]
    max_colors: Option<usize>,

    /// Pixels scanned between yield points (clamped to 50000-2000000)
    #[arg(short = 'y', long)]
    yield_every: Option<u64>,

    /// JSON file with extraction options; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Serialize)]
struct FileColors<'a> {
    file: String,
    colors: &'a [ExtractedColor],
}

fn load_options(args: &Args) -> Result<ExtractOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        // Same values the upload page passes in.
        None => ExtractOptions::default().with_yield_every_pixels(300_000),
    };
    if let Some(pct) = args.ignore_bottom {
        opts = opts.with_ignore_bottom_percent(pct);
    }
    if let Some(n) = args.max_colors {
        opts = opts.with_max_colors(n);
    }
    if let Some(n) = args.yield_every {
        opts = opts.with_yield_every_pixels(n);
    }
    Ok(opts)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let opts = load_options(&args)?;
    log::debug!("options {:?}", opts);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let img = decode_rgba(&bytes).with_context(|| format!("decoding {}", input.display()))?;
        let colors = extract_colors(&img, &opts)
            .with_context(|| format!("extracting colors from {}", input.display()))?;

        if colors.is_empty() {
            log::warn!("no colors detected in {}", input.display());
        }

        match args.format {
            Format::Json => {
                let out = FileColors {
                    file: input.display().to_string(),
                    colors: &colors,
                };
                println!("{}", serde_json::to_string(&out)?);
            }
            Format::Table => {
                println!("{}", input.display());
                for swatch in label_swatches(&colors) {
                    println!("  {:<26} {}  {:>6.2}%", swatch.label, swatch.hex, swatch.pct);
                }
            }
        }
    }

    Ok(())
}
