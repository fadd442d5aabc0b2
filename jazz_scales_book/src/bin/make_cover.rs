// Draws the book cover and writes it to `<output_dir>/<cover_file>`
// (`out/cover.pdf` by default). The compile date is today's local date.
//
// Usage:
//   cargo run -p jazz_scales_book --bin make-cover -- [--config FILE] [--out-dir DIR]

use anyhow::{Context, Result};
use clap::Parser;
use jazz_scales_book::config::BookConfig;
use jazz_scales_book::cover::render_cover;
use jazz_scales_book::pdf;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "make-cover")]
#[command(about = "Draw the jazz scales book cover")]
#[command(version)]
struct Args {
    /// JSON file overriding book and cover defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => BookConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BookConfig::default(),
    };
    if let Some(dir) = args.out_dir {
        config.output_dir = dir;
    }

    let today = chrono::Local::now().date_naive();
    let mut cover = render_cover(&config.cover, today).context("Failed to draw cover")?;
    let path = config.cover_path();
    pdf::save(&mut cover, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
