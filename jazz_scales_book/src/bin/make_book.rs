// Assembles the practice book from the cover and the chart PDFs.
//
// Two modes:
//   --content <pdf> [--label TEXT]   one chart, one TOC entry ("C Instruments")
//   --single [--label TEXT]          same, with the configured content file
//   (default)                        every `<prefix><key>.pdf` in the output
//                                    directory, one "Key of <key>" entry each
//
// Usage:
//   cargo run -p jazz_scales_book --bin make-book -- [--content FILE | --single] [--label TEXT]
//     [--config FILE] [--out-dir DIR]
//
// A missing cover, content file, or set of key PDFs exits non-zero naming
// the missing path.

use anyhow::{Context, Result};
use clap::Parser;
use jazz_scales_book::assemble::{key_book, single_content_book, write_book};
use jazz_scales_book::config::BookConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "make-book")]
#[command(about = "Assemble the jazz scales practice book")]
#[command(version)]
struct Args {
    /// Build around this single chart PDF instead of the per-key charts
    #[arg(long)]
    content: Option<PathBuf>,

    /// Build around the configured single chart (`out/jazz_scales.pdf`,
    /// written by `jazz-scales --single --pdf`)
    #[arg(long, conflicts_with = "content")]
    single: bool,

    /// TOC and bookmark title in single-chart mode (default from config)
    #[arg(long)]
    label: Option<String>,

    /// JSON file overriding book defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the cover and chart PDFs
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

    let content = args
        .content
        .clone()
        .or_else(|| args.single.then(|| config.content_path()));
    let mut book = match &content {
        Some(content) => {
            let label = args.label.as_deref().unwrap_or(&config.content_label);
            single_content_book(&config, content, label)?
        }
        None => key_book(&config)?,
    };
    let path = write_book(&mut book, &config).context("Failed to write book")?;

    for entry in &book.layout.toc_entries {
        println!("  {:>4}  {}", entry.page, entry.title);
    }
    println!("Wrote {} ({} pages)", path.display(), book.page_count);
    Ok(())
}
