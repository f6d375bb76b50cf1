mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use pdf_photo_grid::{GridOptions, build_photo_sheet, preview_layout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "photogrid",
    about = "Crop photos to 3x4 and pack them onto A4 PDF pages",
    version
)]
struct Cli {
    /// Folder scanned recursively for .jpg, .jpeg and .png files
    root: PathBuf,

    /// JSON file with layout options (defaults: A4, 3x4cm, 300 DPI)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the page layout only, don't generate the PDF
    #[arg(long)]
    stats_only: bool,

    /// Log crop details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

const RULE: &str = "============================================================";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit with 1; --help and --version exit with 0
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logger::ConsoleLogger::new(cli.log_level())
        .init()
        .context("Failed to install logger")?;

    let options = match &cli.config {
        Some(path) => GridOptions::load(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GridOptions::default(),
    };

    if cli.stats_only {
        let stats = preview_layout(&cli.root, &options).await?;
        println!("Photo Grid Statistics:");
        println!("  Images: {}", stats.images);
        println!(
            "  Layout: {} columns x {} rows = {} per page",
            stats.columns, stats.rows, stats.items_per_page
        );
        println!("  Pages: {}", stats.pages);
        println!("  Photos on last page: {}", stats.last_page_items);
        return Ok(());
    }

    let report = build_photo_sheet(&cli.root, &options)
        .await
        .with_context(|| format!("Failed to create photo sheet for {}", cli.root.display()))?;

    println!("{}", RULE);
    println!(
        "[OK] {} of {} image(s) placed on {} page(s)",
        report.placed, report.discovered, report.pages
    );
    for failure in &report.failures {
        println!("  skipped {}: {}", failure.path.display(), failure.cause);
    }
    println!("PDF saved to:");
    println!("   {}", report.output_path.display());
    println!("{}", RULE);

    Ok(())
}
