//! End-to-end photo sheet generation
//!
//! 1. Resolve geometry (fails before any work if nothing fits)
//! 2. Discover source files
//! 3. Normalize each file, skipping failures
//! 4. Paginate the surviving photos
//! 5. Assemble and atomically save the PDF inside the source directory

use crate::discover::find_images;
use crate::document::save_pdf;
use crate::layout::SheetGeometry;
use crate::normalize::normalize_all;
use crate::options::GridOptions;
use crate::paginate::paginate;
use crate::stats::calculate_statistics;
use crate::types::*;
use std::path::{Path, PathBuf};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct SheetReport {
    /// Absolute path of the written PDF
    pub output_path: PathBuf,
    /// Files matching a supported extension
    pub discovered: usize,
    /// Files skipped because they could not be processed
    pub failures: Vec<ItemFailure>,
    /// Photos placed across all pages
    pub placed: usize,
    /// Pages written
    pub pages: usize,
    /// Grid used on every page
    pub grid: LayoutGrid,
}

/// Build the photo sheet PDF for every image under `root`
pub async fn build_photo_sheet(
    root: impl AsRef<Path>,
    options: &GridOptions,
) -> Result<SheetReport> {
    let root = root.as_ref();
    let geometry = SheetGeometry::resolve(options)?;

    log::info!("Searching for images in {}", root.display());
    let paths = find_images(root).await?;
    if paths.is_empty() {
        return Err(PhotoGridError::NoImagesFound(root.to_owned()));
    }
    log::info!("Found {} image(s)", paths.len());

    let report = normalize_all(&paths, options).await?;
    if report.images.is_empty() {
        return Err(PhotoGridError::NothingNormalized {
            attempted: report.attempted(),
        });
    }

    log::info!(
        "Layout: {} columns x {} rows = {} photos per page",
        geometry.grid.columns,
        geometry.grid.rows,
        geometry.grid.items_per_page()
    );
    let pages = paginate(&report.images, &geometry)?;
    if pages.is_empty() {
        return Err(PhotoGridError::NoPages);
    }

    let page_count = pages.len();
    let placed = pages.iter().map(|page| page.placed).sum();
    drop(report.images);

    let output_path = root.join(&options.output_file_name);
    log::info!("Writing {} page(s) to {}", page_count, output_path.display());
    save_pdf(pages, options, &output_path).await?;

    let output_path = tokio::fs::canonicalize(&output_path).await?;

    Ok(SheetReport {
        output_path,
        discovered: paths.len(),
        failures: report.failures,
        placed,
        pages: page_count,
        grid: geometry.grid,
    })
}

/// Discover images under `root` and report the layout they would produce
pub async fn preview_layout(
    root: impl AsRef<Path>,
    options: &GridOptions,
) -> Result<GridStatistics> {
    let root = root.as_ref();
    let paths = find_images(root).await?;
    if paths.is_empty() {
        return Err(PhotoGridError::NoImagesFound(root.to_owned()));
    }
    calculate_statistics(paths.len(), options)
}
