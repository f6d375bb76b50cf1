//! Photo normalization
//!
//! Turns one decoded source image into a photo of exactly the configured
//! item size:
//! 1. Flatten alpha/palette images to opaque RGB
//! 2. Center-crop to the item's aspect ratio
//! 3. Resample to the item's pixel size

use crate::options::{AlphaMode, GridOptions};
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Downscaling filter; nearest-neighbour is never used for photos
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

// =============================================================================
// Crop
// =============================================================================

/// Compute the centered crop of a `width`×`height` image to the aspect
/// ratio of `target`.
///
/// Images relatively wider than the target keep their full height and lose
/// columns on both sides; all others, including an exact ratio match, keep
/// their full width and lose rows top and bottom. Odd leftovers go to the
/// right/bottom edge.
pub fn crop_rect(width: u32, height: u32, target: PixelSize) -> Result<CropRect> {
    if !target.is_non_empty() {
        return Err(PhotoGridError::Config(format!(
            "Photo size {}x{} has no area",
            target.width, target.height
        )));
    }
    if width == 0 || height == 0 {
        return Err(PhotoGridError::DegenerateImage { width, height });
    }

    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    let rect = if w * th > h * tw {
        let new_width = (h * tw / th) as u32;
        CropRect {
            left: (width - new_width) / 2,
            top: 0,
            width: new_width,
            height,
        }
    } else {
        let new_height = (w * th / tw) as u32;
        CropRect {
            left: 0,
            top: (height - new_height) / 2,
            width,
            height: new_height,
        }
    };

    if rect.width == 0 || rect.height == 0 {
        return Err(PhotoGridError::DegenerateImage { width, height });
    }

    Ok(rect)
}

// =============================================================================
// Colour
// =============================================================================

/// Collapse any alpha channel so the result is opaque 3-channel RGB.
///
/// Palette images are already expanded to RGB(A) by the decoder.
pub fn flatten(image: DynamicImage, mode: AlphaMode, background: [u8; 3]) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    match mode {
        AlphaMode::Discard => image.to_rgb8(),
        AlphaMode::CompositeOnBackground => {
            let rgba = image.into_rgba8();
            let (width, height) = rgba.dimensions();
            RgbImage::from_fn(width, height, |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                Rgb([
                    blend(r, background[0], a),
                    blend(g, background[1], a),
                    blend(b, background[2], a),
                ])
            })
        }
    }
}

fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

// =============================================================================
// Normalization
// =============================================================================

/// Flatten, crop and resample a decoded image to the configured photo size
pub fn normalize_image(image: DynamicImage, options: &GridOptions) -> Result<RgbImage> {
    let target = options.item_size;
    let rect = crop_rect(image.width(), image.height(), target)?;

    log::debug!(
        "crop {}x{} -> {}x{} at ({}, {})",
        image.width(),
        image.height(),
        rect.width,
        rect.height,
        rect.left,
        rect.top
    );

    let rgb = flatten(image, options.alpha_mode, options.background);
    let cropped = imageops::crop_imm(&rgb, rect.left, rect.top, rect.width, rect.height).to_image();

    if cropped.dimensions() == (target.width, target.height) {
        return Ok(cropped);
    }

    Ok(imageops::resize(
        &cropped,
        target.width,
        target.height,
        RESAMPLE_FILTER,
    ))
}

/// Decode encoded image bytes and normalize them
pub fn normalize_bytes(bytes: &[u8], options: &GridOptions) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    normalize_image(image, options)
}

/// Read, decode and normalize one file.
///
/// The whole step, read included, is bounded by `per_file_timeout_secs`.
/// Decoding runs on the blocking pool; on timeout the pending work is left
/// to finish in the background and its result is dropped.
pub async fn load_and_normalize(
    path: impl AsRef<Path>,
    options: &GridOptions,
) -> Result<RgbImage> {
    let path = path.as_ref().to_owned();
    let work = read_and_normalize(path.clone(), options.clone());

    match options.per_file_timeout_secs {
        0 => work.await,
        seconds => match tokio::time::timeout(Duration::from_secs(seconds), work).await {
            Ok(result) => result,
            Err(_) => Err(PhotoGridError::Timeout { path, seconds }),
        },
    }
}

async fn read_and_normalize(path: PathBuf, options: GridOptions) -> Result<RgbImage> {
    let bytes = tokio::fs::read(&path).await?;
    tokio::task::spawn_blocking(move || normalize_bytes(&bytes, &options)).await?
}

// =============================================================================
// Batch
// =============================================================================

/// Normalize every file, skipping the ones that fail.
///
/// The returned photos keep the order of `paths`, whatever the degree of
/// parallelism.
pub async fn normalize_all(paths: &[PathBuf], options: &GridOptions) -> Result<NormalizeReport> {
    let total = paths.len();
    let mut results: Vec<(usize, Result<RgbImage>)> = Vec::with_capacity(total);

    if options.max_parallel <= 1 {
        for (index, path) in paths.iter().enumerate() {
            log_progress(index, total, path);
            results.push((index, load_and_normalize(path, options).await));
        }
    } else {
        let permits = Arc::new(Semaphore::new(options.max_parallel));
        let mut tasks = JoinSet::new();

        for (index, path) in paths.iter().enumerate() {
            let permits = Arc::clone(&permits);
            let path = path.clone();
            let options = options.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                log_progress(index, total, &path);
                (index, load_and_normalize(&path, &options).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            results.push(joined?);
        }
        results.sort_by_key(|(index, _)| *index);
    }

    let mut report = NormalizeReport::default();
    for (index, result) in results {
        match result {
            Ok(image) => report.images.push(image),
            Err(e) => {
                log::warn!("Failed to process {}: {}", paths[index].display(), e);
                report.failures.push(ItemFailure {
                    path: paths[index].clone(),
                    cause: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "{} of {} image(s) processed successfully",
        report.images.len(),
        total
    );

    Ok(report)
}

fn log_progress(index: usize, total: usize, path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log::info!("[{}/{}] processing: {}", index + 1, total, name);
}

// =============================================================================
// Tests
// =============================================================================
