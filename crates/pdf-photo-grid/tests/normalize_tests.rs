use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use pdf_photo_grid::*;
use std::path::{Path, PathBuf};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

#[test]
fn test_wide_image_keeps_full_height() {
    let rect = crop_rect(1920, 1080, PixelSize::new(354, 472)).unwrap();
    assert_eq!(rect.height, 1080);
    assert_eq!(rect.top, 0);
    assert_eq!(rect.width, 810);
    // Symmetric trim
    assert_eq!(rect.left, 1920 - rect.right());
}

#[test]
fn test_tall_image_keeps_full_width() {
    let rect = crop_rect(1080, 1920, PixelSize::new(354, 472)).unwrap();
    assert_eq!(rect.width, 1080);
    assert_eq!(rect.left, 0);
    assert_eq!(rect.height, 1440);
    assert_eq!(rect.top, 1920 - rect.bottom());
}

#[test]
fn test_crop_ratio_within_rounding() {
    for (w, h) in [(4000, 3000), (3000, 4000), (1000, 1000), (123, 457), (999, 10)] {
        let rect = crop_rect(w, h, PixelSize::new(354, 472)).unwrap();
        // width/height == 3/4 up to one pixel of truncation
        let lhs = rect.width as i64 * 4;
        let rhs = rect.height as i64 * 3;
        assert!((lhs - rhs).abs() < 4, "{}x{} -> {:?}", w, h, rect);
        assert!(rect.right() <= w && rect.bottom() <= h);
    }
}

#[test]
fn test_normalizes_to_target_size() {
    let options = GridOptions::default();
    for (w, h) in [(640, 480), (480, 640), (100, 100), (30, 40), (2000, 300)] {
        let result = normalize_image(DynamicImage::ImageRgb8(gradient(w, h)), &options).unwrap();
        assert_eq!(result.dimensions(), (354, 472), "source {}x{}", w, h);
    }
}

#[test]
fn test_target_sized_input_is_unchanged() {
    let options = GridOptions::default();
    let source = gradient(354, 472);

    let result = normalize_image(DynamicImage::ImageRgb8(source.clone()), &options).unwrap();
    assert_eq!(result, source);
}

#[test]
fn test_normalization_is_idempotent() {
    let options = GridOptions::default();
    let once = normalize_image(DynamicImage::ImageRgb8(gradient(1600, 900)), &options).unwrap();
    let twice = normalize_image(DynamicImage::ImageRgb8(once.clone()), &options).unwrap();

    assert_eq!(twice.dimensions(), (354, 472));
    assert_eq!(twice, once);
}

#[test]
fn test_transparent_pixels_composite_onto_white() {
    let options = GridOptions::default();
    let transparent = RgbaImage::from_pixel(354, 472, Rgba([0, 0, 0, 0]));

    let result = normalize_image(DynamicImage::ImageRgba8(transparent), &options).unwrap();
    assert!(result.pixels().all(|p| *p == Rgb([255, 255, 255])));
}

#[test]
fn test_discard_alpha_keeps_underlying_colour() {
    let options = GridOptions {
        alpha_mode: AlphaMode::Discard,
        ..Default::default()
    };
    let transparent = RgbaImage::from_pixel(354, 472, Rgba([10, 20, 30, 0]));

    let result = normalize_image(DynamicImage::ImageRgba8(transparent), &options).unwrap();
    assert!(result.pixels().all(|p| *p == Rgb([10, 20, 30])));
}

#[test]
fn test_grayscale_becomes_rgb() {
    let options = GridOptions::default();
    let gray = image::GrayImage::from_pixel(300, 400, image::Luma([90]));

    let result = normalize_image(DynamicImage::ImageLuma8(gray), &options).unwrap();
    assert_eq!(result.dimensions(), (354, 472));
    assert_eq!(result.get_pixel(177, 236), &Rgb([90, 90, 90]));
}

#[test]
fn test_tiny_image_is_degenerate() {
    let options = GridOptions::default();
    let result = normalize_image(DynamicImage::ImageRgb8(gradient(1, 1)), &options);
    assert!(matches!(result, Err(PhotoGridError::DegenerateImage { .. })));
}

#[tokio::test]
async fn test_load_and_normalize_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "photo.png", &gradient(800, 600));

    let result = load_and_normalize(&path, &GridOptions::default()).await.unwrap();
    assert_eq!(result.dimensions(), (354, 472));
}

#[tokio::test]
async fn test_corrupt_file_is_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"definitely not a jpeg").unwrap();

    let result = load_and_normalize(&path, &GridOptions::default()).await;
    assert!(matches!(result, Err(PhotoGridError::Image(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_normalize(dir.path().join("nope.png"), &GridOptions::default()).await;
    assert!(matches!(result, Err(PhotoGridError::Io(_))));
}

#[tokio::test]
async fn test_normalize_all_skips_failures_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_png(dir.path(), "a.png", &RgbImage::from_pixel(30, 40, Rgb([1, 1, 1])));
    let b = dir.path().join("b.jpg");
    std::fs::write(&b, b"garbage").unwrap();
    let c = write_png(dir.path(), "c.png", &RgbImage::from_pixel(30, 40, Rgb([3, 3, 3])));

    let report = normalize_all(&[a, b.clone(), c], &GridOptions::default())
        .await
        .unwrap();

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.images.len(), 2);
    assert_eq!(report.images[0].get_pixel(0, 0), &Rgb([1, 1, 1]));
    assert_eq!(report.images[1].get_pixel(0, 0), &Rgb([3, 3, 3]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, b);
    assert!(!report.failures[0].cause.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_normalization_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..12u8)
        .map(|i| {
            // Larger sources finish later, so completion order differs from input order
            let size = 30 * (12 - i as u32);
            let image = RgbImage::from_pixel(size * 3, size * 4, Rgb([i * 10, 0, 0]));
            write_png(dir.path(), &format!("{:02}.png", i), &image)
        })
        .collect();

    let options = GridOptions {
        max_parallel: 4,
        ..Default::default()
    };
    let report = normalize_all(&paths, &options).await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.images.len(), 12);
    for (i, image) in report.images.iter().enumerate() {
        assert_eq!(image.get_pixel(177, 236).0[0], i as u8 * 10);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_blocking_read_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_png(dir.path(), "a.png", &RgbImage::from_pixel(30, 40, Rgb([1, 1, 1])));
    let b = dir.path().join("b.jpg");
    let status = std::process::Command::new("mkfifo").arg(&b).status().unwrap();
    assert!(status.success());

    let options = GridOptions {
        per_file_timeout_secs: 1,
        ..Default::default()
    };
    let report = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        normalize_all(&[a, b.clone()], &options),
    )
    .await
    .expect("per-file timeout did not bound the read");

    // Release the reader still blocked on the pipe
    drop(std::fs::OpenOptions::new().write(true).open(&b).unwrap());

    let report = report.unwrap();
    assert_eq!(report.images.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, b);

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        load_and_normalize(&b, &options),
    )
    .await;
    drop(std::fs::OpenOptions::new().write(true).open(&b).unwrap());
    assert!(matches!(result, Ok(Err(PhotoGridError::Timeout { seconds: 1, .. }))));
}
