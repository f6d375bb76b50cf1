//! Page composition

use crate::layout::SheetGeometry;
use image::{Rgb, RgbImage, imageops};

/// Compose one page from `items[start..]`.
///
/// Allocates a page filled with the background colour and pastes up to
/// one grid's worth of photos in row-major order, stopping early when
/// the list runs out. Photos are pasted opaquely at their cell origin.
///
/// Returns the page canvas and the number of photos placed.
pub fn compose_page(
    items: &[RgbImage],
    start: usize,
    geometry: &SheetGeometry,
) -> (RgbImage, usize) {
    let mut canvas = RgbImage::from_pixel(
        geometry.page.width,
        geometry.page.height,
        Rgb(geometry.background),
    );

    let remaining = items.get(start..).unwrap_or_default();
    let mut placed = 0;

    for (local_index, item) in remaining
        .iter()
        .take(geometry.grid.items_per_page())
        .enumerate()
    {
        let (x, y) = geometry.cell_origin(local_index);
        imageops::replace(&mut canvas, item, x as i64, y as i64);
        placed += 1;
    }

    (canvas, placed)
}
