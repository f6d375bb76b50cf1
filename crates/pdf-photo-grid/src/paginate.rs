//! Pagination over the full photo list

use crate::compose::compose_page;
use crate::layout::SheetGeometry;
use crate::types::*;
use image::RgbImage;

/// Lay out every photo across as many pages as needed.
///
/// Each page holds `items[p * per_page .. min((p + 1) * per_page, len)]`.
/// An empty list yields no pages. A grid with no cells is a configuration
/// error rather than an endless run of blank pages.
pub fn paginate(items: &[RgbImage], geometry: &SheetGeometry) -> Result<Vec<Page>> {
    let per_page = geometry.grid.items_per_page();
    if per_page == 0 {
        return Err(PhotoGridError::Config(format!(
            "Layout has {} columns x {} rows; no photo fits on a page",
            geometry.grid.columns, geometry.grid.rows
        )));
    }

    let mut pages = Vec::with_capacity(geometry.grid.page_count(items.len()));
    let mut offset = 0;

    while offset < items.len() {
        let (canvas, placed) = compose_page(items, offset, geometry);
        log::info!("Page {} created with {} photo(s)", pages.len() + 1, placed);

        pages.push(Page {
            index: pages.len(),
            canvas,
            placed,
        });
        offset += per_page;
    }

    Ok(pages)
}
