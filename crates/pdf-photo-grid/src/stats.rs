use crate::layout::SheetGeometry;
use crate::options::GridOptions;
use crate::types::*;

/// Calculate the page layout for `image_count` photos without rendering
pub fn calculate_statistics(image_count: usize, options: &GridOptions) -> Result<GridStatistics> {
    let geometry = SheetGeometry::resolve(options)?;
    let grid = geometry.grid;
    let items_per_page = grid.items_per_page();
    let pages = grid.page_count(image_count);

    let last_page_items = match pages {
        0 => 0,
        _ => image_count - (pages - 1) * items_per_page,
    };

    Ok(GridStatistics {
        images: image_count,
        columns: grid.columns,
        rows: grid.rows,
        items_per_page,
        pages,
        last_page_items,
    })
}
