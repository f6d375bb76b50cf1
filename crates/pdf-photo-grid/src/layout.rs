//! Grid layout calculation
//!
//! This module handles the geometry of photos on a page: how many columns
//! and rows fit inside the margins, and where each cell starts.

use crate::options::GridOptions;
use crate::types::*;

// =============================================================================
// Grid Creation
// =============================================================================

/// Count how many columns and rows of items fit on one page.
///
/// Spacing only sits between items, so one spacing unit is added to the
/// available space before dividing by `item + spacing`. An item that does
/// not fit yields 0 columns or rows; margins wider than the page leave no
/// available space at all.
///
/// # Arguments
/// * `page` - Page size in pixels
/// * `item` - Photo size in pixels
/// * `margin_px` - Margin on every page edge
/// * `spacing_px` - Gap between neighbouring photos
pub fn compute_grid(
    page: PixelSize,
    item: PixelSize,
    margin_px: u32,
    spacing_px: u32,
) -> LayoutGrid {
    let available_w = page.width.saturating_sub(margin_px.saturating_mul(2)) as u64;
    let available_h = page.height.saturating_sub(margin_px.saturating_mul(2)) as u64;
    let spacing = spacing_px as u64;

    let columns = fit_count(available_w, item.width as u64, spacing);
    let rows = fit_count(available_h, item.height as u64, spacing);

    LayoutGrid::new(columns, rows)
}

fn fit_count(available: u64, item: u64, spacing: u64) -> usize {
    if available == 0 || item + spacing == 0 {
        return 0;
    }
    ((available + spacing) / (item + spacing)) as usize
}

// =============================================================================
// Resolved Geometry
// =============================================================================

/// Pixel geometry resolved once from [`GridOptions`].
///
/// Margins and spacing are converted from centimeters exactly once; every
/// page of a run shares this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    pub page: PixelSize,
    pub item: PixelSize,
    pub margin_px: u32,
    pub spacing_px: u32,
    pub grid: LayoutGrid,
    pub background: [u8; 3],
}

impl SheetGeometry {
    /// Resolve geometry without checking that anything fits
    pub fn new(options: &GridOptions) -> Self {
        let margin_px = options.margin_px();
        let spacing_px = options.spacing_px();
        let grid = compute_grid(options.page_size, options.item_size, margin_px, spacing_px);

        Self {
            page: options.page_size,
            item: options.item_size,
            margin_px,
            spacing_px,
            grid,
            background: options.background,
        }
    }

    /// Resolve geometry, rejecting layouts where no photo fits on a page
    pub fn resolve(options: &GridOptions) -> Result<Self> {
        options.validate()?;

        let geometry = Self::new(options);
        if geometry.grid.is_empty() {
            return Err(PhotoGridError::Config(format!(
                "A {}x{} px photo does not fit on a {}x{} px page with {} px margins \
                 ({} columns x {} rows)",
                geometry.item.width,
                geometry.item.height,
                geometry.page.width,
                geometry.page.height,
                geometry.margin_px,
                geometry.grid.columns,
                geometry.grid.rows,
            )));
        }

        Ok(geometry)
    }

    /// Top-left pixel of the `local_index`-th cell on a page
    pub fn cell_origin(&self, local_index: usize) -> (u32, u32) {
        let (row, col) = self.grid.cell_position(local_index);
        let x = self.margin_px + col as u32 * (self.item.width + self.spacing_px);
        let y = self.margin_px + row as u32 * (self.item.height + self.spacing_px);
        (x, y)
    }
}

// =============================================================================
// Tests
// =============================================================================
