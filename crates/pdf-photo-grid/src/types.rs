use image::RgbImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoGridError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("No image files (.jpg, .jpeg, .png) found under {}", .0.display())]
    NoImagesFound(PathBuf),
    #[error("None of the {attempted} image(s) could be processed")]
    NothingNormalized { attempted: usize },
    #[error("Image of {width}x{height} px is too small to crop")]
    DegenerateImage { width: u32, height: u32 },
    #[error("Processing {} took longer than {seconds}s", .path.display())]
    Timeout { path: PathBuf, seconds: u64 },
    #[error("No pages to write")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, PhotoGridError>;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are non-zero
    pub fn is_non_empty(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Column/row tiling applied identically to every output page.
///
/// Computed once per run; the last page uses the same grid even when
/// it is only partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGrid {
    pub columns: usize,
    pub rows: usize,
}

impl LayoutGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub fn items_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// A grid with no cells cannot hold anything
    pub fn is_empty(&self) -> bool {
        self.items_per_page() == 0
    }

    /// Number of pages needed for `item_count` items
    pub fn page_count(&self, item_count: usize) -> usize {
        match self.items_per_page() {
            0 => 0,
            per_page => item_count.div_ceil(per_page),
        }
    }

    /// Row-major (row, column) of the `local_index`-th cell on a page
    pub fn cell_position(&self, local_index: usize) -> (usize, usize) {
        (local_index / self.columns, local_index % self.columns)
    }
}

/// A rectangular region of a source image in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// One composed output page
#[derive(Debug, Clone)]
pub struct Page {
    /// Zero-based page number in document order
    pub index: usize,
    /// Page raster at the configured page size
    pub canvas: RgbImage,
    /// Number of photos pasted onto this page
    pub placed: usize,
}

/// A source file that could not be turned into a normalized photo
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub cause: String,
}

/// Result of normalizing a batch of files
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Normalized photos, in input path order
    pub images: Vec<RgbImage>,
    /// Files that were skipped, in input path order
    pub failures: Vec<ItemFailure>,
}

impl NormalizeReport {
    pub fn attempted(&self) -> usize {
        self.images.len() + self.failures.len()
    }
}

/// Layout summary for a given number of photos
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatistics {
    /// Number of photos to place
    pub images: usize,
    /// Columns per page
    pub columns: usize,
    /// Rows per page
    pub rows: usize,
    /// Photos per full page
    pub items_per_page: usize,
    /// Output page count
    pub pages: usize,
    /// Photos on the final page (0 when there are no pages)
    pub last_page_items: usize,
}
