//! Batch conversion of photographs into 3×4 portrait thumbnails packed onto
//! print-ready PDF pages.

pub mod compose;
pub mod constants;
mod discover;
pub mod document;
pub mod layout;
pub mod normalize;
mod options;
mod paginate;
mod pipeline;
mod stats;
mod types;

pub use compose::compose_page;
pub use discover::{find_images, is_supported_image};
pub use document::{assemble, save_pdf};
pub use layout::{SheetGeometry, compute_grid};
pub use normalize::{crop_rect, load_and_normalize, normalize_all, normalize_image};
pub use options::*;
pub use paginate::paginate;
pub use pipeline::{SheetReport, build_photo_sheet, preview_layout};
pub use stats::calculate_statistics;
pub use types::*;
