//! Shared constants for photo grid sheets
//!
//! All pixel geometry derives from a single print resolution. Changing the
//! DPI means recomputing every pixel size below together.

use crate::types::PixelSize;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Print resolution in dots per inch
pub const DEFAULT_DPI: u32 = 300;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert a physical length in centimeters to whole pixels at `dpi`.
///
/// Truncates toward zero, so a length never rounds up into an extra pixel.
#[inline]
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    (cm * dpi as f64 / CM_PER_INCH) as u32
}

/// Convert a pixel count at `dpi` to PDF points
#[inline]
pub fn px_to_pt(px: u32, dpi: u32) -> f32 {
    (px as f64 * POINTS_PER_INCH / dpi as f64) as f32
}

// =============================================================================
// Default Geometry (300 DPI)
// =============================================================================

/// A4 portrait page (210mm × 297mm)
pub const A4_PAGE_PX: PixelSize = PixelSize::new(2480, 3508);

/// 3cm × 4cm portrait photo
pub const PHOTO_3X4_PX: PixelSize = PixelSize::new(354, 472);

/// Margin from each page edge
pub const DEFAULT_MARGIN_CM: f64 = 0.5;

/// Gap between neighbouring photos, both directions
pub const DEFAULT_SPACING_CM: f64 = 0.2;

/// Page background
pub const WHITE: [u8; 3] = [255, 255, 255];

// =============================================================================
// Files
// =============================================================================

/// Lowercase extensions picked up by discovery
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Name of the document written inside the scanned directory
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "Foto_3x4_Final.pdf";

/// Default upper bound on decoding and normalizing one file
pub const DEFAULT_PER_FILE_TIMEOUT_SECS: u64 = 30;

/// Default JPEG quality for embedded page images
pub const DEFAULT_JPEG_QUALITY: u8 = 92;
