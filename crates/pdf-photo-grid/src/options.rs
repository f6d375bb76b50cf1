use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How transparency is removed before cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlphaMode {
    /// Blend transparent pixels over the page background colour
    #[default]
    CompositeOnBackground,
    /// Drop the alpha channel and keep the underlying colour as-is
    Discard,
}

/// Encoding of the page rasters embedded in the PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageEncoding {
    /// JPEG (`DCTDecode`) at the given quality (1..=100)
    Jpeg { quality: u8 },
    /// Lossless RGB compressed with `FlateDecode`
    Flate,
}

impl Default for PageEncoding {
    fn default() -> Self {
        PageEncoding::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Photo grid configuration
///
/// Built once at startup and passed by reference to every stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    // Resolution
    pub dpi: u32,

    // Geometry
    pub page_size: PixelSize,
    pub item_size: PixelSize,
    pub margin_cm: f64,
    pub spacing_cm: f64,

    // Rendering
    pub background: [u8; 3],
    pub alpha_mode: AlphaMode,
    pub page_encoding: PageEncoding,

    // Output
    pub output_file_name: String,

    // Processing limits
    /// Seconds allowed per file; 0 disables the limit
    pub per_file_timeout_secs: u64,
    /// Files normalized at once; 1 processes strictly one after another
    pub max_parallel: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            page_size: A4_PAGE_PX,
            item_size: PHOTO_3X4_PX,
            margin_cm: DEFAULT_MARGIN_CM,
            spacing_cm: DEFAULT_SPACING_CM,
            background: WHITE,
            alpha_mode: AlphaMode::default(),
            page_encoding: PageEncoding::default(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
            per_file_timeout_secs: DEFAULT_PER_FILE_TIMEOUT_SECS,
            max_parallel: 1,
        }
    }
}

impl GridOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| PhotoGridError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PhotoGridError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Margin in whole pixels
    pub fn margin_px(&self) -> u32 {
        cm_to_px(self.margin_cm, self.dpi)
    }

    /// Inter-photo spacing in whole pixels
    pub fn spacing_px(&self) -> u32 {
        cm_to_px(self.spacing_cm, self.dpi)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(PhotoGridError::Config("DPI must be positive".to_string()));
        }

        for (name, value) in [("margin", self.margin_cm), ("spacing", self.spacing_cm)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PhotoGridError::Config(format!(
                    "{} must be a finite, non-negative length in cm (got {})",
                    name, value
                )));
            }
        }

        if !self.page_size.is_non_empty() {
            return Err(PhotoGridError::Config(
                "Page size must be non-zero in both dimensions".to_string(),
            ));
        }

        if !self.item_size.is_non_empty() {
            return Err(PhotoGridError::Config(
                "Photo size must be non-zero in both dimensions".to_string(),
            ));
        }

        // Width:height must be exactly 3:4; the crop reuses this ratio
        let PixelSize { width, height } = self.item_size;
        if width as u64 * 4 != height as u64 * 3 {
            return Err(PhotoGridError::Config(format!(
                "Photo size {}x{} is not a 3:4 portrait ratio",
                width, height
            )));
        }

        if let PageEncoding::Jpeg { quality } = self.page_encoding {
            if !(1..=100).contains(&quality) {
                return Err(PhotoGridError::Config(format!(
                    "JPEG quality must be between 1 and 100 (got {})",
                    quality
                )));
            }
        }

        if self.max_parallel == 0 {
            return Err(PhotoGridError::Config(
                "max_parallel must be at least 1".to_string(),
            ));
        }

        if self.output_file_name.is_empty()
            || self.output_file_name.contains(['/', '\\'])
        {
            return Err(PhotoGridError::Config(format!(
                "Output file name must be a bare file name (got {:?})",
                self.output_file_name
            )));
        }

        Ok(())
    }
}
