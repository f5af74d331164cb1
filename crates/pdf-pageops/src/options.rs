use crate::constants::MAX_START_NUMBER;
use crate::selector::PageSpec;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A page operation together with its options.
///
/// This is the unit a run executes and what a JSON job file contains.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "operation", rename_all = "snake_case")
)]
pub enum Operation {
    Merge(MergeOptions),
    Extract(ExtractOptions),
    Rotate(RotateOptions),
    Watermark(WatermarkOptions),
    PageNumbers(PageNumberOptions),
    Metadata(MetadataOptions),
    Compress(CompressionOptions),
    Delete(DeleteOptions),
}

/// Merge takes every page of every input, in order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeOptions {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ExtractOptions {
    pub pages: PageSpec,
    pub mode: ExtractMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RotateOptions {
    pub pages: PageSpec,
    /// Absolute rotation, any multiple of 90
    pub angle_degrees: i32,
}

impl Default for RotateOptions {
    fn default() -> Self {
        Self {
            pages: PageSpec::All,
            angle_degrees: 90,
        }
    }
}

/// What a watermark draws
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WatermarkContent {
    Text {
        text: String,
        font_size: f32,
        color: Rgb,
    },
    /// Encoded PNG or JPEG bytes, drawn at `scale` points per pixel
    Image { data: Vec<u8>, scale: f32 },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct WatermarkOptions {
    pub content: WatermarkContent,
    pub opacity: f32,
    /// Counter-clockwise, around the center of the mark
    pub rotation_degrees: f32,
    pub position: Anchor,
    pub margin: f32,
    pub pages: PageSpec,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            content: WatermarkContent::Text {
                text: "CONFIDENTIAL".to_string(),
                font_size: 48.0,
                color: Rgb::GRAY,
            },
            opacity: 0.3,
            rotation_degrees: 45.0,
            position: Anchor::Center,
            margin: 36.0,
            pages: PageSpec::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PageNumberOptions {
    pub position: NumberPosition,
    pub format: NumberFormat,
    pub start_number: i64,
    pub skip_first: bool,
    pub skip_last: bool,
    pub prefix: String,
    pub suffix: String,
    pub font_size: f32,
    pub color: Rgb,
    pub margin: f32,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            position: NumberPosition::BottomCenter,
            format: NumberFormat::Arabic,
            start_number: 1,
            skip_first: false,
            skip_last: false,
            prefix: String::new(),
            suffix: String::new(),
            font_size: 12.0,
            color: Rgb::BLACK,
            margin: 30.0,
        }
    }
}

/// Fields left as `None` are not touched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MetadataOptions {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Comma separated
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

impl MetadataOptions {
    /// Keywords split on commas, trimmed, empties dropped
    pub fn keyword_list(&self) -> Option<Vec<String>> {
        self.keywords.as_ref().map(|keywords| {
            keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CompressionOptions {
    pub level: CompressionLevel,
    pub remove_metadata: bool,
    pub optimize_images: bool,
    pub remove_annotations: bool,
    pub remove_bookmarks: bool,
    pub remove_javascript: bool,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            level: CompressionLevel::Medium,
            remove_metadata: false,
            optimize_images: true,
            remove_annotations: false,
            remove_bookmarks: false,
            remove_javascript: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DeleteOptions {
    pub pages: PageSpec,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Merge(_) => OperationKind::Merge,
            Operation::Extract(_) => OperationKind::Extract,
            Operation::Rotate(_) => OperationKind::Rotate,
            Operation::Watermark(_) => OperationKind::Watermark,
            Operation::PageNumbers(_) => OperationKind::PageNumbers,
            Operation::Metadata(_) => OperationKind::Metadata,
            Operation::Compress(_) => OperationKind::Compress,
            Operation::Delete(_) => OperationKind::Delete,
        }
    }

    /// Page selection this operation reads, if it takes one
    pub fn page_spec(&self) -> Option<&PageSpec> {
        match self {
            Operation::Extract(o) => Some(&o.pages),
            Operation::Rotate(o) => Some(&o.pages),
            Operation::Watermark(o) => Some(&o.pages),
            Operation::Delete(o) => Some(&o.pages),
            Operation::Merge(_)
            | Operation::PageNumbers(_)
            | Operation::Metadata(_)
            | Operation::Compress(_) => None,
        }
    }

    /// Resolve the page selection against the first document's page count
    pub fn resolve_selection(&self, page_count: usize) -> Result<Option<Vec<usize>>> {
        self.page_spec()
            .map(|spec| spec.resolve(page_count))
            .transpose()
    }

    /// Load an operation from a JSON job file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let operation = serde_json::from_slice(&bytes)
            .map_err(|e| PageOpsError::Config(format!("Failed to parse job: {}", e)))?;
        Ok(operation)
    }

    /// Save the operation as a JSON job file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PageOpsError::Config(format!("Failed to serialize job: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Merge(_) | Operation::Metadata(_) | Operation::Compress(_) => Ok(()),
            Operation::Delete(_) => Ok(()),
            Operation::Extract(o) => match o.mode {
                ExtractMode::Chunks { size: 0 } => Err(PageOpsError::Config(
                    "Chunk size must be at least 1".to_string(),
                )),
                _ => Ok(()),
            },
            Operation::Rotate(o) => {
                if o.angle_degrees % 90 != 0 {
                    return Err(PageOpsError::Config(format!(
                        "Rotation must be a multiple of 90 degrees, got {}",
                        o.angle_degrees
                    )));
                }
                Ok(())
            }
            Operation::Watermark(o) => o.validate(),
            Operation::PageNumbers(o) => o.validate(),
        }
    }
}

impl WatermarkOptions {
    pub fn validate(&self) -> Result<()> {
        match &self.content {
            WatermarkContent::Text {
                text,
                font_size,
                color,
            } => {
                if text.trim().is_empty() {
                    return Err(PageOpsError::MissingWatermarkContent("text is empty"));
                }
                if *font_size <= 0.0 {
                    return Err(PageOpsError::Config(
                        "Watermark font size must be positive".to_string(),
                    ));
                }
                if !color.is_valid() {
                    return Err(PageOpsError::Config(
                        "Color components must be between 0 and 1".to_string(),
                    ));
                }
            }
            WatermarkContent::Image { data, scale } => {
                if data.is_empty() {
                    return Err(PageOpsError::MissingWatermarkContent("image data is empty"));
                }
                if *scale <= 0.0 {
                    return Err(PageOpsError::Config(
                        "Watermark image scale must be positive".to_string(),
                    ));
                }
            }
        }

        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PageOpsError::Config(format!(
                "Opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }
        if self.margin < 0.0 {
            return Err(PageOpsError::Config("Margin cannot be negative".to_string()));
        }
        Ok(())
    }
}

impl PageNumberOptions {
    pub fn validate(&self) -> Result<()> {
        if self.font_size <= 0.0 {
            return Err(PageOpsError::Config(
                "Page number font size must be positive".to_string(),
            ));
        }
        if self.margin < 0.0 {
            return Err(PageOpsError::Config("Margin cannot be negative".to_string()));
        }
        if !self.color.is_valid() {
            return Err(PageOpsError::Config(
                "Color components must be between 0 and 1".to_string(),
            ));
        }
        if self.start_number.unsigned_abs() > MAX_START_NUMBER as u64 {
            return Err(PageOpsError::Config(format!(
                "Start number must be between -{MAX_START_NUMBER} and {MAX_START_NUMBER}, got {}",
                self.start_number
            )));
        }
        match &self.format {
            NumberFormat::Custom(template) if !template.contains("{n}") => {
                Err(PageOpsError::Config(format!(
                    "Custom page number template '{template}' has no {{n}} placeholder"
                )))
            }
            _ => Ok(()),
        }
    }
}
