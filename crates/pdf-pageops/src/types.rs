use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageOpsError {
    #[error("Document could not be read: {0}")]
    CorruptDocument(String),
    #[error("Invalid page specification: {0}")]
    InvalidPageSpecification(String),
    #[error("Page range {start}-{end} selects no pages of a {page_count}-page document")]
    EmptyRange {
        start: i64,
        end: i64,
        page_count: usize,
    },
    #[error("No input documents")]
    EmptyInput,
    #[error("Watermark has no content: {0}")]
    MissingWatermarkContent(&'static str),
    #[error("PDF operation failed: {0}")]
    Operation(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PageOpsError>;

/// Odd or even pages, counted 1-based the way readers number them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    Odd,
    Even,
}

/// Horizontal placement within a page box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical placement within a page box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Nine-point anchor used to place watermarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            Anchor::TopLeft | Anchor::MiddleLeft | Anchor::BottomLeft => HorizontalAlign::Left,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => HorizontalAlign::Center,
            Anchor::TopRight | Anchor::MiddleRight | Anchor::BottomRight => HorizontalAlign::Right,
        }
    }

    pub fn vertical(self) -> VerticalAlign {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => VerticalAlign::Top,
            Anchor::MiddleLeft | Anchor::Center | Anchor::MiddleRight => VerticalAlign::Middle,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => VerticalAlign::Bottom,
        }
    }

    /// Lower-left corner of a `width` × `height` box placed at this anchor.
    ///
    /// Edge anchors keep `margin` points between the box and the page edge;
    /// centered axes ignore the margin.
    pub fn origin(self, page: &PageBox, width: f32, height: f32, margin: f32) -> (f32, f32) {
        let x = match self.horizontal() {
            HorizontalAlign::Left => page.x + margin,
            HorizontalAlign::Center => page.x + (page.width - width) / 2.0,
            HorizontalAlign::Right => page.x + page.width - margin - width,
        };
        let y = match self.vertical() {
            VerticalAlign::Top => page.y + page.height - margin - height,
            VerticalAlign::Middle => page.y + (page.height - height) / 2.0,
            VerticalAlign::Bottom => page.y + margin,
        };
        (x, y)
    }
}

/// Where page numbers go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl From<NumberPosition> for Anchor {
    fn from(position: NumberPosition) -> Self {
        match position {
            NumberPosition::TopLeft => Anchor::TopLeft,
            NumberPosition::TopCenter => Anchor::TopCenter,
            NumberPosition::TopRight => Anchor::TopRight,
            NumberPosition::BottomLeft => Anchor::BottomLeft,
            NumberPosition::BottomCenter => Anchor::BottomCenter,
            NumberPosition::BottomRight => Anchor::BottomRight,
        }
    }
}

/// How a page number is rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// 1, 2, 3
    #[default]
    Arabic,
    /// i, ii, iii
    Roman,
    /// a, b, ... z, aa, ab
    Letter,
    /// Template where `{n}` is the number and `{total}` the page count
    Custom(String),
}

/// RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || PageOpsError::Config(format!("'{hex}' is not a #rrggbb color"));
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

/// How extracted pages are grouped into output documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtractMode {
    /// All selected pages in one document
    #[default]
    SingleCombined,
    /// One document per selected page
    OnePerPage,
    /// Consecutive groups of `size` selected pages
    Chunks { size: usize },
}

/// Compression strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
    Maximum,
}

/// Image re-encoding parameters derived from a [`CompressionLevel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    pub jpeg_quality: u8,
    /// Longest edge in pixels; larger images are downscaled
    pub max_image_dimension: Option<u32>,
}

impl CompressionLevel {
    pub fn profile(self) -> CompressionProfile {
        let (jpeg_quality, max_image_dimension) = match self {
            CompressionLevel::Low => (85, None),
            CompressionLevel::Medium => (70, None),
            CompressionLevel::High => (50, Some(2000)),
            CompressionLevel::Maximum => (30, Some(1200)),
        };
        CompressionProfile {
            jpeg_quality,
            max_image_dimension,
        }
    }
}

/// Discriminant of an [`crate::Operation`], used for naming and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Merge,
    Extract,
    Rotate,
    Watermark,
    PageNumbers,
    Metadata,
    Compress,
    Delete,
}

impl OperationKind {
    /// Short lowercase name, used for archive stems and log lines
    pub fn slug(self) -> &'static str {
        match self {
            OperationKind::Merge => "merge",
            OperationKind::Extract => "extract",
            OperationKind::Rotate => "rotate",
            OperationKind::Watermark => "watermark",
            OperationKind::PageNumbers => "page-numbers",
            OperationKind::Metadata => "metadata",
            OperationKind::Compress => "compress",
            OperationKind::Delete => "delete-pages",
        }
    }

    /// Whether the operation reads a page selection
    pub fn uses_selection(self) -> bool {
        matches!(
            self,
            OperationKind::Extract
                | OperationKind::Rotate
                | OperationKind::Watermark
                | OperationKind::Delete
        )
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OperationKind::Merge => "Merge",
            OperationKind::Extract => "Extract pages",
            OperationKind::Rotate => "Rotate",
            OperationKind::Watermark => "Watermark",
            OperationKind::PageNumbers => "Page numbers",
            OperationKind::Metadata => "Edit metadata",
            OperationKind::Compress => "Compress",
            OperationKind::Delete => "Remove pages",
        };
        f.write_str(label)
    }
}

/// Visible area of a page in PDF user space (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}
