//! Shared constants for page operations
//!
//! Page geometry defaults, font metrics for the built-in Helvetica face and
//! the progress milestones used when reporting a run.

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// Limit when walking `/Parent` chains, guards against cyclic page trees
pub const MAX_PAGE_TREE_DEPTH: usize = 64;

// =============================================================================
// Resource Names
// =============================================================================

/// Prefix for the Helvetica font resource we add to pages
pub const FONT_RESOURCE_PREFIX: &str = "PgOpsF";

/// Prefix for transparency graphics states
pub const ALPHA_STATE_PREFIX: &str = "PgOpsGS";

/// Prefix for embedded watermark images
pub const IMAGE_RESOURCE_PREFIX: &str = "PgOpsIm";

// =============================================================================
// Page Numbering
// =============================================================================

/// Largest magnitude accepted for the first page number
pub const MAX_START_NUMBER: i64 = 1_000_000;

/// Largest value written as a Roman numeral; larger ones use Arabic digits
pub const MAX_ROMAN: i64 = 3999;

// =============================================================================
// Helvetica Metrics
// =============================================================================

/// Glyph advance used for characters without a WinAnsi glyph
pub const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126
pub const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica advance widths for WinAnsi 0xA0..=0xFF (Latin-1)
pub const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

// =============================================================================
// Progress Milestones
// =============================================================================

/// Progress once every source document is loaded
pub const PROGRESS_LOADED: u8 = 20;

/// Progress once the operation has visited every page
pub const PROGRESS_PROCESSED: u8 = 80;

/// Progress of a finished run
pub const PROGRESS_DONE: u8 = 100;
