use pdf_pageops::{OperationKind, OutputLabel};
use std::path::Path;

/// Name an output after the operation and the source it came from.
///
/// `original` may be a path; only its final component is used. Page
/// numbers in names are 1-based.
pub fn output_filename(kind: OperationKind, original: &str, label: &OutputLabel) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("document.pdf");

    match label {
        OutputLabel::Page(index) => format!("page-{}-{}", index + 1, name),
        OutputLabel::Pages { first, last } => format!("pages-{}-{}-{}", first + 1, last + 1, name),
        OutputLabel::Whole => {
            let prefix = match kind {
                OperationKind::Merge => "merged",
                OperationKind::Extract => "extracted-pages",
                OperationKind::Rotate => "rotated",
                OperationKind::Watermark => "watermarked",
                OperationKind::PageNumbers => "numbered",
                OperationKind::Metadata => "updated-metadata",
                OperationKind::Compress => "compressed",
                OperationKind::Delete => "removed-pages",
            };
            format!("{prefix}-{name}")
        }
    }
}
