use super::{ProgressSink, checkpoint};
use crate::codec::{DrawResources, TextStyle, draw_text, page_box, page_ids, text_width};
use crate::options::PageNumberOptions;
use crate::types::*;
use lopdf::Document;

/// Stamp a page number label on every page that isn't skipped
pub fn add_page_numbers(
    mut doc: Document,
    options: &PageNumberOptions,
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    options.validate()?;

    let pages = page_ids(&doc);
    let labels = options.labels(pages.len());
    let anchor = Anchor::from(options.position);
    let style = TextStyle {
        font_size: options.font_size,
        color: options.color,
        opacity: 1.0,
        rotation_degrees: 0.0,
    };
    let mut resources = DrawResources::default();
    let total = pages.len();
    let mut numbered = 0;

    for (done, (page_id, label)) in pages.into_iter().zip(labels).enumerate() {
        if let Some(label) = label {
            let bounds = page_box(&doc, page_id);
            let width = text_width(&label, options.font_size);
            let origin = anchor.origin(&bounds, width, options.font_size, options.margin);
            draw_text(&mut doc, page_id, &mut resources, &label, origin, &style)?;
            numbered += 1;
        }
        checkpoint(progress, done + 1, total)?;
    }

    log::info!("Numbered {} of {} pages", numbered, total);
    Ok(doc)
}
