use super::{ProgressSink, checkpoint};
use crate::codec::{DrawResources, EmbeddedImage, TextStyle, draw_image, draw_text, embed_image, page_box, page_ids, text_width};
use crate::options::{WatermarkContent, WatermarkOptions};
use crate::types::*;
use lopdf::Document;

enum Mark<'a> {
    Text { text: &'a str, style: TextStyle },
    Image { image: EmbeddedImage, size: (f32, f32) },
}

/// Draw a text or image watermark on each selected page
pub fn watermark(
    mut doc: Document,
    selection: &[usize],
    options: &WatermarkOptions,
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    options.validate()?;

    let mark = match &options.content {
        WatermarkContent::Text {
            text,
            font_size,
            color,
        } => Mark::Text {
            text,
            style: TextStyle {
                font_size: *font_size,
                color: *color,
                opacity: options.opacity,
                rotation_degrees: options.rotation_degrees,
            },
        },
        WatermarkContent::Image { data, scale } => {
            let image = embed_image(&mut doc, data)?;
            let size = (image.width as f32 * scale, image.height as f32 * scale);
            Mark::Image { image, size }
        }
    };

    let pages = page_ids(&doc);
    let total = selection.len();
    let mut resources = DrawResources::default();

    for (done, &index) in selection.iter().enumerate() {
        let page_id = *pages.get(index).ok_or_else(|| {
            PageOpsError::Operation(format!("cannot watermark missing page {}", index + 1))
        })?;
        let bounds = page_box(&doc, page_id);

        match &mark {
            Mark::Text { text, style } => {
                let width = text_width(text, style.font_size);
                let origin = options
                    .position
                    .origin(&bounds, width, style.font_size, options.margin);
                draw_text(&mut doc, page_id, &mut resources, text, origin, style)?;
            }
            Mark::Image { image, size } => {
                let origin = options.position.origin(&bounds, size.0, size.1, options.margin);
                draw_image(
                    &mut doc,
                    page_id,
                    &mut resources,
                    image,
                    origin,
                    *size,
                    options.opacity,
                    options.rotation_degrees,
                )?;
            }
        }
        checkpoint(progress, done + 1, total)?;
    }

    log::info!("Watermarked {} pages", total);
    Ok(doc)
}
