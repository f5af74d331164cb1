use super::{ProgressSink, checkpoint};
use crate::codec::metadata::remove_metadata;
use crate::codec::page::resolve;
use crate::codec::page_ids;
use crate::options::CompressionOptions;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Shrink a document: strip the requested extras and re-encode JPEG images.
///
/// Unreferenced objects are pruned and streams compressed when the result
/// is saved (see [`crate::codec::SaveOptions::thorough`]).
pub fn compress(
    mut doc: Document,
    options: &CompressionOptions,
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    if options.remove_metadata {
        remove_metadata(&mut doc)?;
    }
    if options.remove_annotations {
        for page_id in page_ids(&doc) {
            doc.get_dictionary_mut(page_id)?.remove(b"Annots");
        }
    }
    if options.remove_bookmarks {
        remove_bookmarks(&mut doc)?;
    }
    if options.remove_javascript {
        remove_javascript(&mut doc)?;
    }

    let images = if options.optimize_images {
        jpeg_images(&doc)
    } else {
        Vec::new()
    };
    let profile = options.level.profile();
    let total = images.len().max(1);
    let mut optimized = 0;

    checkpoint(progress, 0, total)?;
    for (done, id) in images.iter().enumerate() {
        if optimize_image(&mut doc, *id, &profile)? {
            optimized += 1;
        }
        checkpoint(progress, done + 1, total)?;
    }
    checkpoint(progress, total, total)?;

    log::info!(
        "Compression pass re-encoded {} of {} images at quality {}",
        optimized,
        images.len(),
        profile.jpeg_quality
    );
    Ok(doc)
}

fn remove_bookmarks(doc: &mut Document) -> Result<()> {
    let catalog = doc.catalog_mut()?;
    catalog.remove(b"Outlines");
    let shows_outlines = matches!(
        catalog.get(b"PageMode").and_then(Object::as_name),
        Ok(mode) if mode == b"UseOutlines"
    );
    if shows_outlines {
        catalog.set("PageMode", Object::Name(b"UseNone".to_vec()));
    }
    Ok(())
}

fn is_javascript_action(doc: &Document, action: &Object) -> bool {
    match resolve(doc, action) {
        Object::Dictionary(dict) => matches!(
            dict.get(b"S").and_then(Object::as_name),
            Ok(kind) if kind == b"JavaScript"
        ),
        _ => false,
    }
}

/// Drop document-level scripts, scripted open actions and additional
/// actions on the catalog, pages and annotations
fn remove_javascript(doc: &mut Document) -> Result<()> {
    let open_action_is_script = doc
        .catalog()?
        .get(b"OpenAction")
        .map(|action| is_javascript_action(doc, action))
        .unwrap_or(false);

    let names_ref = match doc.catalog()?.get(b"Names") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    {
        let catalog = doc.catalog_mut()?;
        catalog.remove(b"AA");
        if open_action_is_script {
            catalog.remove(b"OpenAction");
        }
        if let Ok(Object::Dictionary(names)) = catalog.get_mut(b"Names") {
            names.remove(b"JavaScript");
        }
    }
    if let Some(id) = names_ref {
        if let Ok(names) = doc.get_dictionary_mut(id) {
            names.remove(b"JavaScript");
        }
    }

    for page_id in page_ids(doc) {
        doc.get_dictionary_mut(page_id)?.remove(b"AA");

        let annotation_ids: Vec<ObjectId> = match doc.get_dictionary(page_id)?.get(b"Annots") {
            Ok(obj) => match resolve(doc, obj) {
                Object::Array(items) => items.iter().filter_map(|a| a.as_reference().ok()).collect(),
                _ => Vec::new(),
            },
            Err(_) => Vec::new(),
        };
        for annotation_id in annotation_ids {
            let scripted = match doc.get_dictionary(annotation_id) {
                Ok(annotation) => annotation
                    .get(b"A")
                    .map(|action| is_javascript_action(doc, action))
                    .unwrap_or(false),
                Err(_) => false,
            };
            if let Ok(annotation) = doc.get_dictionary_mut(annotation_id) {
                annotation.remove(b"AA");
                if scripted {
                    annotation.remove(b"A");
                }
            }
        }
    }
    Ok(())
}

enum JpegColor {
    Rgb,
    Gray,
}

/// Image XObjects stored as plain 8-bit RGB or grayscale JPEG
fn jpeg_images(doc: &Document) -> Vec<ObjectId> {
    doc.objects
        .iter()
        .filter_map(|(id, obj)| match obj {
            Object::Stream(stream) if jpeg_color(doc, stream).is_some() => Some(*id),
            _ => None,
        })
        .collect()
}

/// A name entry, or the single name of a one-element array
fn single_name<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::Name(name) => Some(name),
        Object::Array(items) if items.len() == 1 => items[0].as_name().ok(),
        _ => None,
    }
}

fn jpeg_color(doc: &Document, stream: &Stream) -> Option<JpegColor> {
    let dict = &stream.dict;
    if single_name(doc, dict, b"Subtype")? != b"Image"
        || single_name(doc, dict, b"Filter")? != b"DCTDecode"
    {
        return None;
    }
    if dict.has(b"Decode") || dict.has(b"ImageMask") || dict.has(b"SMaskInData") {
        return None;
    }
    let bits = dict.get(b"BitsPerComponent").and_then(Object::as_i64).ok()?;
    if bits != 8 {
        return None;
    }
    match single_name(doc, dict, b"ColorSpace")? {
        b"DeviceRGB" => Some(JpegColor::Rgb),
        b"DeviceGray" => Some(JpegColor::Gray),
        _ => None,
    }
}

/// Re-encode one JPEG image; keeps the original unless the new one is smaller
fn optimize_image(doc: &mut Document, id: ObjectId, profile: &CompressionProfile) -> Result<bool> {
    let (original, color) = match doc.get_object(id) {
        Ok(Object::Stream(stream)) => match jpeg_color(doc, stream) {
            Some(color) => (stream.content.clone(), color),
            None => return Ok(false),
        },
        _ => return Ok(false),
    };

    let decoded = match image::load_from_memory_with_format(&original, ImageFormat::Jpeg) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("Skipping undecodable image {:?}: {}", id, e);
            return Ok(false);
        }
    };

    let resized = match profile.max_image_dimension {
        Some(max) if decoded.width().max(decoded.height()) > max => {
            decoded.resize(max, max, FilterType::Triangle)
        }
        _ => decoded,
    };

    let mut encoded = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut encoded, profile.jpeg_quality);
        match color {
            JpegColor::Rgb => encoder.encode_image(&resized.to_rgb8())?,
            JpegColor::Gray => encoder.encode_image(&resized.to_luma8())?,
        }
    }

    if encoded.len() >= original.len() {
        return Ok(false);
    }

    log::debug!(
        "Image {:?}: {} -> {} bytes ({}x{})",
        id,
        original.len(),
        encoded.len(),
        resized.width(),
        resized.height()
    );
    let stream = doc.get_object_mut(id)?.as_stream_mut()?;
    stream.dict.set("Width", resized.width() as i64);
    stream.dict.set("Height", resized.height() as i64);
    stream.dict.remove(b"DecodeParms");
    stream.set_content(encoded);
    Ok(true)
}
