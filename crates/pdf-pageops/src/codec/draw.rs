//! Drawing text and images onto existing pages
//!
//! Text uses the standard Helvetica face with WinAnsi encoding, so nothing
//! has to be embedded. Characters outside that encoding are drawn as `?`.

use super::page::{add_page_resource, append_content};
use crate::constants::*;
use crate::types::*;
use image::{DynamicImage, GenericImageView, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::HashMap;

/// Width of `text` in points when set in Helvetica at `font_size`
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 0x20) as usize] as u32,
            code @ 0xA0..=0xFF => HELVETICA_LATIN1_WIDTHS[(code - 0xA0) as usize] as u32,
            _ => HELVETICA_DEFAULT_WIDTH as u32,
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// Encode text for a WinAnsi font. Latin-1 characters map directly.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Objects shared by every page drawn on during one operation, so the font
/// and each opacity level are written to the document once.
#[derive(Debug, Default)]
pub struct DrawResources {
    font: Option<ObjectId>,
    alpha_states: HashMap<u32, ObjectId>,
}

impl DrawResources {
    fn font(&mut self, doc: &mut Document) -> ObjectId {
        *self.font.get_or_insert_with(|| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            })
        })
    }

    fn alpha_state(&mut self, doc: &mut Document, opacity: f32) -> ObjectId {
        let key = (opacity.clamp(0.0, 1.0) * 1000.0).round() as u32;
        *self.alpha_states.entry(key).or_insert_with(|| {
            let alpha = key as f32 / 1000.0;
            doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => alpha,
                "CA" => alpha,
            })
        })
    }
}

/// Appearance of drawn text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Rgb,
    pub opacity: f32,
    /// Counter-clockwise, around the center of the text box
    pub rotation_degrees: f32,
}

/// An image written into a document, ready to be drawn on its pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// Matrix placing a `width` × `height` box whose unrotated lower-left
/// corner is `origin`, rotated around its own center.
fn placement_matrix(origin: (f32, f32), width: f32, height: f32, rotation_degrees: f32) -> [f32; 6] {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let (cx, cy) = (origin.0 + width / 2.0, origin.1 + height / 2.0);
    let tx = cx - (width / 2.0 * cos - height / 2.0 * sin);
    let ty = cy - (width / 2.0 * sin + height / 2.0 * cos);
    [cos, sin, -sin, cos, tx, ty].map(round4)
}

fn matrix_operands(matrix: [f32; 6]) -> Vec<Object> {
    matrix.into_iter().map(Object::Real).collect()
}

/// Draw a single line of text on a page.
///
/// `origin` is the lower-left corner of the text box before rotation; the
/// box is as wide as the measured text and `font_size` tall.
pub fn draw_text(
    doc: &mut Document,
    page_id: ObjectId,
    resources: &mut DrawResources,
    text: &str,
    origin: (f32, f32),
    style: &TextStyle,
) -> Result<()> {
    let font_id = resources.font(doc);
    let font_name = add_page_resource(doc, page_id, "Font", FONT_RESOURCE_PREFIX, font_id)?;

    let mut operations = vec![Operation::new("q", vec![])];
    if style.opacity < 1.0 {
        let state_id = resources.alpha_state(doc, style.opacity);
        let state_name = add_page_resource(doc, page_id, "ExtGState", ALPHA_STATE_PREFIX, state_id)?;
        operations.push(Operation::new("gs", vec![Object::Name(state_name.into_bytes())]));
    }

    let width = text_width(text, style.font_size);
    let matrix = placement_matrix(origin, width, style.font_size, style.rotation_degrees);
    let Rgb { r, g, b } = style.color;

    operations.extend([
        Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(font_name.into_bytes()), Object::Real(style.font_size)],
        ),
        Operation::new("Tm", matrix_operands(matrix)),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]);

    let content = Content { operations }.encode()?;
    append_content(doc, page_id, content)
}

/// Number of color components declared by a JPEG's start-of-frame header
pub fn jpeg_component_count(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // Fill byte before a marker
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            return data.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}

/// Decode PNG/JPEG bytes and write them into the document as an image
/// XObject. Alpha becomes a soft mask. Gray and RGB JPEGs are embedded
/// as-is; other JPEGs (CMYK, for one) are re-encoded from the decoded pixels.
pub fn embed_image(doc: &mut Document, data: &[u8]) -> Result<EmbeddedImage> {
    let format = image::guess_format(data)?;
    let decoded = image::load_from_memory(data)?;
    let (width, height) = decoded.dimensions();

    let base = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "BitsPerComponent" => 8,
    };

    let passthrough = match (format, &decoded) {
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(_)) => {
            (jpeg_component_count(data) == Some(1)).then_some("DeviceGray")
        }
        (ImageFormat::Jpeg, DynamicImage::ImageRgb8(_)) => {
            (jpeg_component_count(data) == Some(3)).then_some("DeviceRGB")
        }
        _ => None,
    };

    let id = match passthrough {
        Some(color_space) => {
            let mut dict = base;
            dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            let mut stream = Stream::new(dict, data.to_vec());
            stream.allows_compression = false;
            doc.add_object(stream)
        }
        None => {
            let mut dict = base;
            dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
            if decoded.color().has_alpha() {
                let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
                let mask_id = doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width as i64,
                        "Height" => height as i64,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    alpha,
                ));
                dict.set("SMask", Object::Reference(mask_id));
            }
            doc.add_object(Stream::new(dict, decoded.to_rgb8().into_raw()))
        }
    };

    Ok(EmbeddedImage { id, width, height })
}

/// Draw an embedded image scaled to `size` points, rotated around its center
#[allow(clippy::too_many_arguments)]
pub fn draw_image(
    doc: &mut Document,
    page_id: ObjectId,
    resources: &mut DrawResources,
    image: &EmbeddedImage,
    origin: (f32, f32),
    size: (f32, f32),
    opacity: f32,
    rotation_degrees: f32,
) -> Result<()> {
    let image_name = add_page_resource(doc, page_id, "XObject", IMAGE_RESOURCE_PREFIX, image.id)?;

    let mut operations = vec![Operation::new("q", vec![])];
    if opacity < 1.0 {
        let state_id = resources.alpha_state(doc, opacity);
        let state_name = add_page_resource(doc, page_id, "ExtGState", ALPHA_STATE_PREFIX, state_id)?;
        operations.push(Operation::new("gs", vec![Object::Name(state_name.into_bytes())]));
    }

    // Unit square scaled to the image size, then placed.
    let [a, b, c, d, e, f] = placement_matrix(origin, size.0, size.1, rotation_degrees);
    let matrix = [a * size.0, b * size.0, c * size.1, d * size.1, e, f].map(round4);

    operations.extend([
        Operation::new("cm", matrix_operands(matrix)),
        Operation::new("Do", vec![Object::Name(image_name.into_bytes())]),
        Operation::new("Q", vec![]),
    ]);

    let content = Content { operations }.encode()?;
    append_content(doc, page_id, content)
}
