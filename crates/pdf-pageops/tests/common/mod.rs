#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

/// Letter-sized pages with empty content
pub fn create_test_pdf(num_pages: usize) -> Document {
    build_pdf(num_pages, |_| b"q Q".to_vec())
}

/// Pages whose content shows `{label}{n}` (1-based), so page identity can
/// be checked after copying
pub fn create_marked_pdf(label: &str, num_pages: usize) -> Document {
    build_pdf(num_pages, |n| format!("BT ({}{}) Tj ET", label, n + 1).into_bytes())
}

fn build_pdf(num_pages: usize, content: impl Fn(usize) -> Vec<u8>) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for n in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content(n)));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(612, 792)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Two pages that inherit MediaBox, Resources and Rotate from the tree root
pub fn create_inheriting_pdf() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));

    let mut kids = Vec::new();
    for n in 0..2 {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            format!("BT /F1 10 Tf (I{}) Tj ET", n + 1).into_bytes(),
        ));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(2)),
        ("MediaBox", media_box(420, 595)),
        ("Rotate", Object::Integer(90)),
        (
            "Resources",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Font",
                Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
            )])),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Add an image XObject to the first page's resources
pub fn attach_image(doc: &mut Document, image: Stream) -> ObjectId {
    let image_id = doc.add_object(image);
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary_mut(page_id).unwrap();
    page.set(
        "Resources",
        Object::Dictionary(Dictionary::from_iter(vec![(
            "XObject",
            Object::Dictionary(Dictionary::from_iter(vec![("Im1", Object::Reference(image_id))])),
        )])),
    );
    image_id
}

/// JPEG image XObject holding `bytes`
pub fn jpeg_stream(bytes: Vec<u8>, width: u32, height: u32) -> Stream {
    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(width as i64)),
        ("Height", Object::Integer(height as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"DCTDecode".to_vec())),
    ]);
    let mut stream = Stream::new(dict, bytes);
    stream.allows_compression = false;
    stream
}

/// Busy RGB test pattern encoded as a high quality JPEG
pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pattern = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 7 + y * 3) % 256) as u8,
            ((x * y) % 256) as u8,
            ((x ^ y) * 5 % 256) as u8,
        ])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 100)
        .encode_image(&pattern)
        .unwrap();
    bytes
}

/// 8×8 four-component (Adobe CMYK) baseline JPEG, every block flat
pub const CMYK_JPEG: [u8; 175] = [
    0xFF, 0xD8, 0xFF, 0xEE, 0x00, 0x0E, 0x41, 0x64, 0x6F, 0x62, 0x65, 0x00,
    0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x08, 0x00, 0x08,
    0x04, 0x01, 0x11, 0x00, 0x02, 0x11, 0x00, 0x03, 0x11, 0x00, 0x04, 0x11,
    0x00, 0xFF, 0xC4, 0x00, 0x15, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0xFF, 0xC4, 0x00, 0x15, 0x10, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xFF,
    0xDA, 0x00, 0x0E, 0x04, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00,
    0x00, 0x3F, 0x00, 0x00, 0x00, 0xFF, 0xD9,
];

/// Small PNG with a transparent corner
pub fn sample_png() -> Vec<u8> {
    let mut pixels = image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 30, 30, 255]));
    pixels.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Decoded content of the page at a zero-based index
pub fn page_content(doc: &Document, index: usize) -> Content {
    let page_id = page_ids(doc)[index];
    let bytes = doc.get_page_content(page_id).unwrap();
    Content::decode(&bytes).unwrap()
}

/// Strings shown with `Tj` on the page at a zero-based index
pub fn shown_text(doc: &Document, index: usize) -> Vec<String> {
    page_content(doc, index)
        .operations
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

/// Operands of the first operator named `operator` on a page
pub fn first_operands(doc: &Document, index: usize, operator: &str) -> Option<Vec<Object>> {
    page_content(doc, index)
        .operations
        .into_iter()
        .find(|op| op.operator == operator)
        .map(|op| op.operands)
}

pub fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {:?}", other),
    }
}

pub fn literal(text: &str) -> Object {
    Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
}

/// Save and reload, the way a caller would receive an output
pub fn round_trip(doc: Document) -> Document {
    let bytes = pdf_pageops::save_document(doc, &pdf_pageops::SaveOptions::default()).unwrap();
    pdf_pageops::load_document(&bytes).unwrap()
}
