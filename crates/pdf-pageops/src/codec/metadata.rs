//! Document information dictionary (`/Info`)

use crate::types::*;
use chrono::{DateTime, Offset, TimeZone};
use lopdf::{Dictionary, Document, Object, StringFormat};

/// The standard text fields of `/Info`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

/// Read `/Info`; missing or unreadable fields come back as `None`
pub fn read_metadata(doc: &Document) -> DocumentMetadata {
    let Some(info) = info_dict(doc) else {
        return DocumentMetadata::default();
    };
    let field = |key: &[u8]| -> Option<String> {
        match info.get(key).ok().map(|obj| super::page::resolve(doc, obj)) {
            Some(Object::String(bytes, _)) => Some(decode_text_string(bytes)),
            _ => None,
        }
    };
    DocumentMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        keywords: field(b"Keywords"),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
        creation_date: field(b"CreationDate"),
        modification_date: field(b"ModDate"),
    }
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// The document's `/Info` dictionary, created when missing
pub fn info_dict_mut(doc: &mut Document) -> Result<&mut Dictionary> {
    let existing = doc.trailer.get(b"Info").ok().cloned();
    let info_id = match existing {
        Some(Object::Reference(id)) if doc.get_dictionary(id).is_ok() => id,
        Some(Object::Dictionary(inline)) => {
            let id = doc.add_object(inline);
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
        _ => {
            let id = doc.add_object(Dictionary::new());
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };
    Ok(doc.get_dictionary_mut(info_id)?)
}

/// Drop `/Info` from the trailer and `/Metadata` (XMP) from the catalog
pub fn remove_metadata(doc: &mut Document) -> Result<()> {
    doc.trailer.remove(b"Info");
    doc.catalog_mut()?.remove(b"Metadata");
    Ok(())
}

/// PDF text string: literal for ASCII, UTF-16BE with byte order mark otherwise
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Inverse of [`encode_text_string`]; non-UTF-16 strings are read as Latin-1
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// PDF date string, e.g. `D:20240131093000+01'00'`
pub fn pdf_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let offset_seconds = at.offset().fix().local_minus_utc();
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let minutes = offset_seconds.abs() / 60;
    format!(
        "D:{}{}{:02}'{:02}'",
        at.naive_local().format("%Y%m%d%H%M%S"),
        sign,
        minutes / 60,
        minutes % 60
    )
}

/// Set a text field of `/Info`
pub fn set_info_text(info: &mut Dictionary, key: &str, value: &str) {
    info.set(key, encode_text_string(value));
}
