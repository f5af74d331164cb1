//! Page-level access on top of lopdf
//!
//! Pages are addressed by zero-based index through [`page_ids`]. Attributes
//! that PDF lets a page inherit from its ancestors (`MediaBox`, `CropBox`,
//! `Resources`, `Rotate`) are looked up along the `/Parent` chain.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Attributes a page may inherit from the page tree
pub const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Page object ids in reading order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Object id of the page at a zero-based index
pub fn page_id(doc: &Document, index: usize) -> Result<ObjectId> {
    page_ids(doc).get(index).copied().ok_or_else(|| {
        PageOpsError::InvalidPageSpecification(format!(
            "page {} does not exist in a {}-page document",
            index + 1,
            page_count(doc)
        ))
    })
}

/// Follow a reference one level, leaving other objects as they are
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look up `key` on the page, then on each ancestor in turn
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Read a number that may be stored as an integer or a real
pub fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn read_rectangle(doc: &Document, obj: &Object) -> Option<PageBox> {
    let items = resolve(doc, obj).as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = extract_number(resolve(doc, item))?;
    }
    let [x1, y1, x2, y2] = values;
    Some(PageBox {
        x: x1.min(x2),
        y: y1.min(y2),
        width: (x2 - x1).abs(),
        height: (y2 - y1).abs(),
    })
}

/// Visible box of a page: `CropBox` when present, else `MediaBox`, else US Letter
pub fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    [b"CropBox".as_slice(), b"MediaBox".as_slice()]
        .into_iter()
        .filter_map(|key| inherited_attribute(doc, page_id, key))
        .find_map(|obj| read_rectangle(doc, &obj))
        .unwrap_or_else(|| PageBox::from_size(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1))
}

/// Effective `/Rotate` of a page, normalized into 0..360
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, &obj).as_i64().ok())
        .map(|degrees| degrees.rem_euclid(360))
        .unwrap_or(0)
}

/// Set an absolute `/Rotate` on the page itself
pub fn set_rotation(doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
    doc.get_dictionary_mut(page_id)?
        .set("Rotate", Object::Integer(degrees.rem_euclid(360)));
    Ok(())
}

/// Copy of the page dictionary with inherited attributes written onto it
/// and the `/Parent` link removed, ready to be attached to another tree.
pub fn flattened_page_dict(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut dict = doc.get_dictionary(page_id)?.clone();
    for key in INHERITABLE_ATTRIBUTES {
        if dict.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(doc, page_id, key) {
            dict.set(key.to_vec(), value);
        }
    }
    dict.remove(b"Parent");
    Ok(dict)
}

// =============================================================================
// Content Streams
// =============================================================================

fn content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let refs = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Ok(refs)
}

/// Append drawing operators to a page.
///
/// Existing content is wrapped in `q … Q` so any graphics state it leaves
/// behind cannot leak into the appended operators.
pub fn append_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<()> {
    let existing = content_refs(doc, page_id)?;

    let mut contents = Vec::with_capacity(existing.len() + 2);
    if existing.is_empty() {
        contents.push(Object::Reference(
            doc.add_object(Stream::new(Dictionary::new(), content)),
        ));
    } else {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut tail = b"\nQ\n".to_vec();
        tail.extend(content);
        let tail_id = doc.add_object(Stream::new(Dictionary::new(), tail));

        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(tail_id));
    }

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

// =============================================================================
// Resources
// =============================================================================

/// Make sure the page carries its own `/Resources` entry.
///
/// Inherited resources are copied inline so sibling pages are unaffected.
/// Returns the id of the resources dictionary when it is an indirect object.
fn own_resources(doc: &mut Document, page_id: ObjectId) -> Result<Option<ObjectId>> {
    let current = doc.get_dictionary(page_id)?.get(b"Resources").ok().cloned();
    let resources = match current {
        Some(obj) => obj,
        None => {
            let inline = match inherited_attribute(doc, page_id, b"Resources") {
                Some(obj) => resolve(doc, &obj).clone(),
                None => Object::Dictionary(Dictionary::new()),
            };
            doc.get_dictionary_mut(page_id)?
                .set("Resources", inline.clone());
            inline
        }
    };

    match resources {
        Object::Reference(id) => Ok(Some(id)),
        Object::Dictionary(_) => Ok(None),
        _ => Err(PageOpsError::Operation(
            "page resources are not a dictionary".to_string(),
        )),
    }
}

fn resources_mut(
    doc: &mut Document,
    page_id: ObjectId,
    resources_id: Option<ObjectId>,
) -> Result<&mut Dictionary> {
    match resources_id {
        Some(id) => Ok(doc.get_dictionary_mut(id)?),
        None => Ok(doc
            .get_dictionary_mut(page_id)?
            .get_mut(b"Resources")?
            .as_dict_mut()?),
    }
}

/// Register `target` under a resource category (`Font`, `XObject`,
/// `ExtGState`) of the page and return the name to use in content streams.
///
/// An entry already pointing at `target` is reused.
pub fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    prefix: &str,
    target: ObjectId,
) -> Result<String> {
    let resources_id = own_resources(doc, page_id)?;

    let category_ref = match resources_mut(doc, page_id, resources_id)?.get(category.as_bytes()) {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    let entries = match category_ref {
        Some(id) => doc.get_dictionary_mut(id)?,
        None => {
            let resources = resources_mut(doc, page_id, resources_id)?;
            if !matches!(resources.get(category.as_bytes()), Ok(Object::Dictionary(_))) {
                resources.set(category, Object::Dictionary(Dictionary::new()));
            }
            resources.get_mut(category.as_bytes())?.as_dict_mut()?
        }
    };

    let existing = entries.iter().find_map(|(name, value)| {
        (name.starts_with(prefix.as_bytes()) && value.as_reference().ok() == Some(target))
            .then(|| String::from_utf8_lossy(name).into_owned())
    });
    if let Some(name) = existing {
        return Ok(name);
    }

    let name = unique_name(entries, prefix);
    entries.set(name.as_str(), Object::Reference(target));
    Ok(name)
}

fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    (1..)
        .map(|n| format!("{prefix}{n}"))
        .find(|name| !dict.has(name.as_bytes()))
        .unwrap_or_else(|| prefix.to_string())
}

// =============================================================================
// New Documents
// =============================================================================

/// Builds a fresh document and appends pages to its page tree
pub struct DocumentBuilder {
    pub(crate) doc: Document,
    pub(crate) pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Attach a page dictionary under `id` (which must already be reserved
    /// with `new_object_id`) as the next page.
    pub(crate) fn attach_page(&mut self, id: ObjectId, mut page: Dictionary) {
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        self.doc.objects.insert(id, Object::Dictionary(page));
        self.kids.push(id);
    }

    /// Append a blank page of the given size
    pub fn add_blank_page(&mut self, width: f32, height: f32) {
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page = Dictionary::from_iter(vec![
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        let id = self.doc.new_object_id();
        self.attach_page(id, page);
    }

    /// Write the page tree and catalog and hand out the document
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            (
                "Kids",
                Object::Array(self.kids.into_iter().map(Object::Reference).collect()),
            ),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);
        self.doc
    }
}
