//! Copying pages between documents
//!
//! A [`PageImporter`] deep-copies pages from one source document into a
//! [`DocumentBuilder`], sharing every object it has already copied. Object
//! ids for all pages being imported are reserved up front, so links and
//! annotations pointing at another imported page stay intact. References to
//! pages that are not imported become `null`.

use super::page::{DocumentBuilder, flattened_page_dict};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

pub struct PageImporter<'a> {
    builder: &'a mut DocumentBuilder,
    source: &'a Document,
    cache: HashMap<ObjectId, ObjectId>,
}

impl DocumentBuilder {
    /// Start importing `pages` (object ids in `source`) into this document
    pub fn importer<'a>(&'a mut self, source: &'a Document, pages: &[ObjectId]) -> PageImporter<'a> {
        let mut cache = HashMap::with_capacity(pages.len());
        for &page_id in pages {
            cache
                .entry(page_id)
                .or_insert_with(|| self.doc.new_object_id());
        }
        PageImporter {
            builder: self,
            source,
            cache,
        }
    }
}

impl PageImporter<'_> {
    /// Copy one page and append it to the output page tree
    pub fn import(&mut self, page_id: ObjectId) -> Result<ObjectId> {
        let new_id = match self.cache.get(&page_id) {
            Some(&id) => id,
            None => {
                let id = self.builder.doc.new_object_id();
                self.cache.insert(page_id, id);
                id
            }
        };

        let page = flattened_page_dict(self.source, page_id)?;
        let mut copied = Dictionary::new();
        for (key, value) in page.iter() {
            copied.set(key.clone(), self.copy(value)?);
        }

        self.builder.attach_page(new_id, copied);
        Ok(new_id)
    }

    /// Deep copy an object from the source document, following references.
    ///
    /// The destination id is reserved before recursing so reference cycles
    /// (e.g. an annotation pointing back at its page) terminate.
    fn copy(&mut self, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => {
                if let Some(&new_id) = self.cache.get(id) {
                    return Ok(Object::Reference(new_id));
                }

                let Ok(referenced) = self.source.get_object(*id) else {
                    log::debug!("Dropping dangling reference {:?}", id);
                    return Ok(Object::Null);
                };
                if is_page_tree_node(referenced) {
                    return Ok(Object::Null);
                }

                let new_id = self.builder.doc.new_object_id();
                self.cache.insert(*id, new_id);
                let copied = self.copy(referenced)?;
                self.builder.doc.objects.insert(new_id, copied);
                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dict(dict)?)),
            Object::Array(items) => {
                let copied: Result<Vec<_>> = items.iter().map(|item| self.copy(item)).collect();
                Ok(Object::Array(copied?))
            }
            Object::Stream(stream) => Ok(Object::Stream(Stream {
                dict: self.copy_dict(&stream.dict)?,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            })),
            _ => Ok(obj.clone()),
        }
    }

    fn copy_dict(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy(value)?);
        }
        Ok(copied)
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    match obj {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(name) if name == b"Page" || name == b"Pages"
        ),
        _ => false,
    }
}
