//! Loading and saving documents

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Save-time work done by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Flate-compress streams that carry no filter yet
    pub compress_streams: bool,
    /// Drop objects no longer reachable from the trailer
    pub prune_unused: bool,
    /// Delete streams with empty content
    pub drop_empty_streams: bool,
    /// Renumber objects densely from 1
    pub renumber: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compress_streams: true,
            prune_unused: true,
            drop_empty_streams: false,
            renumber: false,
        }
    }
}

impl SaveOptions {
    /// Everything on, used by the compress operation
    pub fn thorough() -> Self {
        Self {
            compress_streams: true,
            prune_unused: true,
            drop_empty_streams: true,
            renumber: true,
        }
    }
}

/// Parse a document from bytes
pub fn load_document(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| PageOpsError::CorruptDocument(e.to_string()))?;
    if doc.catalog().is_err() {
        return Err(PageOpsError::CorruptDocument(
            "document has no catalog".to_string(),
        ));
    }
    Ok(doc)
}

/// Serialize a document to bytes
pub fn save_document(mut doc: Document, options: &SaveOptions) -> Result<Vec<u8>> {
    if options.prune_unused {
        let pruned = doc.prune_objects();
        log::debug!("Pruned {} unreferenced objects", pruned.len());
    }
    if options.drop_empty_streams {
        doc.delete_zero_length_streams();
    }
    if options.renumber {
        doc.renumber_objects();
    }
    if options.compress_streams {
        doc.compress();
    }

    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Load a single PDF document from disk
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || load_document(&bytes)).await??;
    Ok(doc)
}

/// Save a document to disk
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>, options: SaveOptions) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || save_document(doc, &options)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
