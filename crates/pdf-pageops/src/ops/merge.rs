use super::{ProgressSink, checkpoint};
use crate::codec::{DocumentBuilder, page_ids};
use crate::types::*;
use lopdf::Document;

/// Concatenate every page of every document, in input order
pub fn merge(documents: Vec<Document>, progress: &mut dyn ProgressSink) -> Result<Document> {
    if documents.is_empty() {
        return Err(PageOpsError::EmptyInput);
    }

    let sources: Vec<_> = documents
        .iter()
        .map(|doc| (doc, page_ids(doc)))
        .collect();
    let total: usize = sources.iter().map(|(_, pages)| pages.len()).sum();

    let mut builder = DocumentBuilder::new();
    let mut done = 0;
    for (source, pages) in &sources {
        let mut importer = builder.importer(source, pages);
        for &page_id in pages {
            importer.import(page_id)?;
            done += 1;
            checkpoint(progress, done, total)?;
        }
    }

    log::info!(
        "Merged {} documents into {} pages",
        documents.len(),
        builder.page_count()
    );
    Ok(builder.finish())
}
