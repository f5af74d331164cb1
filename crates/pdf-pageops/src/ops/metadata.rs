use super::{ProgressSink, checkpoint};
use crate::codec::metadata::{info_dict_mut, pdf_date, set_info_text};
use crate::options::MetadataOptions;
use crate::types::*;
use lopdf::Document;

/// Write the supplied fields into `/Info` and stamp `ModDate`
pub fn edit_metadata(
    mut doc: Document,
    options: &MetadataOptions,
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    checkpoint(progress, 0, 1)?;

    let keywords = options.keyword_list().map(|list| list.join(", "));
    let info = info_dict_mut(&mut doc)?;

    let fields = [
        ("Title", options.title.as_deref()),
        ("Author", options.author.as_deref()),
        ("Subject", options.subject.as_deref()),
        ("Keywords", keywords.as_deref()),
        ("Creator", options.creator.as_deref()),
        ("Producer", options.producer.as_deref()),
    ];
    let mut updated = 0;
    for (key, value) in fields {
        if let Some(value) = value {
            set_info_text(info, key, value);
            updated += 1;
        }
    }
    set_info_text(info, "ModDate", &pdf_date(&chrono::Local::now()));

    checkpoint(progress, 1, 1)?;
    log::info!("Updated {} metadata fields", updated);
    Ok(doc)
}
