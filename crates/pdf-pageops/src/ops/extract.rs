use super::{OutputLabel, ProgressSink, Produced, checkpoint};
use crate::codec::{DocumentBuilder, page_ids};
use crate::types::*;
use lopdf::{Document, ObjectId};

/// Copy the selected pages into new documents grouped by `mode`
pub fn extract(
    source: Document,
    selection: &[usize],
    mode: ExtractMode,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<Produced>> {
    let all_pages = page_ids(&source);
    let selected = selected_ids(&all_pages, selection)?;

    let group_size = match mode {
        ExtractMode::SingleCombined => selected.len().max(1),
        ExtractMode::OnePerPage => 1,
        ExtractMode::Chunks { size } if size > 0 => size,
        ExtractMode::Chunks { .. } => {
            return Err(PageOpsError::Config("Chunk size must be at least 1".to_string()));
        }
    };

    let total = selected.len();
    let mut done = 0;
    let mut produced = Vec::new();

    for (indices, ids) in selection.chunks(group_size).zip(selected.chunks(group_size)) {
        let mut builder = DocumentBuilder::new();
        let mut importer = builder.importer(&source, ids);
        for &page_id in ids {
            importer.import(page_id)?;
            done += 1;
            checkpoint(progress, done, total)?;
        }

        let label = match (mode, indices) {
            (ExtractMode::SingleCombined, _) => OutputLabel::Whole,
            (_, [index]) if matches!(mode, ExtractMode::OnePerPage) => OutputLabel::Page(*index),
            (_, [first, .., last]) => OutputLabel::Pages {
                first: *first,
                last: *last,
            },
            (_, [only]) => OutputLabel::Pages {
                first: *only,
                last: *only,
            },
            (_, []) => OutputLabel::Whole,
        };
        produced.push(Produced {
            document: builder.finish(),
            label,
        });
    }

    log::info!(
        "Extracted {} pages into {} document(s)",
        total,
        produced.len()
    );
    Ok(produced)
}

/// Delete the selected pages, keeping everything else
pub fn remove_pages(
    mut source: Document,
    selection: &[usize],
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    let all_pages = page_ids(&source);
    selected_ids(&all_pages, selection)?;

    if selection.len() >= all_pages.len() {
        return Err(PageOpsError::InvalidPageSpecification(
            "cannot remove every page of the document".to_string(),
        ));
    }

    checkpoint(progress, 0, selection.len())?;
    let page_numbers: Vec<u32> = selection.iter().map(|&index| index as u32 + 1).collect();
    source.delete_pages(&page_numbers);
    checkpoint(progress, selection.len(), selection.len())?;

    log::info!(
        "Removed {} of {} pages",
        page_numbers.len(),
        all_pages.len()
    );
    Ok(source)
}

fn selected_ids(all_pages: &[ObjectId], selection: &[usize]) -> Result<Vec<ObjectId>> {
    selection
        .iter()
        .map(|&index| {
            all_pages.get(index).copied().ok_or_else(|| {
                PageOpsError::InvalidPageSpecification(format!(
                    "page {} does not exist in a {}-page document",
                    index + 1,
                    all_pages.len()
                ))
            })
        })
        .collect()
}
