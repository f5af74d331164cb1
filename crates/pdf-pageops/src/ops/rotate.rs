use super::{ProgressSink, checkpoint};
use crate::codec::{page_ids, set_rotation};
use crate::types::*;
use lopdf::Document;

/// Normalize a rotation into 0, 90, 180 or 270
pub fn normalize_angle(angle_degrees: i32) -> Result<i64> {
    if angle_degrees % 90 != 0 {
        return Err(PageOpsError::Config(format!(
            "Rotation must be a multiple of 90 degrees, got {angle_degrees}"
        )));
    }
    Ok(i64::from(angle_degrees).rem_euclid(360))
}

/// Set an absolute rotation on the selected pages.
///
/// The angle replaces whatever rotation a page had, so applying the same
/// rotation twice gives the same document.
pub fn rotate(
    mut doc: Document,
    selection: &[usize],
    angle_degrees: i32,
    progress: &mut dyn ProgressSink,
) -> Result<Document> {
    let angle = normalize_angle(angle_degrees)?;
    let pages = page_ids(&doc);
    let total = selection.len();

    for (done, &index) in selection.iter().enumerate() {
        let page_id = *pages.get(index).ok_or_else(|| {
            PageOpsError::Operation(format!("cannot rotate missing page {}", index + 1))
        })?;
        set_rotation(&mut doc, page_id, angle)?;
        checkpoint(progress, done + 1, total)?;
    }

    log::info!("Rotated {} pages to {} degrees", total, angle);
    Ok(doc)
}
