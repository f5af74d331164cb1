//! Page operations
//!
//! Every operation takes its input documents by value and hands back newly
//! produced documents. A failing operation drops its inputs, so a
//! half-modified document is never observable.

mod compress;
mod extract;
mod merge;
mod metadata;
mod page_numbers;
mod rotate;
mod watermark;

pub use compress::compress;
pub use extract::{extract, remove_pages};
pub use merge::merge;
pub use metadata::edit_metadata;
pub use page_numbers::add_page_numbers;
pub use rotate::rotate;
pub use watermark::watermark;

use crate::codec::SaveOptions;
use crate::options::Operation;
use crate::types::*;
use lopdf::Document;

/// Receives per-page progress from a running operation
pub trait ProgressSink: Send {
    /// `done` of `total` work items are finished
    fn report(&mut self, done: usize, total: usize);

    /// Checked between pages; returning true aborts with
    /// [`PageOpsError::Cancelled`]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Sink for callers that don't track progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _done: usize, _total: usize) {}
}

/// Report progress, bailing out first if the run was cancelled
pub(crate) fn checkpoint(progress: &mut dyn ProgressSink, done: usize, total: usize) -> Result<()> {
    if progress.is_cancelled() {
        return Err(PageOpsError::Cancelled);
    }
    progress.report(done, total);
    Ok(())
}

/// Which part of the source an output document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLabel {
    /// The whole (transformed) document
    Whole,
    /// A single page, zero-based
    Page(usize),
    /// A run of pages, zero-based and inclusive
    Pages { first: usize, last: usize },
}

/// A document produced by an operation
#[derive(Debug)]
pub struct Produced {
    pub document: Document,
    pub label: OutputLabel,
}

impl Produced {
    pub fn whole(document: Document) -> Self {
        Self {
            document,
            label: OutputLabel::Whole,
        }
    }
}

impl Operation {
    /// Run the operation.
    ///
    /// `selection` holds the resolved zero-based page indices for
    /// operations that take a page specification (see
    /// [`Operation::resolve_selection`]); others ignore it.
    pub fn apply(
        &self,
        documents: Vec<Document>,
        selection: Option<&[usize]>,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<Produced>> {
        self.validate()?;
        let kind = self.kind();
        log::debug!("Applying {} to {} document(s)", kind, documents.len());

        let produced = match self {
            Operation::Merge(_) => vec![Produced::whole(merge(documents, progress)?)],
            Operation::Extract(o) => {
                extract(single(kind, documents)?, required(selection)?, o.mode, progress)?
            }
            Operation::Rotate(o) => vec![Produced::whole(rotate(
                single(kind, documents)?,
                required(selection)?,
                o.angle_degrees,
                progress,
            )?)],
            Operation::Watermark(o) => vec![Produced::whole(watermark(
                single(kind, documents)?,
                required(selection)?,
                o,
                progress,
            )?)],
            Operation::PageNumbers(o) => vec![Produced::whole(add_page_numbers(
                single(kind, documents)?,
                o,
                progress,
            )?)],
            Operation::Metadata(o) => vec![Produced::whole(edit_metadata(
                single(kind, documents)?,
                o,
                progress,
            )?)],
            Operation::Compress(o) => vec![Produced::whole(compress(
                single(kind, documents)?,
                o,
                progress,
            )?)],
            Operation::Delete(_) => vec![Produced::whole(remove_pages(
                single(kind, documents)?,
                required(selection)?,
                progress,
            )?)],
        };
        Ok(produced)
    }

    /// Codec work to do when saving this operation's outputs
    pub fn save_options(&self) -> SaveOptions {
        match self {
            Operation::Compress(_) => SaveOptions::thorough(),
            _ => SaveOptions::default(),
        }
    }
}

fn single(kind: OperationKind, documents: Vec<Document>) -> Result<Document> {
    let count = documents.len();
    let mut documents = documents.into_iter();
    match (documents.next(), count) {
        (None, _) => Err(PageOpsError::EmptyInput),
        (Some(doc), 1) => Ok(doc),
        (Some(_), n) => Err(PageOpsError::Config(format!(
            "{kind} works on one document at a time, got {n}"
        ))),
    }
}

fn required(selection: Option<&[usize]>) -> Result<&[usize]> {
    selection.ok_or_else(|| PageOpsError::Operation("page selection was not resolved".to_string()))
}
