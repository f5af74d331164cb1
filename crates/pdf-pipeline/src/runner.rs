//! The run loop: load → select → apply → save, with progress snapshots

use crate::naming::output_filename;
use crate::{RunId, RunRequest, RunState, RunStatus, SourceFile};
use lopdf::Document;
use pdf_pageops::constants::{PROGRESS_DONE, PROGRESS_LOADED, PROGRESS_PROCESSED};
use pdf_pageops::{OperationKind, OutputFile, PageOpsError, ProgressSink, Result, load_document, save_document};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Cooperative cancellation flag shared between a run and its handle
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A run started with [`spawn_run`]
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    cancel: CancelToken,
    task: JoinHandle<RunState>,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Ask the run to stop. It ends in `Error` with "Operation cancelled"
    /// at the next page boundary or before saving.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the terminal state
    pub async fn finish(self) -> RunState {
        match self.task.await {
            Ok(state) => state,
            Err(e) => RunState {
                status: RunStatus::Error,
                progress: 0,
                message: format!("Run task failed: {e}"),
                outputs: Vec::new(),
            },
        }
    }
}

/// Start a run on the tokio runtime; snapshots arrive on the receiver
pub fn spawn_run(request: RunRequest) -> (RunHandle, mpsc::UnboundedReceiver<RunState>) {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let cancel = CancelToken::default();
    let id = next_run_id();
    let task = tokio::spawn(run_with_id(id, request, update_tx, cancel.clone()));
    (RunHandle { id, cancel, task }, update_rx)
}

/// Execute one run to completion.
///
/// Every state is sent on `update_tx` as it happens; the terminal state is
/// also returned. Failures of any kind end the run in `Error`.
pub async fn run(
    request: RunRequest,
    update_tx: mpsc::UnboundedSender<RunState>,
    cancel: CancelToken,
) -> RunState {
    run_with_id(next_run_id(), request, update_tx, cancel).await
}

fn next_run_id() -> RunId {
    RunId(NEXT_RUN_ID.fetch_add(1, Ordering::SeqCst))
}

async fn run_with_id(
    id: RunId,
    request: RunRequest,
    update_tx: mpsc::UnboundedSender<RunState>,
    cancel: CancelToken,
) -> RunState {
    let kind = request.operation.kind();
    log::info!("{id}: {kind} on {} source(s)", request.sources.len());

    let reporter = Reporter {
        update_tx,
        progress: Arc::default(),
    };
    let result = execute(request, &reporter, &cancel).await;
    let state = match result {
        Ok(outputs) => {
            log::info!("{id}: finished with {} output(s)", outputs.len());
            RunState {
                status: RunStatus::Success,
                progress: PROGRESS_DONE,
                message: format!("{kind} complete: {} file(s) ready", outputs.len()),
                outputs,
            }
        }
        Err(e) => {
            log::warn!("{id}: failed: {e}");
            RunState {
                status: RunStatus::Error,
                progress: reporter.progress(),
                message: e.to_string(),
                outputs: Vec::new(),
            }
        }
    };

    let _ = reporter.update_tx.send(state.clone());
    state
}

/// Sends `Processing` snapshots, never letting progress go backwards.
///
/// The high-water mark is shared with [`OperationProgress`], so whatever
/// the blocking operation reported is also what a failed run ends on.
struct Reporter {
    update_tx: mpsc::UnboundedSender<RunState>,
    progress: Arc<AtomicU8>,
}

impl Reporter {
    fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    fn processing(&self, progress: u8, message: impl Into<String>) {
        let previous = self.progress.fetch_max(progress, Ordering::SeqCst);
        let _ = self.update_tx.send(RunState {
            status: RunStatus::Processing,
            progress: previous.max(progress),
            message: message.into(),
            outputs: Vec::new(),
        });
    }
}

/// Maps per-page progress of an operation into the 20–80 band
struct OperationProgress {
    update_tx: mpsc::UnboundedSender<RunState>,
    cancel: CancelToken,
    kind: OperationKind,
    progress: Arc<AtomicU8>,
}

impl ProgressSink for OperationProgress {
    fn report(&mut self, done: usize, total: usize) {
        let span = usize::from(PROGRESS_PROCESSED - PROGRESS_LOADED);
        let value = PROGRESS_LOADED + (span * done.min(total) / total.max(1)) as u8;
        if self.progress.fetch_max(value, Ordering::SeqCst) >= value {
            return;
        }
        let _ = self.update_tx.send(RunState {
            status: RunStatus::Processing,
            progress: value,
            message: format!("{}: {}/{}", self.kind, done, total),
            outputs: Vec::new(),
        });
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

fn ensure_not_cancelled(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(PageOpsError::Cancelled);
    }
    Ok(())
}

fn load_sources(sources: Vec<SourceFile>) -> Result<Vec<Document>> {
    sources
        .iter()
        .map(|source| {
            load_document(&source.bytes).map_err(|e| match e {
                PageOpsError::CorruptDocument(reason) => {
                    PageOpsError::CorruptDocument(format!("{}: {}", source.filename, reason))
                }
                other => other,
            })
        })
        .collect()
}

async fn execute(
    request: RunRequest,
    reporter: &Reporter,
    cancel: &CancelToken,
) -> Result<Vec<OutputFile>> {
    let RunRequest { operation, sources } = request;
    let kind = operation.kind();

    reporter.processing(0, format!("Loading {} document(s)", sources.len()));
    operation.validate()?;
    if sources.is_empty() {
        return Err(PageOpsError::EmptyInput);
    }
    let first_name = sources[0].filename.clone();

    let documents = tokio::task::spawn_blocking(move || load_sources(sources)).await??;
    reporter.processing(
        PROGRESS_LOADED,
        format!("Loaded {} document(s)", documents.len()),
    );

    let page_count = documents.first().map(|d| d.get_pages().len()).unwrap_or(0);
    let selection = operation.resolve_selection(page_count)?;
    ensure_not_cancelled(cancel)?;

    let save_options = operation.save_options();
    let mut sink = OperationProgress {
        update_tx: reporter.update_tx.clone(),
        cancel: cancel.clone(),
        kind,
        progress: Arc::clone(&reporter.progress),
    };
    let produced = tokio::task::spawn_blocking(move || {
        operation.apply(documents, selection.as_deref(), &mut sink)
    })
    .await??;

    ensure_not_cancelled(cancel)?;
    reporter.processing(
        PROGRESS_PROCESSED,
        format!("Saving {} file(s)", produced.len()),
    );

    let total = produced.len();
    let span = usize::from(PROGRESS_DONE - PROGRESS_PROCESSED);
    let mut outputs = Vec::with_capacity(total);
    for (saved, item) in produced.into_iter().enumerate() {
        ensure_not_cancelled(cancel)?;
        let filename = output_filename(kind, &first_name, &item.label);
        let bytes =
            tokio::task::spawn_blocking(move || save_document(item.document, &save_options))
                .await??;
        log::debug!("Saved {} ({} bytes)", filename, bytes.len());

        // 100 is reserved for the terminal state
        let progress = PROGRESS_PROCESSED + (span * (saved + 1) / total) as u8;
        reporter.processing(progress.min(PROGRESS_DONE - 1), format!("Saved {filename}"));
        outputs.push(OutputFile { bytes, filename });
    }

    Ok(outputs)
}
