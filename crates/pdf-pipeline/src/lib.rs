//! Runs page operations over in-memory documents and reports progress as a
//! stream of [`RunState`] snapshots.

mod naming;
mod runner;

// Re-export types from the operations crate
pub use pdf_pageops::{Operation, OperationKind, OutputFile, OutputLabel, PageOpsError, Package, package};

pub use naming::output_filename;
pub use runner::{CancelToken, RunHandle, run, spawn_run};

/// A source document as uploaded: raw bytes plus its original filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub operation: Operation,
    pub sources: Vec<SourceFile>,
}

/// Lifecycle of a run; `Success` and `Error` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Snapshot of a run.
///
/// `progress` never decreases within a run. `outputs` is only filled in
/// the final `Success` state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    pub status: RunStatus,
    pub progress: u8,
    pub message: String,
    pub outputs: Vec<OutputFile>,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RunStatus::Success | RunStatus::Error)
    }
}

/// Identifies a run in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}
