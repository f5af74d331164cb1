pub mod archive;
pub mod codec;
pub mod constants;
mod numbering;
mod options;
pub mod ops;
mod selector;
mod types;

pub use archive::{OutputFile, Package, package, package_at};
pub use codec::{SaveOptions, load_document, load_pdf, save_document, save_pdf};
pub use numbering::{format_number, to_letters, to_roman};
pub use ops::{NoProgress, OutputLabel, ProgressSink, Produced};
pub use options::*;
pub use selector::PageSpec;
pub use types::*;
