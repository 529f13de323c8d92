//! Multi-document manifest handling: splitting a rendered manifest byte
//! stream into YAML documents and classifying each document by its
//! `kind` discriminator into the fixed set of recognized shapes.

pub mod shapes;

mod dispatch;
mod split;

pub use dispatch::{classify, CountKind, Document, WorkloadKind};
pub use split::{split_documents, DocSplitter, MAX_DOCUMENT_BYTES};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest document of {0} bytes exceeds the {MAX_DOCUMENT_BYTES} byte ceiling")]
    DocumentTooLarge(usize),
}
