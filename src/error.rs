//! Typed errors for manifest loading and sample decoding.
//!
//! Both kinds are constructed at the failure site and travel through
//! `anyhow::Error`, so callers can either display them with full context
//! or match on the concrete type via `downcast_ref`.

use std::path::PathBuf;
use thiserror::Error;

/// Setup-time manifest failure. Always fatal: the loader refuses to start
/// from a partial or inconsistent manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {} contains no entries", path.display())]
    Empty { path: PathBuf },

    #[error("manifest {} line {line}: entry has a path but no labels", path.display())]
    MissingLabels { path: PathBuf, line: usize },

    #[error("manifest {} line {line}: invalid label {token:?}", path.display())]
    InvalidLabel {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error(
        "manifest {} line {line}: expected {expected} labels, found {found}",
        path.display()
    )]
    LabelWidthMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("entry {index}: expected {expected} labels, found {found}")]
    InconsistentEntry {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("manifest contains no entries")]
    NoEntries,
}

/// Per-sample decode failure. Fatal to the current production cycle: the
/// producer reports it on the next handoff and stops, rather than silently
/// shrinking or misaligning a batch.
#[derive(Debug, Error)]
#[error("cannot decode sample {}: {reason:#}", path.display())]
pub struct DecodeError {
    pub path: PathBuf,
    pub reason: anyhow::Error,
}
