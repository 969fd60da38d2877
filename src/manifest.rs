//! Manifest parsing.
//!
//! A manifest is a plain-text file with one sample per line:
//!
//! ```text
//! images/000341.jpg 1 0 0 1 1
//! images/000342.jpg 0 1 0 0 1
//! ```
//!
//! The first token is the image path, the rest are integer labels. The
//! label-vector length is inferred from the first parsed line and enforced
//! for every subsequent line. No image I/O happens here.

use crate::error::ManifestError;
use anyhow::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One `(image path, label vector)` pair from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: PathBuf,
    pub labels: Vec<i64>,
}

impl ManifestEntry {
    pub fn new(path: impl Into<PathBuf>, labels: Vec<i64>) -> Self {
        Self {
            path: path.into(),
            labels,
        }
    }
}

/// An ordered, immutable collection of manifest entries with a uniform
/// label-vector width.
#[derive(Debug, Clone)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    label_width: usize,
}

impl Manifest {
    /// Parses a manifest file. Blank lines are skipped; everything else must
    /// be a path followed by `label_width` integers.
    ///
    /// Errors carry the manifest path and 1-based line number so a bad
    /// dataset can be diagnosed from the message alone.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        let mut label_width: Option<usize> = None;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|source| ManifestError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

            let mut tokens = line.split_whitespace();
            let Some(image_path) = tokens.next() else {
                continue;
            };

            let labels = tokens
                .map(|token| {
                    token
                        .parse::<i64>()
                        .map_err(|_| ManifestError::InvalidLabel {
                            path: path.to_path_buf(),
                            line: line_number,
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<i64>, _>>()?;

            if labels.is_empty() {
                return Err(ManifestError::MissingLabels {
                    path: path.to_path_buf(),
                    line: line_number,
                }
                .into());
            }

            match label_width {
                None => label_width = Some(labels.len()),
                Some(expected) if expected != labels.len() => {
                    return Err(ManifestError::LabelWidthMismatch {
                        path: path.to_path_buf(),
                        line: line_number,
                        expected,
                        found: labels.len(),
                    }
                    .into());
                }
                Some(_) => {}
            }

            entries.push(ManifestEntry::new(image_path, labels));
        }

        if entries.is_empty() {
            return Err(ManifestError::Empty {
                path: path.to_path_buf(),
            }
            .into());
        }

        let label_width = entries[0].labels.len();
        Ok(Self {
            entries,
            label_width,
        })
    }

    /// Builds a manifest from in-memory entries, enforcing the same
    /// non-empty and uniform-width invariants as [`Manifest::from_file`].
    pub fn from_entries(entries: Vec<ManifestEntry>) -> Result<Self> {
        let Some(first) = entries.first() else {
            return Err(ManifestError::NoEntries.into());
        };
        let label_width = first.labels.len();
        if label_width == 0 {
            return Err(ManifestError::InconsistentEntry {
                index: 0,
                expected: 1,
                found: 0,
            }
            .into());
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.labels.len() != label_width {
                return Err(ManifestError::InconsistentEntry {
                    index,
                    expected: label_width,
                    found: entry.labels.len(),
                }
                .into());
            }
        }
        Ok(Self {
            entries,
            label_width,
        })
    }

    /// Number of labels per entry, fixed across the whole manifest.
    pub fn label_width(&self) -> usize {
        self.label_width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ManifestEntry> {
        self.entries.get(index)
    }
}
