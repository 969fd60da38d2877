//! Batch assembly.
//!
//! The assembler pulls `batch_size` entries from the cursor, transforms each
//! one, and stacks the results into two parallel tensors: image data of
//! shape `[batch_size, ...]` and labels of shape `[batch_size, label_width]`.
//! Labels are copied verbatim as integers; no encoding is applied here.

use crate::cursor::ManifestCursor;
use crate::transform::{fetch_sample, SampleTransform};
use anyhow::{ensure, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tch::Tensor;

/// One fully populated training batch.
///
/// `data` stacks the per-sample transform outputs along dim 0; `labels` is
/// an Int64 tensor with one row per sample. A `Batch` only exists once all
/// of its slots are filled; partial batches are never constructed.
#[derive(Debug)]
pub struct Batch {
    pub data: Tensor,
    pub labels: Tensor,
}

impl Batch {
    pub fn batch_size(&self) -> i64 {
        self.data.size()[0]
    }

    pub fn label_width(&self) -> i64 {
        self.labels.size()[1]
    }
}

/// Produces batches from a cursor and a transform. Owned exclusively by the
/// producer thread; nothing here is shared.
pub(crate) struct BatchAssembler<T> {
    cursor: ManifestCursor,
    transform: T,
    batch_size: usize,
}

impl<T: SampleTransform> BatchAssembler<T> {
    pub(crate) fn new(cursor: ManifestCursor, transform: T, batch_size: usize) -> Self {
        Self {
            cursor,
            transform,
            batch_size,
        }
    }

    /// Assembles the next batch in cursor order.
    ///
    /// Returns `Ok(None)` when the cancel flag was observed between samples;
    /// the partially assembled batch is discarded, never handed off. A
    /// decode failure aborts the batch with the error from
    /// [`fetch_sample`].
    pub(crate) fn next_batch(&mut self, cancel: &AtomicBool) -> Result<Option<Batch>> {
        let label_width = self.cursor.label_width();
        let mut samples: Vec<Tensor> = Vec::with_capacity(self.batch_size);
        let mut labels: Vec<i64> = Vec::with_capacity(self.batch_size * label_width);

        for _ in 0..self.batch_size {
            if cancel.load(Ordering::Relaxed) {
                return Ok(None);
            }

            let entry = self.cursor.next();
            let tensor = fetch_sample(&self.transform, &entry)?;

            if let Some(first) = samples.first() {
                ensure!(
                    tensor.size() == first.size(),
                    "sample {} has shape {:?}, expected {:?}",
                    entry.path.display(),
                    tensor.size(),
                    first.size()
                );
            }

            labels.extend_from_slice(&entry.labels);
            samples.push(tensor);
        }

        let data = Tensor::stack(&samples, 0);
        let labels =
            Tensor::from_slice(&labels).reshape(&[self.batch_size as i64, label_width as i64]);
        Ok(Some(Batch { data, labels }))
    }
}
