//! Manifest-driven image batch loading with background prefetch.
//!
//! This crate is the data-ingestion stage of a training pipeline: it reads a
//! manifest of image paths paired with multi-valued integer label vectors,
//! decodes and transforms images on a dedicated background thread, and hands
//! fully assembled batches to the training loop one step ahead of demand.
//!
//! # Architecture Overview
//!
//! ```text
//!            ┌──────────┐
//!            │ Manifest │ (path + label vector per line, parsed once)
//!            └────┬─────┘
//!                 │ moved onto the producer thread
//!                 ↓
//!         ┌────────────────┐
//!         │ ManifestCursor │ (iteration order, per-epoch reshuffle)
//!         └───────┬────────┘
//!                 │ one entry at a time
//!                 ↓
//!         ┌─────────────────┐
//!         │ SampleTransform │ (path → tensor; DecodeResize by default)
//!         └───────┬─────────┘
//!                 │ per-sample tensors
//!                 ↓
//!         ┌────────────────┐
//!         │ BatchAssembler │ (stacks data + labels into a Batch)
//!         └───────┬────────┘
//!                 │ capacity-1 channel (the double buffer)
//!                 ↓
//!         ┌────────────────┐
//!         │ PrefetchLoader │ ──► next_batch() on the training thread
//!         └────────────────┘
//! ```
//!
//! # Example
//! ```ignore
//! let manifest = Manifest::from_file("train.txt")?;
//! let config = LoaderConfig::builder()
//!     .batch_size(32)
//!     .shuffle(true)
//!     .seed(42)
//!     .build();
//! let mut loader = PrefetchLoader::new(manifest, DecodeResize::new(224, 224), config)?;
//!
//! loop {
//!     let batch = loader.next_batch()?;
//!     // batch.data: [32, 3, 224, 224], batch.labels: [32, label_width]
//! }
//! ```

pub mod batch;
pub mod config;
pub mod cursor;
pub mod error;
pub mod manifest;
pub mod prefetch;
pub mod transform;

pub use batch::Batch;
pub use config::{LoaderConfig, LoaderConfigBuilder};
pub use cursor::ManifestCursor;
pub use error::{DecodeError, ManifestError};
pub use manifest::{Manifest, ManifestEntry};
pub use prefetch::PrefetchLoader;
pub use transform::{DecodeResize, SampleTransform};
