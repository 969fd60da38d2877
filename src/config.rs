//! Loader configuration.
//!
//! Example:
//! ```ignore
//! let config = LoaderConfig::builder()
//!     .batch_size(32)
//!     .shuffle(true)
//!     .seed(42)
//!     .build();
//! ```
//!
//! Image-shape and augmentation parameters are not configured here; they
//! belong to the [`SampleTransform`](crate::transform::SampleTransform)
//! implementation and are opaque to the loader core.

/// Configuration for a [`PrefetchLoader`](crate::prefetch::PrefetchLoader).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of samples per batch. Must be > 0 (validated at loader
    /// construction).
    pub batch_size: usize,
    /// Whether to draw a fresh manifest permutation every epoch.
    pub shuffle: bool,
    /// Seed for reproducible shuffling. A random seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: false,
            seed: None,
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }
}

/// Builder for [`LoaderConfig`] with method chaining.
#[derive(Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    /// Set the batch size (must be > 0).
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set whether to shuffle the manifest every epoch.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.config.shuffle = shuffle;
        self
    }

    /// Set the random seed for reproducible iteration order.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> LoaderConfig {
        self.config
    }
}
