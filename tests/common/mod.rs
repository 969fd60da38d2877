use anyhow::{anyhow, Result};
use data_prefetch::{Manifest, ManifestEntry, SampleTransform};
use std::path::Path;
use tch::Tensor;

/// Transform that parses the numeric file stem instead of touching disk.
/// Each "image" becomes a `[1]` f32 tensor holding its manifest id, which
/// lets tests track exactly which entries ended up in which batch.
pub struct StemToTensor;

impl SampleTransform for StemToTensor {
    fn apply(&self, path: &Path) -> Result<Tensor> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("path {} has no stem", path.display()))?;
        let id: f32 = stem.parse()?;
        Ok(Tensor::from_slice(&[id]))
    }
}

/// Manifest with entries `0.jpg .. (n-1).jpg`, labels `[i, i % 2]`.
pub fn toy_manifest(n: usize) -> Manifest {
    let entries = (0..n)
        .map(|i| ManifestEntry::new(format!("{}.jpg", i), vec![i as i64, (i % 2) as i64]))
        .collect();
    Manifest::from_entries(entries).unwrap()
}

/// Pulls `count` sample ids out of consecutive batches.
pub fn drain_ids(loader: &mut data_prefetch::PrefetchLoader, count: usize) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(count);
    while ids.len() < count {
        let batch = loader.next_batch()?;
        for row in 0..batch.batch_size() {
            ids.push(batch.data.double_value(&[row, 0]) as i64);
        }
    }
    ids.truncate(count);
    Ok(ids)
}
