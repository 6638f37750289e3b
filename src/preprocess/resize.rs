//! Geometry normalization for CNN input.
//!
//! Every image entering classification is resized to a fixed square geometry
//! (224x224 by default, the common pre-trained CNN input) and written into a
//! mirrored output tree.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use tracing::{info, warn};

use crate::dataset::{collect_records, DatasetPartition, ImageRecord};
use crate::error::{CurationError, CurationResult};

/// Counters for one resize pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeStats {
    pub resized: usize,
    pub failed: usize,
}

/// Resize one image to the target dimensions and write it into the mirrored
/// class directory under `output_root`.
///
/// The record carries its class label and partition, so the destination is
/// assembled from structured fields rather than parsed out of the source path.
pub fn resize_image(
    record: &ImageRecord,
    output_root: &Path,
    dimensions: (u32, u32),
) -> CurationResult<PathBuf> {
    let img = image::open(&record.path)
        .map_err(|e| CurationError::Decode(record.path.clone(), e.to_string()))?;

    // Triangle filtering is the appropriate choice when shrinking
    let resized = img.resize_exact(dimensions.0, dimensions.1, FilterType::Triangle);

    let file_name = record
        .file_name()
        .ok_or_else(|| CurationError::Decode(record.path.clone(), "no file name".to_string()))?;
    let dest_dir = output_root
        .join(record.partition.as_str())
        .join(&record.class_label);
    fs::create_dir_all(&dest_dir)?;

    let dest = dest_dir.join(file_name);
    resized
        .save(&dest)
        .map_err(|e| CurationError::Io(std::io::Error::other(e.to_string())))?;
    Ok(dest)
}

/// Resize every image of one partition into a mirrored output tree
pub fn resize_partition(
    dataset_root: &Path,
    partition: DatasetPartition,
    output_root: &Path,
    dimensions: (u32, u32),
) -> CurationResult<ResizeStats> {
    let records = collect_records(dataset_root, partition)?;

    let mut stats = ResizeStats::default();
    for record in &records {
        match resize_image(record, output_root, dimensions) {
            Ok(_) => stats.resized += 1,
            Err(e) => {
                warn!("Skipping image {:?}: {}", record.path, e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Resize complete: {} images resized to {}x{}, {} failed",
        stats.resized, dimensions.0, dimensions.1, stats.failed
    );
    Ok(stats)
}
