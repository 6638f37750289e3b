//! Class population filter.
//!
//! Classes with too few samples cannot be trained reliably, so any class
//! directory whose image count falls below the configured minimum is removed
//! together with all of its contents.

use std::path::Path;
use tracing::{info, warn};

use crate::core::operations::remove_class_dir;
use crate::dataset::{list_class_dirs, list_class_images};
use crate::error::CurationResult;

/// Counters for one filtering pass
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterStats {
    pub inspected: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Remove every class directory under `partition_root` holding fewer than
/// `min_population` images.
///
/// Classes are independent: a removal failure is logged and counted but does
/// not abort the remaining classes. Running the filter twice removes nothing
/// on the second pass.
///
/// # Returns
/// * `Ok(FilterStats)` with the number of classes inspected/removed/failed
/// * `Err(CurationError::NotFound)` if the partition root is missing
pub fn remove_small_classes(
    partition_root: &Path,
    min_population: usize,
) -> CurationResult<FilterStats> {
    let classes = list_class_dirs(partition_root)?;

    let mut stats = FilterStats::default();
    for class in &classes {
        stats.inspected += 1;

        let population = match list_class_images(&class.path) {
            Ok(images) => images.len(),
            Err(e) => {
                warn!("Failed to count class {:?}: {}", class.label, e);
                stats.failed += 1;
                continue;
            }
        };

        if population >= min_population {
            continue;
        }

        match remove_class_dir(&class.path) {
            Ok(()) => {
                info!(
                    "Removed class {:?} ({} images, minimum is {})",
                    class.label, population, min_population
                );
                stats.removed += 1;
            }
            Err(e) => {
                warn!("Failed to remove class {:?}: {}", class.label, e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Population filter complete: {} classes inspected, {} removed, {} failed",
        stats.inspected, stats.removed, stats.failed
    );
    Ok(stats)
}
