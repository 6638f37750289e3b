//! Stratified train/validation/test splitter.
//!
//! Each call moves a fixed fraction of every class from the training partition
//! into one target partition. The RNG seed is an explicit parameter so the
//! selection is reproducible without any ambient global state: the same seed
//! over the same starting tree always exports the same images.
//!
//! One pipeline run calls the splitter twice, validation first, then test over
//! the physically depleted remainder. The second call therefore samples a
//! smaller population; the driver relies on that and never restores the
//! training listing between the calls.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::core::operations::move_file;
use crate::dataset::{list_class_dirs, list_class_images, DatasetPartition};
use crate::error::{CurationError, CurationResult};

/// Counters for one splitter call
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitStats {
    pub classes: usize,
    pub moved: usize,
    pub failed: usize,
}

/// Sample `floor(fraction * len)` entries from a snapshot listing, without
/// replacement within the call.
pub fn select_for_export<'a>(
    listing: &'a [PathBuf],
    fraction: f64,
    rng: &mut StdRng,
) -> Vec<&'a PathBuf> {
    let amount = (fraction * listing.len() as f64).floor() as usize;
    listing.choose_multiple(rng, amount).collect()
}

/// Move a deterministic random sample of each class from `train` into the
/// target partition, mirroring the class directory structure.
///
/// Per-image move failures (including collisions with existing target files)
/// are logged and skipped; the rest of the class and the remaining classes
/// still run. A missing training root aborts with `NotFound`.
pub fn split_partition(
    dataset_root: &Path,
    target: DatasetPartition,
    fraction: f64,
    seed: u64,
) -> CurationResult<SplitStats> {
    if target == DatasetPartition::Train {
        return Err(CurationError::UnsupportedMode(
            "train is not a split target".to_string(),
        ));
    }

    let train_root = dataset_root.join(DatasetPartition::Train.as_str());
    let target_root = dataset_root.join(target.as_str());
    let classes = list_class_dirs(&train_root)?;

    // One seeded stream per call, shared across the (sorted) classes
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = SplitStats::default();

    for class in &classes {
        stats.classes += 1;

        let listing = match list_class_images(&class.path) {
            Ok(images) => images,
            Err(e) => {
                warn!("Failed to list class {:?}: {}", class.label, e);
                stats.failed += 1;
                continue;
            }
        };

        let target_class = target_root.join(&class.label);
        if let Err(e) = fs::create_dir_all(&target_class) {
            warn!("Failed to create {:?}: {}", target_class, e);
            stats.failed += 1;
            continue;
        }

        let selected = select_for_export(&listing, fraction, &mut rng);
        info!(
            "Class {:?}: exporting {} of {} images to {}",
            class.label,
            selected.len(),
            listing.len(),
            target.as_str()
        );

        for src in selected {
            let dest = match src.file_name() {
                Some(name) => target_class.join(name),
                None => {
                    warn!("Skipping image with no file name: {:?}", src);
                    stats.failed += 1;
                    continue;
                }
            };
            match move_file(src, &dest) {
                Ok(()) => stats.moved += 1,
                Err(e) => {
                    warn!("Failed to move {:?}: {}", src, e);
                    stats.failed += 1;
                }
            }
        }
    }

    info!(
        "Split to {} complete: {} classes, {} images moved, {} failed",
        target.as_str(),
        stats.classes,
        stats.moved,
        stats.failed
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs::File;
    use tempfile::TempDir;

    fn make_dataset(class: &str, count: usize) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("train").join(class);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            File::create(dir.join(format!("{:03}.jpg", i))).unwrap();
        }
        tmp
    }

    fn names_in(dir: &Path) -> HashSet<String> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => HashSet::new(),
        }
    }

    #[test]
    fn test_select_for_export_floors() {
        let listing: Vec<PathBuf> = (0..9).map(|i| PathBuf::from(format!("{}.jpg", i))).collect();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(select_for_export(&listing, 0.2, &mut rng).len(), 1);
    }

    #[test]
    fn test_determinism_across_runs() {
        let a = make_dataset("CAIRO", 100);
        let b = make_dataset("CAIRO", 100);

        let stats_a = split_partition(a.path(), DatasetPartition::Validation, 0.2, 42).unwrap();
        let stats_b = split_partition(b.path(), DatasetPartition::Validation, 0.2, 42).unwrap();
        assert_eq!(stats_a.moved, 20);
        assert_eq!(stats_b.moved, 20);

        let moved_a = names_in(&a.path().join("validation/CAIRO"));
        let moved_b = names_in(&b.path().join("validation/CAIRO"));
        assert_eq!(moved_a.len(), 20);
        assert_eq!(moved_a, moved_b);
    }

    #[test]
    fn test_sequential_split_disjoint_and_depleting() {
        let tmp = make_dataset("TOKYO", 100);

        let val = split_partition(tmp.path(), DatasetPartition::Validation, 0.2, 42).unwrap();
        assert_eq!(val.moved, 20);

        // Second call samples the depleted remainder: floor(0.2 * 80)
        let test = split_partition(tmp.path(), DatasetPartition::Test, 0.2, 42).unwrap();
        assert_eq!(test.moved, 16);

        let train = names_in(&tmp.path().join("train/TOKYO"));
        let validation = names_in(&tmp.path().join("validation/TOKYO"));
        let testing = names_in(&tmp.path().join("test/TOKYO"));

        assert_eq!(train.len(), 64);
        assert_eq!(validation.len(), 20);
        assert_eq!(testing.len(), 16);
        assert!(train.is_disjoint(&validation));
        assert!(train.is_disjoint(&testing));
        assert!(validation.is_disjoint(&testing));
    }

    #[test]
    fn test_collision_is_skipped_not_overwritten() {
        let tmp = make_dataset("LAGOS", 5);
        let target_class = tmp.path().join("validation/LAGOS");
        fs::create_dir_all(&target_class).unwrap();
        // Pre-seed every possible destination so all five moves collide
        for i in 0..5 {
            fs::write(target_class.join(format!("{:03}.jpg", i)), b"old").unwrap();
        }

        let stats = split_partition(tmp.path(), DatasetPartition::Validation, 1.0, 42).unwrap();
        assert_eq!(stats.moved, 0);
        assert_eq!(stats.failed, 5);

        // Originals stay put, targets stay untouched
        assert_eq!(names_in(&tmp.path().join("train/LAGOS")).len(), 5);
        for i in 0..5 {
            let body = fs::read(target_class.join(format!("{:03}.jpg", i))).unwrap();
            assert_eq!(body, b"old");
        }
    }

    #[test]
    fn test_small_class_exports_nothing_but_mirrors_structure() {
        let tmp = make_dataset("MINSK", 4);
        let stats = split_partition(tmp.path(), DatasetPartition::Validation, 0.2, 42).unwrap();
        assert_eq!(stats.moved, 0);

        // The class subdirectory exists in the target even with no exports
        assert!(tmp.path().join("validation/MINSK").is_dir());
        assert_eq!(names_in(&tmp.path().join("train/MINSK")).len(), 4);
    }

    #[test]
    fn test_train_is_not_a_target() {
        let tmp = make_dataset("OSLO", 10);
        assert!(matches!(
            split_partition(tmp.path(), DatasetPartition::Train, 0.2, 42),
            Err(CurationError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_missing_train_root() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            split_partition(tmp.path(), DatasetPartition::Validation, 0.2, 42),
            Err(CurationError::NotFound(_))
        ));
    }
}
