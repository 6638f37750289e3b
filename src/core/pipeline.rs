//! Curation driver: runs the full stage sequence over one dataset root.
//!
//! Stage order is the synchronization mechanism of the pipeline.
//! Classification must run before the population filter so class counts are
//! not stale, and filtering must run before splitting so no partition
//! directories are created for classes about to disappear.

use std::path::Path;
use tracing::info;

use crate::config::CurationConfig;
use crate::core::classifier::{classify_tree, ClassifyStats};
use crate::core::filter::{remove_small_classes, FilterStats};
use crate::core::splitter::{split_partition, SplitStats};
use crate::dataset::DatasetPartition;
use crate::error::CurationResult;

/// Aggregated stage results of one curation run
#[derive(Debug, Clone, Copy)]
pub struct CurationSummary {
    pub classification: ClassifyStats,
    pub filtering: FilterStats,
    pub validation_split: SplitStats,
    pub test_split: SplitStats,
}

/// Run the full curation sequence over one dataset root:
/// classify the training partition, drop under-populated classes, then split
/// out the validation and test partitions in that order.
pub fn run(dataset_root: &Path, config: &CurationConfig) -> CurationResult<CurationSummary> {
    let train_root = dataset_root.join(DatasetPartition::Train.as_str());

    info!("Stage 1/4: day/night classification over {:?}", train_root);
    let classification = classify_tree(&train_root, config.day_threshold)?;

    info!("Stage 2/4: class population filter");
    let filtering = remove_small_classes(&train_root, config.min_class_population)?;

    info!("Stage 3/4: validation split");
    let validation_split = split_partition(
        dataset_root,
        DatasetPartition::Validation,
        config.split_fraction,
        config.split_seed,
    )?;

    // The test split intentionally samples the depleted training remainder
    info!("Stage 4/4: test split");
    let test_split = split_partition(
        dataset_root,
        DatasetPartition::Test,
        config.split_fraction,
        config.split_seed,
    )?;

    info!(
        "Curation complete: {} images deleted as daytime, {} classes removed, {} validation images, {} test images",
        classification.deleted, filtering.removed, validation_split.moved, test_split.moved
    );

    Ok(CurationSummary {
        classification,
        filtering,
        validation_split,
        test_split,
    })
}
