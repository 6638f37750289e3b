use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{CurationError, CurationResult};

/// Dataset partitions mirrored as top-level directories under the dataset root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetPartition {
    Train,
    Validation,
    Test,
}

impl DatasetPartition {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetPartition::Train => "train",
            DatasetPartition::Validation => "validation",
            DatasetPartition::Test => "test",
        }
    }
}

impl std::str::FromStr for DatasetPartition {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(DatasetPartition::Train),
            "validation" => Ok(DatasetPartition::Validation),
            "test" => Ok(DatasetPartition::Test),
            other => Err(CurationError::UnsupportedMode(other.to_string())),
        }
    }
}

/// One image of the corpus with its label carried as a structured field.
///
/// The class label and partition are attached at enumeration time and never
/// re-derived from path syntax downstream.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub class_label: String,
    pub partition: DatasetPartition,
}

impl ImageRecord {
    /// File name of the image within its class directory
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// A class directory: one city label grouping all images of that label
#[derive(Debug, Clone)]
pub struct ClassDirectory {
    pub label: String,
    pub path: PathBuf,
}

/// Check whether a path looks like a corpus image by extension
pub fn is_image_file(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "jpg" || ext == "jpeg" || ext == "png"
        }
        None => false,
    }
}

/// List the class directories of one partition, sorted by label.
///
/// Fails with `NotFound` if the partition root is missing; unreadable entries
/// are skipped with a warning.
pub fn list_class_dirs(partition_root: &Path) -> CurationResult<Vec<ClassDirectory>> {
    if !partition_root.is_dir() {
        return Err(CurationError::NotFound(partition_root.to_path_buf()));
    }

    let mut classes = Vec::new();
    for entry in fs::read_dir(partition_root)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", partition_root, e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(label) => classes.push(ClassDirectory {
                label: label.to_string(),
                path: path.clone(),
            }),
            None => warn!("Skipping class directory with non-UTF8 name: {:?}", path),
        }
    }

    // Sort by label so seeded sampling sees a stable class order
    classes.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(classes)
}

/// List the image files of one class directory, sorted for consistent ordering
pub fn list_class_images(class_path: &Path) -> CurationResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(class_path)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", class_path, e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Enumerate every image of one partition as an `ImageRecord`
pub fn collect_records(
    dataset_root: &Path,
    partition: DatasetPartition,
) -> CurationResult<Vec<ImageRecord>> {
    let partition_root = dataset_root.join(partition.as_str());
    let classes = list_class_dirs(&partition_root)?;

    let mut records = Vec::new();
    for class in &classes {
        for image in list_class_images(&class.path)? {
            records.push(ImageRecord {
                path: image,
                class_label: class.label.clone(),
                partition,
            });
        }
    }

    info!(
        "Found {} images across {} classes in {:?}",
        records.len(),
        classes.len(),
        partition_root
    );
    Ok(records)
}
