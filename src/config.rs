use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CurationResult;

/// Pipeline configuration containing all tuned values
///
/// This struct centralizes the curation constants (classification threshold,
/// class population minimum, split parameters, target geometry) and can be
/// loaded from a JSON file to override the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Aggregate histogram-mode value above which an image counts as daytime
    pub day_threshold: f64,
    /// Minimum images a class must hold to survive the population filter
    pub min_class_population: usize,
    /// Per-class fraction moved by one splitter call
    pub split_fraction: f64,
    /// Seed shared by all splitter invocations of one run
    pub split_seed: u64,
    /// Output geometry of the resizer (width, height)
    pub target_dimensions: (u32, u32),
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            day_threshold: 50.0,
            min_class_population: 15,
            split_fraction: 0.2,
            split_seed: 42,
            target_dimensions: (224, 224),
        }
    }
}

impl CurationConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> CurationResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }
}
