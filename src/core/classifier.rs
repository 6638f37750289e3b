//! Day/night classification of ISS imagery.
//!
//! Night-time city images concentrate almost all illumination near zero, so
//! their intensity histograms are sharply peaked and most of the 256 bins share
//! the same near-zero frequency. Daytime images spread illumination broadly and
//! their bin frequencies repeat at much higher values. The classifier exploits
//! this: it takes the statistical mode of the bin counts per channel, averages
//! the three channels, and treats a high aggregate value as daytime.

use std::collections::HashMap;
use std::path::Path;

use image::RgbImage;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::core::operations::remove_image;
use crate::dataset::is_image_file;
use crate::error::{CurationError, CurationResult};

/// Outcome of classifying one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayNight {
    /// Broad illumination; the image is unusable and gets deleted
    Day,
    /// Near-zero illumination; the image is retained
    Night,
}

/// Counters for one classification pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyStats {
    pub scanned: usize,
    pub deleted: usize,
    pub retained: usize,
    pub failed: usize,
}

/// Compute the 256-bin intensity histogram of each color channel
pub fn channel_histograms(img: &RgbImage) -> [[u32; 256]; 3] {
    let mut histograms = [[0u32; 256]; 3];
    for pixel in img.pixels() {
        for channel in 0..3 {
            histograms[channel][pixel[channel] as usize] += 1;
        }
    }
    histograms
}

/// Statistical mode of the 256 bin counts: the count value repeated across the
/// most bins. Ties resolve to the smallest count value.
fn count_mode(histogram: &[u32; 256]) -> u32 {
    let mut frequencies: HashMap<u32, u32> = HashMap::new();
    for &count in histogram.iter() {
        *frequencies.entry(count).or_insert(0) += 1;
    }

    let mut mode = 0u32;
    let mut best_frequency = 0u32;
    for (&value, &frequency) in &frequencies {
        if frequency > best_frequency || (frequency == best_frequency && value < mode) {
            mode = value;
            best_frequency = frequency;
        }
    }
    mode
}

/// Aggregate decision statistic: per-channel count mode, averaged over the
/// three color channels.
pub fn histogram_mode(img: &RgbImage) -> f64 {
    let histograms = channel_histograms(img);
    let total: u32 = histograms.iter().map(count_mode).sum();
    total as f64 / 3.0
}

/// Classify decoded pixel data against the daytime threshold
pub fn classify_pixels(img: &RgbImage, threshold: f64) -> DayNight {
    if histogram_mode(img) > threshold {
        DayNight::Day
    } else {
        DayNight::Night
    }
}

/// Classify one image on storage and delete it if it is a daytime exposure.
///
/// Deletion is irreversible; an already-missing path counts as deleted.
///
/// # Returns
/// * `Ok(DayNight)` with the decision
/// * `Err(CurationError::Decode)` if the image cannot be read or decoded
/// * `Err(CurationError::Io)` if a present file fails to delete
pub fn classify_image(path: &Path, threshold: f64) -> CurationResult<DayNight> {
    let img = image::open(path)
        .map_err(|e| CurationError::Decode(path.to_path_buf(), e.to_string()))?
        .to_rgb8();

    let decision = classify_pixels(&img, threshold);
    if decision == DayNight::Day {
        info!("Removing daytime image: {:?}", path);
        remove_image(path)?;
    }
    Ok(decision)
}

/// Classify every image under a directory tree, deleting daytime exposures.
///
/// Per-image failures are logged and skipped; a missing root aborts the stage
/// with `NotFound`.
pub fn classify_tree(root: &Path, threshold: f64) -> CurationResult<ClassifyStats> {
    if !root.is_dir() {
        return Err(CurationError::NotFound(root.to_path_buf()));
    }

    let mut stats = ClassifyStats::default();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_file(path) {
            continue;
        }

        stats.scanned += 1;
        match classify_image(path, threshold) {
            Ok(DayNight::Day) => stats.deleted += 1,
            Ok(DayNight::Night) => stats.retained += 1,
            Err(e) => {
                warn!("Skipping image {:?}: {}", path, e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Classification complete: {} scanned, {} deleted as daytime, {} retained, {} failed",
        stats.scanned, stats.deleted, stats.retained, stats.failed
    );
    Ok(stats)
}
