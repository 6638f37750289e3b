//! End-to-end curation over a scratch dataset tree.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use curate_iss_dataset::config::CurationConfig;
use curate_iss_dataset::core::pipeline;

/// Near-zero illumination: retained by the classifier
fn night_image() -> RgbImage {
    RgbImage::from_pixel(64, 64, Rgb([3, 2, 1]))
}

/// Gradient with every intensity bin equally loaded: deleted as daytime
fn day_image() -> RgbImage {
    RgbImage::from_fn(256, 100, |x, _| Rgb([x as u8, x as u8, x as u8]))
}

fn make_class(root: &Path, label: &str, night: usize, day: usize) {
    let dir = root.join("train").join(label);
    fs::create_dir_all(&dir).unwrap();
    for i in 0..night {
        night_image()
            .save(dir.join(format!("night_{:03}.png", i)))
            .unwrap();
    }
    for i in 0..day {
        day_image()
            .save(dir.join(format!("day_{:03}.png", i)))
            .unwrap();
    }
}

fn count_images(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "png").unwrap_or(false))
            .count(),
        Err(_) => 0,
    }
}

#[test]
fn curation_run_filters_and_splits_night_corpus() {
    let tmp = TempDir::new().unwrap();
    make_class(tmp.path(), "TOKYO", 20, 0);
    make_class(tmp.path(), "MINSK", 5, 0);

    let config = CurationConfig::default();
    let summary = pipeline::run(tmp.path(), &config).unwrap();

    // All 25 images are night exposures: nothing deleted
    assert_eq!(summary.classification.scanned, 25);
    assert_eq!(summary.classification.deleted, 0);

    // The 5-image class falls below the 15 minimum
    assert_eq!(summary.filtering.removed, 1);
    assert!(!tmp.path().join("train/MINSK").exists());
    assert!(!tmp.path().join("validation/MINSK").exists());

    // Validation takes floor(0.2 * 20) = 4, test takes floor(0.2 * 16) = 3
    assert_eq!(summary.validation_split.moved, 4);
    assert_eq!(summary.test_split.moved, 3);
    assert_eq!(count_images(&tmp.path().join("train/TOKYO")), 13);
    assert_eq!(count_images(&tmp.path().join("validation/TOKYO")), 4);
    assert_eq!(count_images(&tmp.path().join("test/TOKYO")), 3);
}

#[test]
fn curation_run_deletes_daytime_before_counting_population() {
    let tmp = TempDir::new().unwrap();
    // 14 night + 6 day: after classification only 14 remain, below the minimum
    make_class(tmp.path(), "CAIRO", 14, 6);
    make_class(tmp.path(), "LONDON", 20, 0);

    let config = CurationConfig::default();
    let summary = pipeline::run(tmp.path(), &config).unwrap();

    assert_eq!(summary.classification.deleted, 6);
    // Stage order matters: the stale count of 20 would have kept CAIRO
    assert_eq!(summary.filtering.removed, 1);
    assert!(!tmp.path().join("train/CAIRO").exists());

    assert_eq!(count_images(&tmp.path().join("train/LONDON")), 13);
    assert_eq!(count_images(&tmp.path().join("validation/LONDON")), 4);
    assert_eq!(count_images(&tmp.path().join("test/LONDON")), 3);
}

#[test]
fn curation_run_is_reproducible() {
    let config = CurationConfig::default();

    let mut selections = Vec::new();
    for _ in 0..2 {
        let tmp = TempDir::new().unwrap();
        make_class(tmp.path(), "DELHI", 30, 0);
        pipeline::run(tmp.path(), &config).unwrap();

        let mut names: Vec<String> = fs::read_dir(tmp.path().join("validation/DELHI"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        selections.push(names);
    }

    assert_eq!(selections[0], selections[1]);
    assert_eq!(selections[0].len(), 6);
}

#[test]
fn curation_run_missing_root_aborts() {
    let tmp = TempDir::new().unwrap();
    let config = CurationConfig::default();
    assert!(pipeline::run(&tmp.path().join("absent"), &config).is_err());
}
