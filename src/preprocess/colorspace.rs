//! Color-space conversion for representation experiments.
//!
//! Converts RGB corpus images into HSV, LAB, YUV or HLS and writes the result
//! as uncompressed TIFF into a mirrored tree, since TIFF carries non-RGB
//! channel data without lossy re-encoding.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use palette::{FromColor, Hsl, Hsv, Lab, Srgb};
use tracing::{info, warn};

use crate::dataset::{collect_records, DatasetPartition, ImageRecord};
use crate::error::{CurationError, CurationResult};

/// Supported target color spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Hsv,
    Lab,
    Yuv,
    Hls,
}

impl ColorMode {
    pub fn as_str(&self) -> &str {
        match self {
            ColorMode::Hsv => "hsv",
            ColorMode::Lab => "lab",
            ColorMode::Yuv => "yuv",
            ColorMode::Hls => "hls",
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hsv" => Ok(ColorMode::Hsv),
            "lab" => Ok(ColorMode::Lab),
            "yuv" => Ok(ColorMode::Yuv),
            "hls" => Ok(ColorMode::Hls),
            other => Err(CurationError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Counters for one conversion pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertStats {
    pub converted: usize,
    pub failed: usize,
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert one RGB pixel into the target space, channels scaled to 8 bits
pub fn convert_pixel(mode: ColorMode, pixel: Rgb<u8>) -> Rgb<u8> {
    let rgb = Srgb::new(
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    );

    match mode {
        ColorMode::Hsv => {
            let hsv: Hsv = Hsv::from_color(rgb);
            Rgb([
                to_u8(hsv.hue.into_positive_degrees() / 360.0 * 255.0),
                to_u8(hsv.saturation * 255.0),
                to_u8(hsv.value * 255.0),
            ])
        }
        ColorMode::Hls => {
            let hsl: Hsl = Hsl::from_color(rgb);
            Rgb([
                to_u8(hsl.hue.into_positive_degrees() / 360.0 * 255.0),
                to_u8(hsl.lightness * 255.0),
                to_u8(hsl.saturation * 255.0),
            ])
        }
        ColorMode::Lab => {
            let lab: Lab = Lab::from_color(rgb);
            Rgb([
                to_u8(lab.l * 255.0 / 100.0),
                to_u8(lab.a + 128.0),
                to_u8(lab.b + 128.0),
            ])
        }
        ColorMode::Yuv => {
            // palette carries no YUV model; BT.601 8-bit constants
            let (r, g, b) = (pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
            let y = 0.299 * r + 0.587 * g + 0.114 * b;
            let u = 0.492 * (b - y) + 128.0;
            let v = 0.877 * (r - y) + 128.0;
            Rgb([to_u8(y), to_u8(u), to_u8(v)])
        }
    }
}

/// Convert one image and write it as `.tiff` into the mirrored class
/// directory under `output_root`
pub fn convert_image(
    record: &ImageRecord,
    output_root: &Path,
    mode: ColorMode,
) -> CurationResult<PathBuf> {
    let img = image::open(&record.path)
        .map_err(|e| CurationError::Decode(record.path.clone(), e.to_string()))?
        .to_rgb8();

    let converted = RgbImage::from_fn(img.width(), img.height(), |x, y| {
        convert_pixel(mode, *img.get_pixel(x, y))
    });

    let stem = record
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CurationError::Decode(record.path.clone(), "no file name".to_string()))?;
    let dest_dir = output_root
        .join(record.partition.as_str())
        .join(&record.class_label);
    fs::create_dir_all(&dest_dir)?;

    let dest = dest_dir.join(format!("{}.tiff", stem));
    converted
        .save(&dest)
        .map_err(|e| CurationError::Io(std::io::Error::other(e.to_string())))?;
    Ok(dest)
}

/// Convert every image of one partition into a mirrored output tree
pub fn convert_partition(
    dataset_root: &Path,
    partition: DatasetPartition,
    output_root: &Path,
    mode: ColorMode,
) -> CurationResult<ConvertStats> {
    let records = collect_records(dataset_root, partition)?;

    let mut stats = ConvertStats::default();
    for record in &records {
        match convert_image(record, output_root, mode) {
            Ok(_) => stats.converted += 1,
            Err(e) => {
                warn!("Skipping image {:?}: {}", record.path, e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "Conversion to {} complete: {} images converted, {} failed",
        mode.as_str(),
        stats.converted,
        stats.failed
    );
    Ok(stats)
}
