//! Curation pipeline for an ISS city-imagery classification dataset.
//!
//! The corpus is a directory-per-class image tree under `train`, `validation`
//! and `test` partitions. The pipeline normalizes geometry, deletes daytime
//! exposures, drops under-populated classes, converts color representation
//! and partitions the data with seeded, reproducible sampling.

pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod preprocess;
