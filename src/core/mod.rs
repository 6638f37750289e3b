pub mod classifier;
pub mod filter;
pub mod operations;
pub mod pipeline;
pub mod splitter;

pub use classifier::{classify_image, classify_tree, ClassifyStats, DayNight};
pub use filter::{remove_small_classes, FilterStats};
pub use pipeline::{run, CurationSummary};
pub use splitter::{split_partition, SplitStats};
