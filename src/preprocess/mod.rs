pub mod augment;
pub mod colorspace;
pub mod resize;

pub use augment::Augmenter;
pub use colorspace::{convert_image, convert_partition, ColorMode, ConvertStats};
pub use resize::{resize_image, resize_partition, ResizeStats};
