mod file_ops;

pub use file_ops::{move_file, remove_class_dir, remove_image};
