use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::error::{CurationError, CurationResult};

/// Move a file from source to destination using copy + remove pattern
/// for cross-drive compatibility.
///
/// Refuses to overwrite: a pre-existing destination file is a collision,
/// never a silent replacement.
///
/// # Arguments
/// * `src` - Source file path
/// * `dest` - Destination file path
///
/// # Returns
/// * `Ok(())` if successful
/// * `Err(CurationError)` on collision or if copy/remove failed
pub fn move_file(src: &Path, dest: &Path) -> CurationResult<()> {
    debug!("Moving file from {:?} to {:?}", src, dest);

    if dest.exists() {
        error!("Move target already exists: {:?}", dest);
        return Err(CurationError::MoveCollision(dest.to_path_buf()));
    }

    // Copy the file to the destination
    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(CurationError::Io(e));
    }

    // Remove the original file after successful copy
    if let Err(e) = fs::remove_file(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, e);
        // Clean up the destination so the image keeps a single identity
        let _ = fs::remove_file(dest);
        return Err(CurationError::Io(e));
    }

    Ok(())
}

/// Delete an image from storage, tolerating an already-missing path.
///
/// A `NotFound` from the filesystem means the image is already gone, which is
/// the state the caller asked for, so it is treated as success.
pub fn remove_image(path: &Path) -> CurationResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Image already removed: {:?}", path);
            Ok(())
        }
        Err(e) => {
            error!("Failed to remove image {:?}: {}", path, e);
            Err(CurationError::Io(e))
        }
    }
}

/// Remove a class directory and all of its contents
pub fn remove_class_dir(path: &Path) -> CurationResult<()> {
    fs::remove_dir_all(path).map_err(|e| {
        error!("Failed to remove class directory {:?}: {}", path, e);
        CurationError::Io(e)
    })
}
