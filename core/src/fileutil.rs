//! File Utility Functions

use crate::error::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the absolute path after resolving the given path. Existing paths
/// are canonicalized; paths that do not exist yet are joined onto the
/// current directory.
///
/// * `path` - The path.
pub fn absolute_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.exists() {
        path.canonicalize().map_err(|e| Error::io(path, e))
    } else if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
        Ok(cwd.join(path))
    }
}

/// Creates the directory and its parents if they do not exist yet.
///
/// * `dir` - The directory.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        info!("Creating directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

/// Returns the lower case extension of a file path including the leading
/// period, e.g. `.exr`.
///
/// * `path` - The file path.
pub fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lower_case_with_period() {
        assert_eq!(extension("a/b/depth0001.EXR").as_deref(), Some(".exr"));
        assert_eq!(extension("disparity.npy").as_deref(), Some(".npy"));
        assert_eq!(extension("disparity"), None);
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir(&nested).unwrap();
        assert_eq!(absolute_path(&nested).unwrap(), nested.canonicalize().unwrap());
    }

    #[test]
    fn absolute_path_of_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("capture").join("lf");
        assert_eq!(absolute_path(&missing).unwrap(), missing);
        assert!(!missing.exists());

        let relative = absolute_path("not-yet/created").unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("not-yet/created"));
    }
}
