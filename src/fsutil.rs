//! Path checks and image directory enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions (lower-case, no dot) treated as images.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`], ignoring case.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str())
    })
}

/// # Errors
///
/// Returns [`Error::MissingPath`] if `path` does not exist.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

/// List the image files directly inside `dir`.
///
/// Subdirectories and files without an image extension are skipped. The order is whatever
/// the directory iteration yields; sort the result if you need it stable.
///
/// # Errors
///
/// Returns [`Error::MissingPath`] or [`Error::NotADirectory`] if `dir` is unusable, and
/// [`Error::Io`] if it cannot be read.
pub fn list_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_exists(dir)?;
    if !dir.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut image_paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            image_paths.push(path);
        }
    }
    Ok(image_paths)
}

/// Remove `dir` if present and create it again, empty.
///
/// # Errors
///
/// Returns [`Error::CreateDir`] if removal or creation fails.
pub fn clean_and_create_dir(dir: &Path) -> Result<()> {
    let to_err = |source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    };
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(to_err)?;
    }
    fs::create_dir_all(dir).map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file_ignores_case() {
        assert!(is_image_file(Path::new("a.JPG")));
        assert!(is_image_file(Path::new("dir/b.png")));
        assert!(is_image_file(Path::new("c.TiF")));
        assert!(!is_image_file(Path::new("c.txt")));
        assert!(!is_image_file(Path::new("d")));
        assert!(!is_image_file(Path::new(".png")));
    }

    #[test]
    fn test_list_image_paths_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.JPG", "b.png", "c.txt", "d"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut names: Vec<String> = list_image_paths(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.JPG", "b.png"]);
    }

    #[test]
    fn test_list_image_paths_missing_dir() {
        let err = list_image_paths(Path::new("/nonexistent/pixbridge")).unwrap_err();
        assert!(matches!(err, Error::MissingPath { .. }));
    }

    #[test]
    fn test_list_image_paths_on_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            list_image_paths(file.path()),
            Err(Error::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_clean_and_create_dir_recreates() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results/vis-api");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.png"), b"old").unwrap();

        clean_and_create_dir(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }
}
