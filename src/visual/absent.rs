//! Backend used when visualization support is compiled out.

use std::path::Path;

use crate::error::{Error, Result};

use super::{check_save_target, ImageSink, ImageSource, VisImage, VisPtr};

/// Loads nothing and refuses to save.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentBackend;

impl ImageSource for AbsentBackend {
    fn load(&self, path: &Path) -> Option<VisPtr> {
        tracing::warn!(
            "Visualization support is disabled, not loading {}",
            path.display()
        );
        None
    }
}

impl ImageSink for AbsentBackend {
    fn save(&self, image: Option<&VisImage>, path: &Path) -> Result<()> {
        check_save_target(image, path)?;
        Err(Error::VisualizationDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_backend_never_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        image::DynamicImage::new_rgb8(1, 1).save(&path).unwrap();
        assert!(AbsentBackend.load(&path).is_none());

        let vis = VisImage::allocate(1, 1, 3);
        assert!(matches!(
            AbsentBackend.save(Some(&vis), &path),
            Err(Error::VisualizationDisabled)
        ));
        assert!(matches!(
            AbsentBackend.save(None, &path),
            Err(Error::NullImage { .. })
        ));
    }
}
