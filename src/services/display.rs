use eink_palette::IndexedImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DisplayError;
use crate::models::DisplaySpec;
use crate::rendering::encode_indexed_png;

/// A device that shows indexed images.
pub trait DisplayDriver {
    /// Geometry, native palette and orientation of the device.
    fn spec(&self) -> &DisplaySpec;

    /// Show `image`, which must already be oriented for the device.
    fn push(&mut self, image: &IndexedImage) -> Result<(), DisplayError>;
}

/// Display stand-in that writes each pushed image to a PNG file.
///
/// With bitplanes enabled, one PBM (P4) file per real palette color is
/// written next to the PNG as `<stem>-plane<index>.pbm`; set bits mark
/// pixels showing that color.
pub struct PngFileDisplay {
    spec: DisplaySpec,
    path: PathBuf,
    bitplanes: bool,
}

impl PngFileDisplay {
    pub fn new(spec: DisplaySpec, path: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            path: path.into(),
            bitplanes: false,
        }
    }

    pub fn with_bitplanes(mut self, enabled: bool) -> Self {
        self.bitplanes = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the bitplane for palette `index`.
    pub fn plane_path(&self, index: usize) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "display".to_string());
        self.path.with_file_name(format!("{stem}-plane{index}.pbm"))
    }

    fn write_bitplanes(&self, image: &IndexedImage) -> Result<(), DisplayError> {
        for index in 0..image.palette().len() {
            let mask = image.mask(&[index as u8]);
            let mut data = format!("P4\n{} {}\n", mask.width(), mask.height()).into_bytes();
            data.extend_from_slice(&mask.to_packed_bits());

            let path = self.plane_path(index);
            fs::write(&path, data)?;
            tracing::debug!(path = %path.display(), index, pixels = mask.count_on(), "Wrote bitplane");
        }
        Ok(())
    }
}

impl DisplayDriver for PngFileDisplay {
    fn spec(&self) -> &DisplaySpec {
        &self.spec
    }

    fn push(&mut self, image: &IndexedImage) -> Result<(), DisplayError> {
        let (width, height) = (self.spec.width, self.spec.height);
        if image.width() != width as usize || image.height() != height as usize {
            return Err(DisplayError::SizeMismatch {
                width,
                height,
                actual_width: image.width() as u32,
                actual_height: image.height() as u32,
            });
        }

        let png = encode_indexed_png(image)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, &png)?;
        tracing::info!(path = %self.path.display(), bytes = png.len(), "Pushed image");

        if self.bitplanes {
            self.write_bitplanes(image)?;
        }
        Ok(())
    }
}
