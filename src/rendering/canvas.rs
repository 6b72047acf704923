use eink_palette::Rgb;
use std::path::Path;
use tiny_skia::{FilterQuality, Paint, Pixmap, PixmapPaint, Rect, Transform};

use crate::error::CanvasError;

/// Full-color raster that regions are composited onto.
///
/// Every placement is bounds-checked: a region that does not lie fully
/// inside the canvas is an error, never silently clipped.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Opaque white canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::PixmapAllocation { width, height })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self { pixmap })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Fail unless `(x, y, width, height)` lies inside the canvas.
    pub fn check_bounds(&self, x: u32, y: u32, width: u32, height: u32) -> Result<(), CanvasError> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width());
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height());
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(CanvasError::OutOfBounds {
                x,
                y,
                width,
                height,
                canvas_width: self.width(),
                canvas_height: self.height(),
            })
        }
    }

    /// Fill a rectangle with an opaque color.
    pub fn fill_rect(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgb,
    ) -> Result<(), CanvasError> {
        self.check_bounds(x, y, width, height)?;
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            // Zero-sized
            return Ok(());
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    /// Composite `source` at `(x, y)` with source-over blending.
    ///
    /// Fully transparent source pixels leave the canvas untouched.
    pub fn paste(&mut self, source: &Pixmap, x: u32, y: u32) -> Result<(), CanvasError> {
        self.check_bounds(x, y, source.width(), source.height())?;
        self.pixmap.draw_pixmap(
            x as i32,
            y as i32,
            source.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Paste another canvas.
    pub fn paste_canvas(&mut self, source: &Canvas, x: u32, y: u32) -> Result<(), CanvasError> {
        self.paste(&source.pixmap, x, y)
    }

    /// Scale `source` to `width` x `height` and composite it at `(x, y)`.
    pub fn paste_scaled(
        &mut self,
        source: &Pixmap,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        smooth: bool,
    ) -> Result<(), CanvasError> {
        self.check_bounds(x, y, width, height)?;
        let mut scaled =
            Pixmap::new(width, height).ok_or(CanvasError::PixmapAllocation { width, height })?;

        let paint = PixmapPaint {
            quality: if smooth {
                FilterQuality::Bicubic
            } else {
                FilterQuality::Nearest
            },
            ..PixmapPaint::default()
        };
        let transform = Transform::from_scale(
            width as f32 / source.width() as f32,
            height as f32 / source.height() as f32,
        );
        scaled.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

        self.paste(&scaled, x, y)
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Write the canvas as a PNG for inspection; failures are logged only.
    pub fn dump(&self, dir: &Path, name: &str) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), %e, "Failed to create dump directory");
            return;
        }
        let path = dir.join(name);
        match self.pixmap.save_png(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Dumped canvas"),
            Err(e) => tracing::warn!(path = %path.display(), %e, "Failed to dump canvas"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_square(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        pixmap
    }

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.to_rgba().chunks(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_size_allocation_fails() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(CanvasError::PixmapAllocation { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.fill_rect(2, 3, 4, 1, Rgb::BLACK).unwrap();
        assert_eq!(canvas.pixel(2, 3), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 3), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(6, 3), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(2, 4), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_rect_out_of_bounds() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let result = canvas.fill_rect(8, 0, 3, 1, Rgb::BLACK);
        assert!(matches!(result, Err(CanvasError::OutOfBounds { x: 8, .. })));
    }

    #[test]
    fn test_paste_out_of_bounds_is_error() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let result = canvas.paste(&red_square(4), 7, 0);
        assert!(matches!(result, Err(CanvasError::OutOfBounds { .. })));
        // Nothing was drawn
        assert_eq!(canvas.pixel(9, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_paste_transparent_leaves_destination() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.fill_rect(0, 0, 4, 4, Rgb::BLACK).unwrap();

        let transparent = Pixmap::new(4, 4).unwrap();
        canvas.paste(&transparent, 0, 0).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_paste_opaque_region() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.paste(&red_square(2), 6, 6).unwrap();
        assert_eq!(canvas.pixel(7, 7), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_paste_scaled_fills_target() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas
            .paste_scaled(&red_square(2), 0, 0, 10, 10, false)
            .unwrap();
        assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(9, 9), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(10, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_dump_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let canvas = Canvas::new(3, 3).unwrap();
        canvas.dump(dir.path(), "composite.png");
        assert!(dir.path().join("composite.png").exists());
    }
}
