//! Sheet-music page viewer backed by pdfium.
//!
//! The viewer owns one open document, a 0-based page cursor, and a crop
//! margin that doubles as the zoom control: a larger margin crops more of the
//! page edge before the remainder is scaled to the viewport, so the content
//! appears bigger. All geometry is computed in `ViewGeometry` so it can be
//! tested without a rasterizer.

use anyhow::{Context, Result};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Crop fraction applied to each page side on a freshly opened document.
pub const DEFAULT_VIEW_MARGIN: f32 = 0.05;
pub const MIN_VIEW_MARGIN: f32 = 0.0;
pub const MAX_VIEW_MARGIN: f32 = 0.2;
pub const VIEW_MARGIN_STEP: f32 = 0.01;

/// Bounds-clamped page position within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    index: usize,
    page_count: usize,
}

impl PageCursor {
    pub fn new(page_count: usize) -> Self {
        Self {
            index: 0,
            page_count,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Clamp into `[0, page_count - 1]`.
    pub fn go_to(&mut self, page: usize) {
        self.index = page.min(self.page_count.saturating_sub(1));
    }

    /// Advance by `step`, stopping where a full spread of `step` pages still
    /// fits. With fewer pages than `step` the cursor stays at 0.
    pub fn next(&mut self, step: usize) {
        self.index = (self.index + step).min(self.page_count.saturating_sub(step));
    }

    pub fn prev(&mut self, step: usize) {
        self.index = self.index.saturating_sub(step);
    }
}

/// Target raster area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A rendered page, RGBA8.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Raster plan for one page: full-page raster size plus the crop window that
/// removes the view margin.
///
/// The DPI is derived as `base_dpi * viewport_height / cropped_height` so the
/// cropped region always fills the viewport height exactly (at
/// `base_dpi = 72` the crop height equals the viewport height in pixels;
/// larger values supersample by the same factor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    pub full_width_px: u32,
    pub full_height_px: u32,
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub dpi: f32,
}

impl ViewGeometry {
    pub fn compute(
        page_width_pt: f32,
        page_height_pt: f32,
        margin: f32,
        base_dpi: f32,
        viewport: Viewport,
    ) -> Self {
        // The margin is a fraction of the page width, applied to all four
        // sides, mirroring how the sheet edges are trimmed on paper.
        let margin_pt = margin * page_width_pt;
        let cropped_height_pt = (page_height_pt - 2.0 * margin_pt).max(1.0);
        let dpi = base_dpi * viewport.height as f32 / cropped_height_pt;
        let scale = dpi / 72.0;

        let full_width_px = (page_width_pt * scale).round().max(1.0) as u32;
        let full_height_px = (page_height_pt * scale).round().max(1.0) as u32;
        let crop_x = (margin_pt * scale).round() as u32;
        let crop_y = crop_x;
        let crop_width = full_width_px.saturating_sub(2 * crop_x).max(1);
        let crop_height = ((cropped_height_pt * scale).round() as u32)
            .min(full_height_px.saturating_sub(crop_y))
            .max(1);

        Self {
            full_width_px,
            full_height_px,
            crop_x,
            crop_y,
            crop_width,
            crop_height,
            dpi,
        }
    }
}

/// One open PDF with its view state. The pdfium handle is owned exclusively
/// by this value for as long as the document stays open.
pub struct PdfView {
    document: PdfDocument<'static>,
    cursor: PageCursor,
    margin: f32,
    base_dpi: f32,
}

impl PdfView {
    /// Open a document and position the cursor on the first page.
    pub fn open(path: &Path, base_dpi: f32) -> Result<Self> {
        let pdfium = init_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|err| anyhow::anyhow!(err))
            .with_context(|| format!("Opening PDF {}", path.display()))?;
        let page_count = document.pages().len() as usize;
        info!(path = %path.display(), pages = page_count, "Opened PDF");
        Ok(Self {
            document,
            cursor: PageCursor::new(page_count),
            margin: DEFAULT_VIEW_MARGIN,
            base_dpi,
        })
    }

    pub fn page_count(&self) -> usize {
        self.cursor.page_count()
    }

    pub fn current_page(&self) -> usize {
        self.cursor.index()
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.cursor.go_to(page);
        debug!(page = self.cursor.index(), "Jumped to page");
    }

    pub fn next_page(&mut self, step: usize) {
        self.cursor.next(step);
    }

    pub fn prev_page(&mut self, step: usize) {
        self.cursor.prev(step);
    }

    pub fn zoom_in(&mut self) {
        self.margin = (self.margin + VIEW_MARGIN_STEP).clamp(MIN_VIEW_MARGIN, MAX_VIEW_MARGIN);
    }

    pub fn zoom_out(&mut self) {
        self.margin = (self.margin - VIEW_MARGIN_STEP).clamp(MIN_VIEW_MARGIN, MAX_VIEW_MARGIN);
    }

    /// Rasterize the page at `cursor + page_offset` for the viewport.
    /// Returns `None` when the requested index is past the last page, so a
    /// half-filled spread renders as a single pane instead of an error.
    pub fn render_page(&self, viewport: Viewport, page_offset: usize) -> Result<Option<PageImage>> {
        let index = self.cursor.index() + page_offset;
        if index >= self.cursor.page_count() || viewport.width == 0 || viewport.height == 0 {
            return Ok(None);
        }
        let index = u16::try_from(index).context("Page index out of range")?;
        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|err| anyhow::anyhow!(err))
            .context("Fetching page")?;

        let geometry = ViewGeometry::compute(
            page.width().value,
            page.height().value,
            self.margin,
            self.base_dpi,
            viewport,
        );
        let config = PdfRenderConfig::new()
            .set_target_width(geometry.full_width_px as i32)
            .set_target_height(geometry.full_height_px as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| anyhow::anyhow!(err))
            .context("Rasterizing page")?;

        let width = bitmap.width().max(0) as u32;
        let height = bitmap.height().max(0) as u32;
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let full = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
            .context("Assembling page bitmap")?;

        // pdfium may round the raster size; re-clamp the crop window to what
        // actually came back.
        let crop_x = geometry.crop_x.min(width.saturating_sub(1));
        let crop_y = geometry.crop_y.min(height.saturating_sub(1));
        let crop_width = geometry.crop_width.min(width - crop_x).max(1);
        let crop_height = geometry.crop_height.min(height - crop_y).max(1);
        let cropped =
            image::imageops::crop_imm(&full, crop_x, crop_y, crop_width, crop_height).to_image();

        debug!(
            page = index,
            width = cropped.width(),
            height = cropped.height(),
            dpi = geometry.dpi,
            "Rendered page"
        );
        Ok(Some(PageImage {
            width: cropped.width(),
            height: cropped.height(),
            rgba: cropped.into_raw(),
        }))
    }
}

/// Bind pdfium from the working directory first, then the system library.
fn init_pdfium() -> Result<&'static Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| anyhow::anyhow!(err))
        .context("Binding to the pdfium library")?;
    Ok(Box::leak(Box::new(Pdfium::new(bindings))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_never_leaves_page_range() {
        let mut cursor = PageCursor::new(9);
        for _ in 0..20 {
            cursor.next(2);
            assert!(cursor.index() < 9);
        }
        assert_eq!(cursor.index(), 7);
        for _ in 0..20 {
            cursor.prev(2);
            assert!(cursor.index() < 9);
        }
        assert_eq!(cursor.index(), 0);

        cursor.next(1);
        assert_eq!(cursor.index(), 1);
        cursor.go_to(100);
        assert_eq!(cursor.index(), 8);
        cursor.next(3);
        assert_eq!(cursor.index(), 6);
    }

    #[test]
    fn cursor_with_fewer_pages_than_step_stays_put() {
        let mut cursor = PageCursor::new(1);
        cursor.next(2);
        assert_eq!(cursor.index(), 0);
        cursor.prev(2);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn margin_saturates_after_twenty_one_zoom_steps() {
        let mut margins = DEFAULT_VIEW_MARGIN;
        for _ in 0..21 {
            margins = (margins + VIEW_MARGIN_STEP).clamp(MIN_VIEW_MARGIN, MAX_VIEW_MARGIN);
        }
        assert!((margins - MAX_VIEW_MARGIN).abs() < 1e-6);
        for _ in 0..40 {
            margins = (margins - VIEW_MARGIN_STEP).clamp(MIN_VIEW_MARGIN, MAX_VIEW_MARGIN);
        }
        assert!((margins - MIN_VIEW_MARGIN).abs() < 1e-6);
    }

    #[test]
    fn geometry_fills_viewport_height_at_base_dpi() {
        let viewport = Viewport {
            width: 600,
            height: 840,
        };
        for margin in [0.0, 0.05, 0.2] {
            let geometry = ViewGeometry::compute(595.0, 842.0, margin, 72.0, viewport);
            assert_eq!(geometry.crop_height, viewport.height);
        }
    }

    #[test]
    fn geometry_crop_window_stays_inside_raster() {
        let viewport = Viewport {
            width: 400,
            height: 700,
        };
        let geometry = ViewGeometry::compute(612.0, 792.0, 0.2, 72.0, viewport);
        assert!(geometry.crop_x + geometry.crop_width <= geometry.full_width_px);
        assert!(geometry.crop_y + geometry.crop_height <= geometry.full_height_px);
    }

    #[test]
    fn geometry_supersamples_with_higher_base_dpi() {
        let viewport = Viewport {
            width: 600,
            height: 800,
        };
        let base = ViewGeometry::compute(595.0, 842.0, 0.05, 72.0, viewport);
        let sharp = ViewGeometry::compute(595.0, 842.0, 0.05, 144.0, viewport);
        assert_eq!(sharp.crop_height, base.crop_height * 2);
    }
}
