use crate::pdf::{PdfView, Viewport};
use iced::widget::image::Handle;

use super::constants::CONTROL_COLUMN_WIDTH;

/// Height/width ratio of an A4 sheet; panes are clamped to it so a resized
/// window never distorts the spread.
const A4_RATIO: f32 = 1.414;
const PANE_CHROME: f32 = 30.0;

/// Sheet-display model: the open document plus the rasterized spread.
pub struct ViewerState {
    pub(in crate::app) view: Option<PdfView>,
    pub(in crate::app) pages: Vec<Handle>,
    pub(in crate::app) window_width: f32,
    pub(in crate::app) window_height: f32,
}

impl ViewerState {
    pub(in crate::app) fn new(window_width: f32, window_height: f32) -> Self {
        Self {
            view: None,
            pages: Vec::new(),
            window_width,
            window_height,
        }
    }

    pub(in crate::app) fn close(&mut self) {
        self.view = None;
        self.pages.clear();
    }

    pub(in crate::app) fn viewport(&self) -> Viewport {
        pane_viewport(self.window_width, self.window_height)
    }
}

/// Split the area right of the control column into two side-by-side panes,
/// each clamped to the A4 aspect ratio.
fn pane_viewport(window_width: f32, window_height: f32) -> Viewport {
    let usable_width = (window_width - CONTROL_COLUMN_WIDTH - PANE_CHROME).max(20.0);
    let usable_height = (window_height - PANE_CHROME).max(20.0);

    let mut pane_width = usable_width / 2.0;
    let mut pane_height = usable_height;
    pane_height = pane_height.min(pane_width * A4_RATIO);
    pane_width = pane_width.min(pane_height / A4_RATIO);

    Viewport {
        width: pane_width.max(1.0).round() as u32,
        height: pane_height.max(1.0).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_window_is_height_limited() {
        let viewport = pane_viewport(4000.0, 900.0);
        assert_eq!(viewport.height, 870);
        // Width backs off to keep the A4 ratio.
        assert!((viewport.width as f32 - 870.0 / A4_RATIO).abs() <= 1.0);
    }

    #[test]
    fn tall_window_is_width_limited() {
        let viewport = pane_viewport(1200.0, 4000.0);
        let pane_width = (1200.0 - CONTROL_COLUMN_WIDTH - PANE_CHROME) / 2.0;
        assert_eq!(viewport.width, pane_width as u32);
        assert!((viewport.height as f32 - pane_width * A4_RATIO).abs() <= 1.0);
    }

    #[test]
    fn tiny_window_still_yields_a_viewport() {
        let viewport = pane_viewport(100.0, 50.0);
        assert!(viewport.width >= 1);
        assert!(viewport.height >= 1);
    }
}
