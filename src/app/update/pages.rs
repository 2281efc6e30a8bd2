use super::super::state::{App, PAGE_STEP};
use super::Effect;
use iced::widget::image::Handle;
use tracing::debug;

impl App {
    pub(super) fn handle_next_page(&mut self, effects: &mut Vec<Effect>) {
        if !self.playback.running {
            return;
        }
        if let Some(view) = &mut self.viewer.view {
            view.next_page(PAGE_STEP);
            debug!(page = view.current_page(), "Turned forward");
            effects.push(Effect::RenderPages);
        }
    }

    pub(super) fn handle_prev_page(&mut self, effects: &mut Vec<Effect>) {
        if !self.playback.running {
            return;
        }
        if let Some(view) = &mut self.viewer.view {
            view.prev_page(PAGE_STEP);
            debug!(page = view.current_page(), "Turned back");
            effects.push(Effect::RenderPages);
        }
    }

    pub(super) fn handle_zoom_in(&mut self, effects: &mut Vec<Effect>) {
        if !self.playback.running {
            return;
        }
        if let Some(view) = &mut self.viewer.view {
            view.zoom_in();
            debug!(margin = view.margin(), "Zoomed in");
            effects.push(Effect::RenderPages);
        }
    }

    pub(super) fn handle_zoom_out(&mut self, effects: &mut Vec<Effect>) {
        if !self.playback.running {
            return;
        }
        if let Some(view) = &mut self.viewer.view {
            view.zoom_out();
            debug!(margin = view.margin(), "Zoomed out");
            effects.push(Effect::RenderPages);
        }
    }

    pub(super) fn handle_window_resized(
        &mut self,
        width: f32,
        height: f32,
        effects: &mut Vec<Effect>,
    ) {
        self.viewer.window_width = width;
        self.viewer.window_height = height;
        if self.viewer.view.is_some() {
            effects.push(Effect::RenderPages);
        }
    }

    /// Rasterize the current spread into image handles for the view. A page
    /// past the end of the document simply leaves its pane empty.
    pub(super) fn render_spread(&mut self) {
        let mut rendered = Vec::new();
        let mut failure = None;

        if let Some(view) = &self.viewer.view {
            let viewport = self.viewer.viewport();
            for offset in 0..PAGE_STEP {
                match view.render_page(viewport, offset) {
                    Ok(Some(image)) => {
                        rendered.push(Handle::from_rgba(image.width, image.height, image.rgba));
                    }
                    Ok(None) => break,
                    Err(err) => {
                        failure = Some(err);
                        break;
                    }
                }
            }
        }

        self.viewer.pages = rendered;
        if let Some(err) = failure {
            self.report_error("Cannot render page", err);
        }
    }
}
