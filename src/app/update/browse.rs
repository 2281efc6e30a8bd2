use super::super::messages::{AssetFilter, TagFilter};
use super::super::state::App;
use super::Effect;
use crate::pdf::PdfView;
use std::path::Path;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_asset_filter_changed(&mut self, filter: AssetFilter) {
        // Mirrors the original wiring: filters are frozen while an item runs.
        if self.playback.running {
            return;
        }
        debug!(?filter, "Asset filter changed");
        self.browser.asset_filter = filter;
        self.browser.apply_filters();
    }

    pub(super) fn handle_tag_filter_changed(&mut self, filter: TagFilter) {
        if self.playback.running {
            return;
        }
        debug!(?filter, "Tag filter changed");
        self.browser.tag_filter = filter;
        self.browser.apply_filters();
    }

    pub(super) fn handle_entry_selected(&mut self, code: String) {
        debug!(code, "Entry selected");
        self.browser.selected = Some(code);
    }

    /// Open the selected entry: sheet first, then the backing track after the
    /// preparation wait. Running while something else runs switches items.
    pub(super) fn handle_run(&mut self, effects: &mut Vec<Effect>) {
        if self.editor.is_some() {
            return;
        }
        let Some(entry) = self.browser.selected_entry() else {
            self.user_error("Nothing is selected in the list");
            return;
        };
        let code = entry.code.clone();
        let display_name = entry.display_name.clone();
        let Some(record) = self.catalog.record(&code).cloned() else {
            self.user_error(format!("Cannot find document '{code}'"));
            return;
        };

        self.playback.run_token = self.playback.run_token.wrapping_add(1);
        self.playback.player.stop();
        self.playback.running = false;
        self.viewer.close();
        self.last_error = None;
        self.console.push(format!("Running {display_name}..."));
        info!(code, "Running entry");

        if let Some(pdf) = &record.pdf {
            let expanded = self.catalog.expand_path(pdf);
            self.console.push(format!("Opening PDF: {pdf}"));
            match PdfView::open(Path::new(&expanded), self.config.base_dpi) {
                Ok(mut view) => {
                    if let Some(page) = record.page_num {
                        view.go_to_page(page);
                    }
                    self.viewer.view = Some(view);
                    effects.push(Effect::RenderPages);
                }
                Err(err) => self.report_error("Cannot open PDF", err),
            }
        }

        if let Some(audio) = &record.audio {
            self.console.push(format!(
                "Preparation wait ({:.0} seconds)...",
                self.config.audio_wait_secs
            ));
            effects.push(Effect::ScheduleAudio {
                path: audio.clone(),
                token: self.playback.run_token,
            });
        }

        self.playback.running = true;
        self.console.push("In progress...");
    }

    pub(super) fn handle_open_add_editor(&mut self) {
        if self.playback.running {
            return;
        }
        self.editor = Some(super::super::state::EditorState::add());
    }

    pub(super) fn handle_open_edit_editor(&mut self) {
        if self.playback.running {
            return;
        }
        let Some(entry) = self.browser.selected_entry() else {
            self.user_error("Nothing is selected in the list");
            return;
        };
        let code = entry.code.clone();
        let Some(record) = self.catalog.record(&code) else {
            self.user_error(format!("Cannot find document '{code}'"));
            return;
        };
        self.editor = Some(super::super::state::EditorState::edit(&code, record));
    }
}
