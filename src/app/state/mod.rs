mod browser;
mod console;
mod constants;
mod editor;
mod playback;
mod viewer;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use iced::Task;
use tracing::warn;

use super::messages::Message;

pub(in crate::app) use browser::BrowserState;
pub(in crate::app) use console::ConsoleState;
pub(crate) use constants::*;
pub(in crate::app) use editor::{EditorMode, EditorState};
pub(in crate::app) use playback::PlaybackState;
pub(in crate::app) use viewer::ViewerState;

/// Core application state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) catalog: Catalog,
    pub(super) browser: BrowserState,
    pub(super) viewer: ViewerState,
    pub(super) playback: PlaybackState,
    pub(super) console: ConsoleState,
    pub(super) editor: Option<EditorState>,
    pub(super) last_error: Option<String>,
}

impl App {
    pub(super) fn bootstrap(catalog: Catalog, mut config: AppConfig) -> (App, Task<Message>) {
        clamp_config(&mut config);
        let browser = BrowserState::from_catalog(&catalog);
        let viewer = ViewerState::new(config.window_width, config.window_height);
        tracing::info!(
            entries = browser.entries.len(),
            tags = browser.tags.len(),
            "Initialized app state"
        );
        let app = App {
            config,
            catalog,
            browser,
            viewer,
            playback: PlaybackState::new(),
            console: ConsoleState::new(),
            editor: None,
            last_error: None,
        };
        (app, Task::none())
    }

    /// Runtime failure: log it, surface it in the banner, carry on.
    pub(super) fn report_error(&mut self, context: &str, err: anyhow::Error) {
        warn!("{context}: {err:#}");
        self.last_error = Some(format!("{context}: {err:#}"));
    }

    /// User-input failure: banner only, nothing else changes.
    pub(super) fn user_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}

fn clamp_config(config: &mut AppConfig) {
    config.window_width = config.window_width.clamp(320.0, 7680.0);
    config.window_height = config.window_height.clamp(240.0, 4320.0);
    config.base_dpi = config.base_dpi.clamp(MIN_BASE_DPI, MAX_BASE_DPI);
    config.audio_wait_secs = config.audio_wait_secs.clamp(0.0, MAX_AUDIO_WAIT_SECS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_values_are_clamped() {
        let mut config = AppConfig {
            window_width: 10.0,
            window_height: 100_000.0,
            base_dpi: 1.0,
            audio_wait_secs: 500.0,
            ..AppConfig::default()
        };
        clamp_config(&mut config);
        assert_eq!(config.window_width, 320.0);
        assert_eq!(config.window_height, 4320.0);
        assert_eq!(config.base_dpi, MIN_BASE_DPI);
        assert_eq!(config.audio_wait_secs, MAX_AUDIO_WAIT_SECS);
    }
}
