mod messages;
mod state;
mod update;
mod view;

pub use messages::Message;
pub use state::App;

use crate::catalog::Catalog;
use crate::config::{AppConfig, ThemeMode};
use iced::{Size, Theme, window};

/// Helper to launch the app with the loaded catalog and configuration.
pub fn run_app(catalog: Catalog, config: AppConfig) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };

    iced::application("Music Practice Helper", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| {
            if matches!(app.config.theme, ThemeMode::Night) {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
        .run_with(move || App::bootstrap(catalog, config))
}
