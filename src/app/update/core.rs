use super::super::messages::Message;
use super::super::state::App;
use super::Effect;
use iced::event;
use iced::keyboard::{self, Key, Modifiers, key};
use iced::time;
use iced::window;
use iced::{Event, Subscription, Task};
use std::time::Duration;
use tracing::debug;

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> =
            vec![event::listen_with(runtime_event_to_message)];

        if app.playback.running {
            subscriptions.push(time::every(Duration::from_secs(1)).map(Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }

    fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::AssetFilterChanged(filter) => self.handle_asset_filter_changed(filter),
            Message::TagFilterChanged(filter) => self.handle_tag_filter_changed(filter),
            Message::EntrySelected(code) => self.handle_entry_selected(code),
            Message::Run => self.handle_run(&mut effects),
            Message::Stop => self.handle_stop(),
            Message::Pause => self.handle_pause(),
            Message::AudioWaitElapsed { path, token } => {
                self.handle_audio_wait_elapsed(path, token);
            }
            Message::NextPage => self.handle_next_page(&mut effects),
            Message::PrevPage => self.handle_prev_page(&mut effects),
            Message::ZoomIn => self.handle_zoom_in(&mut effects),
            Message::ZoomOut => self.handle_zoom_out(&mut effects),
            Message::OpenAddEditor => self.handle_open_add_editor(),
            Message::OpenEditEditor => self.handle_open_edit_editor(),
            Message::EditorNameChanged(value) => self.handle_editor_field(|e| e.name = value),
            Message::EditorPdfChanged(value) => self.handle_editor_field(|e| e.pdf = value),
            Message::EditorAudioChanged(value) => self.handle_editor_field(|e| e.audio = value),
            Message::EditorTagsChanged(value) => self.handle_editor_field(|e| e.tags = value),
            Message::EditorStartPageChanged(value) => {
                self.handle_editor_field(|e| e.start_page = value);
            }
            Message::EditorSave => self.handle_editor_save(&mut effects),
            Message::EditorCancel => self.handle_editor_cancel(),
            Message::DismissError => self.last_error = None,
            Message::Tick(now) => self.handle_tick(now),
            Message::WindowResized { width, height } => {
                self.handle_window_resized(width, height, &mut effects);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
        }

        effects
    }

    fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::RenderPages => {
                self.render_spread();
                Task::none()
            }
            Effect::ScheduleAudio { path, token } => {
                let wait = Duration::from_secs_f32(self.config.audio_wait_secs);
                Task::perform(tokio::time::sleep(wait), move |_| Message::AudioWaitElapsed {
                    path: path.clone(),
                    token,
                })
            }
            Effect::PersistEntry { code, record } => {
                match self.catalog.update_entry(&code, record) {
                    Ok(()) => {
                        self.browser.selected = Some(code.clone());
                        self.browser.refresh(&self.catalog);
                        self.console.push(format!("Saved '{code}'"));
                    }
                    Err(err) => self.report_error("Cannot save catalog", err),
                }
                Task::none()
            }
        }
    }

    fn shortcut_message_for_key(&self, key: Key, modifiers: Modifiers) -> Option<Message> {
        if self.editor.is_some() || !modifiers.is_empty() {
            return None;
        }
        match key {
            Key::Named(key::Named::ArrowUp | key::Named::PageUp) => Some(Message::PrevPage),
            Key::Named(key::Named::ArrowDown | key::Named::PageDown) => Some(Message::NextPage),
            Key::Character(ref c) => match c.as_str() {
                "+" => Some(Message::ZoomIn),
                "-" => Some(Message::ZoomOut),
                _ => None,
            },
            _ => {
                debug!(?key, "Unbound key");
                None
            }
        }
    }
}

fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(iced::window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
