use super::super::state::{App, EditorState};
use super::Effect;
use tracing::debug;

impl App {
    pub(super) fn handle_editor_field(&mut self, apply: impl FnOnce(&mut EditorState)) {
        if let Some(editor) = &mut self.editor {
            apply(editor);
        }
    }

    pub(super) fn handle_editor_save(&mut self, effects: &mut Vec<Effect>) {
        let Some(editor) = &self.editor else {
            return;
        };
        match editor.to_record() {
            Err(message) => self.user_error(message),
            Ok(record) => {
                let code = editor.code();
                debug!(code, "Editor form accepted");
                self.editor = None;
                self.last_error = None;
                effects.push(Effect::PersistEntry { code, record });
            }
        }
    }

    pub(super) fn handle_editor_cancel(&mut self) {
        self.editor = None;
        self.last_error = None;
    }
}
