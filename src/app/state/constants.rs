use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;

/// Pages shown and advanced per spread.
pub(crate) const PAGE_STEP: usize = 2;
/// Width reserved for the control column, in logical pixels.
pub(crate) const CONTROL_COLUMN_WIDTH: f32 = 440.0;
pub(crate) const MIN_BASE_DPI: f32 = 36.0;
pub(crate) const MAX_BASE_DPI: f32 = 300.0;
pub(crate) const MAX_AUDIO_WAIT_SECS: f32 = 30.0;
pub(crate) const CONSOLE_MAX_LINES: usize = 200;
pub(crate) static LIST_SCROLL_ID: Lazy<ScrollId> = Lazy::new(|| ScrollId::new("entry-list"));
