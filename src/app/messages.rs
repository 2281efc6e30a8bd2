use iced::keyboard::{Key, Modifiers};
use std::time::Instant;

/// Messages emitted by the UI.
#[derive(Debug, Clone)]
pub enum Message {
    AssetFilterChanged(AssetFilter),
    TagFilterChanged(TagFilter),
    EntrySelected(String),
    Run,
    Stop,
    Pause,
    /// The preparation delay before a scheduled track ran out. The token
    /// identifies the run that scheduled it; stale tokens are dropped.
    AudioWaitElapsed {
        path: String,
        token: u64,
    },
    NextPage,
    PrevPage,
    ZoomIn,
    ZoomOut,
    OpenAddEditor,
    OpenEditEditor,
    EditorNameChanged(String),
    EditorPdfChanged(String),
    EditorAudioChanged(String),
    EditorTagsChanged(String),
    EditorStartPageChanged(String),
    EditorSave,
    EditorCancel,
    DismissError,
    Tick(Instant),
    WindowResized {
        width: f32,
        height: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
}

/// Which asset combination the list is narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFilter {
    All,
    AudioAndPdf,
    AudioOnly,
    PdfOnly,
}

/// Tag narrowing: everything, or entries carrying one specific tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    Any,
    Tag(String),
}
