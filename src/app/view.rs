use super::messages::{AssetFilter, Message, TagFilter};
use super::state::{App, CONTROL_COLUMN_WIDTH, EditorMode, EditorState, LIST_SCROLL_ID};
use crate::player::PlayerState;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{
    Column, Row, button, column, container, horizontal_space, image, progress_bar, radio, row,
    scrollable, text, text_input,
};
use iced::{Element, Length};

const CONSOLE_VISIBLE_LINES: usize = 8;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let controls = container(self.control_column())
            .width(Length::Fixed(CONTROL_COLUMN_WIDTH))
            .height(Length::Fill);

        let right: Element<'_, Message> = if let Some(editor) = &self.editor {
            self.editor_panel(editor)
        } else {
            self.spread_panel()
        };

        row![controls, right].spacing(12).padding(8).into()
    }

    fn control_column(&self) -> Element<'_, Message> {
        let running = self.playback.running;

        let mut content: Column<'_, Message> =
            column![text("Pick any song or tune from the list")].spacing(8);

        if let Some(error) = &self.last_error {
            content = content.push(
                container(
                    row![
                        text(error.as_str()).width(Length::Fill),
                        button("Dismiss").on_press(Message::DismissError)
                    ]
                    .spacing(8)
                    .align_y(Vertical::Center),
                )
                .padding(8)
                .width(Length::Fill)
                .style(container::rounded_box),
            );
        }

        content = content.push(self.asset_filter_row());
        content = content.push(self.tag_filter_row());

        let add_button = if running {
            button("Add")
        } else {
            button("Add").on_press(Message::OpenAddEditor)
        };
        let edit_button = if !running && self.browser.selected.is_some() {
            button("Edit").on_press(Message::OpenEditEditor)
        } else {
            button("Edit")
        };
        content = content.push(row![add_button, edit_button].spacing(8));

        content = content.push(self.entry_list());
        content = content.push(self.console_panel());
        content = content.push(self.progress_row());
        content = content.push(self.transport_row());

        content.height(Length::Fill).into()
    }

    fn asset_filter_row(&self) -> Element<'_, Message> {
        let selected = Some(self.browser.asset_filter);
        row![
            text("Filter:"),
            radio("all", AssetFilter::All, selected, Message::AssetFilterChanged),
            radio(
                "audio & PDF",
                AssetFilter::AudioAndPdf,
                selected,
                Message::AssetFilterChanged
            ),
            radio(
                "audio only",
                AssetFilter::AudioOnly,
                selected,
                Message::AssetFilterChanged
            ),
            radio(
                "PDF only",
                AssetFilter::PdfOnly,
                selected,
                Message::AssetFilterChanged
            ),
        ]
        .spacing(8)
        .align_y(Vertical::Center)
        .into()
    }

    /// Radios for Any plus every tag in the catalog. Radio values are indices
    /// into that list since the tag set is only known at runtime.
    fn tag_filter_row(&self) -> Element<'_, Message> {
        let selected = match &self.browser.tag_filter {
            TagFilter::Any => Some(0),
            TagFilter::Tag(tag) => self
                .browser
                .tags
                .iter()
                .position(|t| t == tag)
                .map(|idx| idx + 1),
        };

        let mut tags_row: Row<'_, Message> = row![
            text("Tags:"),
            radio("Any", 0usize, selected, |_| {
                Message::TagFilterChanged(TagFilter::Any)
            })
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        for (idx, tag) in self.browser.tags.iter().enumerate() {
            let chosen = tag.clone();
            tags_row = tags_row.push(radio(tag.as_str(), idx + 1, selected, move |_| {
                Message::TagFilterChanged(TagFilter::Tag(chosen))
            }));
        }

        tags_row.into()
    }

    fn entry_list(&self) -> Element<'_, Message> {
        let mut list: Column<'_, Message> = Column::new().spacing(2).width(Length::Fill);
        for entry in &self.browser.visible {
            let is_selected = self.browser.selected.as_deref() == Some(entry.code.as_str());
            let style: fn(&iced::Theme, button::Status) -> button::Style = if is_selected {
                button::primary
            } else {
                button::text
            };
            list = list.push(
                button(text(entry.display_name.clone()))
                    .style(style)
                    .width(Length::Fill)
                    .on_press(Message::EntrySelected(entry.code.clone())),
            );
        }

        scrollable(list)
            .id(LIST_SCROLL_ID.clone())
            .height(Length::Fill)
            .into()
    }

    fn console_panel(&self) -> Element<'_, Message> {
        let lines: Vec<&str> = self.console.lines().collect();
        let start = lines.len().saturating_sub(CONSOLE_VISIBLE_LINES);
        let recent = Column::with_children(
            lines[start..]
                .iter()
                .map(|line| text(line.to_string()).size(13).into()),
        )
        .spacing(2);

        container(recent)
            .width(Length::Fill)
            .height(Length::Fixed(150.0))
            .padding(8)
            .style(container::rounded_box)
            .into()
    }

    fn progress_row(&self) -> Element<'_, Message> {
        let length = self.playback.player.length().unwrap_or(0);
        let position = self.playback.player.position().unwrap_or(0);
        row![
            progress_bar(0.0..=length.max(1) as f32, position as f32)
                .height(Length::Fixed(14.0)),
            text(format!("{position}/{length} s")).size(13),
        ]
        .spacing(8)
        .align_y(Vertical::Center)
        .into()
    }

    fn transport_row(&self) -> Element<'_, Message> {
        let running = self.playback.running;
        let has_sheet = self.viewer.view.is_some();

        let run_button = if self.editor.is_none() {
            button("Run").on_press(Message::Run)
        } else {
            button("Run")
        };
        let pause_label = match self.playback.player.state() {
            PlayerState::Paused => "Resume",
            PlayerState::Idle | PlayerState::Playing => "Pause",
        };
        let pause_button = if running {
            button(pause_label).on_press(Message::Pause)
        } else {
            button(pause_label)
        };
        let stop_button = if running {
            button("Stop").on_press(Message::Stop)
        } else {
            button("Stop")
        };

        let page_button = |label: &'static str, message: Message| {
            if running && has_sheet {
                button(label).on_press(message)
            } else {
                button(label)
            }
        };

        row![
            run_button,
            pause_button,
            stop_button,
            horizontal_space(),
            page_button("+", Message::ZoomIn),
            page_button("-", Message::ZoomOut),
            page_button("Prev", Message::PrevPage),
            page_button("Next", Message::NextPage),
        ]
        .spacing(8)
        .into()
    }

    fn spread_panel(&self) -> Element<'_, Message> {
        if self.viewer.pages.is_empty() {
            return container(text(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let mut panes: Row<'_, Message> = Row::new().spacing(8);
        for handle in &self.viewer.pages {
            panes = panes.push(image(handle.clone()));
        }

        container(panes)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Top)
            .into()
    }

    fn editor_panel<'a>(&'a self, editor: &'a EditorState) -> Element<'a, Message> {
        let title = match &editor.mode {
            EditorMode::Add => "Add New Entry",
            EditorMode::Edit { .. } => "Edit Entry",
        };

        let field = |label: &'static str, input: Element<'a, Message>| {
            row![text(label).width(Length::Fixed(90.0)), input]
                .spacing(8)
                .align_y(Vertical::Center)
        };

        let form = column![
            text(title).size(20),
            field(
                "Name",
                text_input("Song or tune name", &editor.name)
                    .on_input(Message::EditorNameChanged)
                    .into()
            ),
            field(
                "PDF",
                text_input("Path to the sheet PDF", &editor.pdf)
                    .on_input(Message::EditorPdfChanged)
                    .into()
            ),
            field(
                "Audio",
                text_input("Path to the backing track", &editor.audio)
                    .on_input(Message::EditorAudioChanged)
                    .into()
            ),
            field(
                "Tags",
                text_input("Comma-separated tags", &editor.tags)
                    .on_input(Message::EditorTagsChanged)
                    .into()
            ),
            field(
                "Start page",
                text_input("0-based page to open at", &editor.start_page)
                    .on_input(Message::EditorStartPageChanged)
                    .into()
            ),
            row![
                button("Save").on_press(Message::EditorSave),
                button("Cancel").on_press(Message::EditorCancel),
            ]
            .spacing(8),
        ]
        .spacing(10)
        .max_width(620);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16)
            .into()
    }
}
