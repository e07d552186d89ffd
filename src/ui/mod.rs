use iced::{
    widget::{button, column, container, image, pick_list, row, text, text_input, Column, Space},
    Color, Element, Length,
};

use crate::{application::WorkflowController, domain::FormatList, domain::FormatOption};

const ERROR_COLOR: Color = Color::from_rgb(0.78, 0.16, 0.16);

/// Input state owned by the view; everything else is read from the controller
#[derive(Default)]
pub struct DownloadView {
    pub video_url: String,
    pub thumbnail: Option<image::Handle>,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    FetchPressed,
    FormatSelected(FormatOption),
    ConvertToggled(bool),
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        if let DownloadMessage::UrlChanged(url) = message {
            self.video_url = url;
        }
    }

    pub fn view<'a>(&'a self, controller: &'a WorkflowController) -> Element<'a, DownloadMessage> {
        let strings = controller.strings();

        let mut content: Column<'a, DownloadMessage> = column![
            text(strings.app_title).size(32),
            Space::new().height(Length::Fixed(20.0)),
            text(strings.url_label).size(16),
            row![
                text_input(strings.url_placeholder, &self.video_url)
                    .on_input(DownloadMessage::UrlChanged)
                    .on_submit(DownloadMessage::FetchPressed)
                    .padding(10),
                button(text(strings.fetch_button))
                    .on_press_maybe(
                        controller
                            .metadata_trigger_enabled()
                            .then_some(DownloadMessage::FetchPressed)
                    )
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10);

        if controller.backend_reachable() == Some(false) {
            content = content.push(text(strings.backend_unreachable).size(14).color(ERROR_COLOR));
        }

        if controller.is_loading() {
            content = content.push(text(strings.loading).size(14));
        }

        if let Some(message) = controller.error_message() {
            content = content.push(text(message).size(14).color(ERROR_COLOR));
        }

        if let Some(metadata) = controller.metadata() {
            content = content
                .push(Space::new().height(Length::Fixed(10.0)))
                .push(text(&metadata.title).size(22))
                .push(text(format!("{} {}", strings.author_label, metadata.author)).size(14));

            if let Some(handle) = &self.thumbnail {
                content = content.push(image(handle.clone()).width(Length::Fixed(320.0)));
            }

            let placeholder = match controller.formats() {
                FormatList::Placeholder => strings.no_audio_formats,
                _ => "",
            };
            let formats = pick_list(
                controller.formats().options(),
                controller.selected_format().cloned(),
                DownloadMessage::FormatSelected,
            )
            .placeholder(placeholder)
            .width(Length::Fill);

            let convert = controller.convert_to_mp3();
            content = content
                .push(text(strings.format_label).size(16))
                .push(formats)
                .push(
                    row![
                        button(text(if convert {
                            strings.convert_on
                        } else {
                            strings.convert_off
                        }))
                        .on_press(DownloadMessage::ConvertToggled(!convert))
                        .padding([10, 20]),
                        button(text(strings.download_button))
                            .on_press_maybe(
                                controller
                                    .download_trigger_enabled()
                                    .then_some(DownloadMessage::DownloadPressed)
                            )
                            .padding([10, 20]),
                    ]
                    .spacing(10),
                );
        }

        if let Some(progress) = controller.modal().text() {
            content = content.push(Space::new().height(Length::Fixed(10.0))).push(
                container(text(progress).size(14))
                    .padding(10)
                    .width(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        content.into()
    }
}
