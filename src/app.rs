use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use iced::{widget::image, Task};
use tracing::warn;

use crate::api::{ApiClient, DownloadedFile, VideoMetadata};
use crate::application::{
    dismiss_after, DownloadCoordinator, DownloadEvent, SettleAction, WorkflowController,
};
use crate::config::ClientConfig;
use crate::domain::AppError;
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils::{generate_task_id, thumbnail::ThumbnailImage};

pub struct GrabberApp {
    view: DownloadView,
    controller: WorkflowController,
    coordinator: DownloadCoordinator,
    dismiss_after: Duration,
}

impl GrabberApp {
    pub fn new(config: ClientConfig) -> (Self, Task<Message>) {
        let api_client = ApiClient::new(config.api);
        let coordinator = DownloadCoordinator::new(Arc::new(api_client), config.poll_interval);

        let app = Self {
            view: DownloadView::default(),
            controller: WorkflowController::new(config.locale),
            coordinator: coordinator.clone(),
            dismiss_after: config.dismiss_after,
        };

        let health_check = Task::perform(
            async move { coordinator.check_backend().await },
            Message::BackendChecked,
        );
        (app, health_check)
    }

    pub fn title(&self) -> String {
        self.controller.strings().app_title.to_string()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    BackendChecked(Result<(), AppError>),
    /// (Session id, metadata result)
    MetadataFetched(u64, Result<VideoMetadata, AppError>),
    /// (Session id, decoded thumbnail)
    ThumbnailLoaded(u64, Result<ThumbnailImage, AppError>),
    Download(DownloadEvent),
    /// (Selected path, payload waiting to be written)
    SavePathChosen(Option<PathBuf>, DownloadedFile),
    FileSaved(Result<PathBuf, AppError>),
    /// Modal generation to hide
    DismissProgress(u64),
    AlertClosed,
}

pub fn update(app: &mut GrabberApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::FetchPressed => {
                    match app.controller.submit_url(&app.view.video_url) {
                        Ok(session) => {
                            app.view.thumbnail = None;
                            let session_id = session.id;
                            let coordinator = app.coordinator.clone();
                            return Task::perform(
                                async move { coordinator.fetch_metadata(session.video_url).await },
                                move |result| Message::MetadataFetched(session_id, result),
                            );
                        }
                        Err(e) => return refuse(&app.controller, e),
                    }
                }
                DownloadMessage::FormatSelected(option) => app.controller.select_format(option),
                DownloadMessage::ConvertToggled(convert) => {
                    app.controller.set_convert_to_mp3(convert)
                }
                DownloadMessage::DownloadPressed => {
                    match app.controller.begin_download(generate_task_id()) {
                        Ok(request) => {
                            let stream = app.coordinator.download_stream(request);
                            return Task::stream(stream.map(Message::Download));
                        }
                        Err(e) => return refuse(&app.controller, e),
                    }
                }
                DownloadMessage::UrlChanged(_) => {}
            }
        }
        Message::BackendChecked(result) => app.controller.backend_checked(result),
        Message::MetadataFetched(session_id, result) => {
            if let Some(thumbnail_url) = app.controller.metadata_received(session_id, result) {
                let coordinator = app.coordinator.clone();
                return Task::perform(
                    async move { coordinator.fetch_thumbnail(thumbnail_url).await },
                    move |result| Message::ThumbnailLoaded(session_id, result),
                );
            }
        }
        Message::ThumbnailLoaded(session_id, result) => {
            app.controller.thumbnail_loaded(session_id, result);
            app.view.thumbnail = app.controller.thumbnail().map(|thumb| {
                image::Handle::from_rgba(thumb.width, thumb.height, thumb.rgba.clone())
            });
        }
        Message::Download(event) => match event {
            DownloadEvent::Started { task_id } => {
                tracing::debug!(task_id = ?task_id, "download stream started");
            }
            DownloadEvent::Progress(update) => app.controller.progress_received(&update),
            DownloadEvent::Settled(result) => match app.controller.download_settled(result) {
                Some(SettleAction::Save(file)) => {
                    let coordinator = app.coordinator.clone();
                    return Task::perform(
                        async move {
                            let path = coordinator.choose_save_path(file.filename.clone()).await;
                            (path, file)
                        },
                        |(path, file)| Message::SavePathChosen(path, file),
                    );
                }
                Some(SettleAction::Dismiss(generation)) => {
                    return schedule_dismiss(app.dismiss_after, generation)
                }
                None => warn!("download settled outside of a download"),
            },
        },
        Message::SavePathChosen(path_opt, file) => match path_opt {
            Some(path) => {
                let coordinator = app.coordinator.clone();
                return Task::perform(
                    async move { coordinator.save_file(path, file).await },
                    Message::FileSaved,
                );
            }
            None => {
                // User cancelled dialog
                let generation = app.controller.save_cancelled();
                return schedule_dismiss(app.dismiss_after, generation);
            }
        },
        Message::FileSaved(result) => {
            let generation = app.controller.file_saved(result);
            return schedule_dismiss(app.dismiss_after, generation);
        }
        Message::DismissProgress(generation) => app.controller.dismiss_progress(generation),
        Message::AlertClosed => {}
    }
    Task::none()
}

pub fn view(app: &GrabberApp) -> iced::Element<'_, Message> {
    app.view.view(&app.controller).map(Message::UiMessage)
}

fn schedule_dismiss(delay: Duration, generation: u64) -> Task<Message> {
    Task::perform(dismiss_after(delay, generation), Message::DismissProgress)
}

/// User-input errors get a dialog, the rest is only logged
fn refuse(controller: &WorkflowController, error: AppError) -> Task<Message> {
    match controller.alert_text(&error) {
        Some(description) => show_alert(description),
        None => {
            warn!(error = %error, "request refused");
            Task::none()
        }
    }
}

fn show_alert(description: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::AlertClosed,
    )
}
