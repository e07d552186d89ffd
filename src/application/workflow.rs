use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    api::{DownloadRequest, DownloadedFile, VideoMetadata},
    domain::{
        AppError, FormatList, FormatOption, ProgressModal, ProgressUpdate, Session,
        WorkflowPhase,
    },
    localization::{Locale, Strings},
    utils::thumbnail::ThumbnailImage,
};

/// Same limit the backend applies to the `url` query parameter
pub const MAX_URL_LEN: usize = 2048;

/// What to do once the download call has settled
#[derive(Debug)]
pub enum SettleAction {
    /// Ask where to save the payload
    Save(DownloadedFile),
    /// Hide the progress panel later; carries the modal generation
    Dismiss(u64),
}

/// State of the two-step metadata → download workflow.
///
/// Every input is a transition function; the UI only renders what this holds
/// and turns returned values into background work.
pub struct WorkflowController {
    locale: Locale,
    phase: WorkflowPhase,
    session: Option<Session>,
    next_session_id: u64,
    metadata: Option<VideoMetadata>,
    thumbnail: Option<ThumbnailImage>,
    formats: FormatList,
    selected_format: Option<FormatOption>,
    convert_to_mp3: bool,
    error_message: Option<String>,
    modal: ProgressModal,
    modal_generation: u64,
    polling: bool,
    metadata_trigger_enabled: bool,
    download_trigger_enabled: bool,
    backend_reachable: Option<bool>,
}

impl WorkflowController {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            phase: WorkflowPhase::Idle,
            session: None,
            next_session_id: 0,
            metadata: None,
            thumbnail: None,
            formats: FormatList::Empty,
            selected_format: None,
            convert_to_mp3: false,
            error_message: None,
            modal: ProgressModal::Hidden,
            modal_generation: 0,
            polling: false,
            metadata_trigger_enabled: true,
            download_trigger_enabled: false,
            backend_reachable: None,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.locale.strings()
    }

    #[cfg(test)]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&ThumbnailImage> {
        self.thumbnail.as_ref()
    }

    pub fn formats(&self) -> &FormatList {
        &self.formats
    }

    pub fn selected_format(&self) -> Option<&FormatOption> {
        self.selected_format.as_ref()
    }

    pub fn convert_to_mp3(&self) -> bool {
        self.convert_to_mp3
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn modal(&self) -> &ProgressModal {
        &self.modal
    }

    pub fn is_loading(&self) -> bool {
        self.phase == WorkflowPhase::FetchingMetadata
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn metadata_trigger_enabled(&self) -> bool {
        self.metadata_trigger_enabled
    }

    pub fn download_trigger_enabled(&self) -> bool {
        self.download_trigger_enabled
    }

    pub fn backend_reachable(&self) -> Option<bool> {
        self.backend_reachable
    }

    pub fn backend_checked(&mut self, result: Result<(), AppError>) {
        match result {
            Ok(()) => {
                info!("backend reachable");
                self.backend_reachable = Some(true);
            }
            Err(e) => {
                warn!(error = %e, "backend health check failed");
                self.backend_reachable = Some(false);
            }
        }
    }

    /// Start a new run. Clears the previous result and returns the session to fetch for.
    pub fn submit_url(&mut self, raw_url: &str) -> Result<Session, AppError> {
        if matches!(
            self.phase,
            WorkflowPhase::FetchingMetadata | WorkflowPhase::Downloading
        ) {
            return Err(AppError::Busy);
        }

        let video_url = raw_url.trim();
        if video_url.is_empty() {
            return Err(AppError::EmptyUrl);
        }
        if video_url.chars().count() > MAX_URL_LEN {
            return Err(AppError::UrlTooLong(MAX_URL_LEN));
        }

        self.next_session_id += 1;
        let session = Session {
            id: self.next_session_id,
            video_url: video_url.to_string(),
            task_id: None,
        };
        info!(session = session.id, url = %session.video_url, "fetching metadata");

        self.session = Some(session.clone());
        self.metadata = None;
        self.thumbnail = None;
        self.formats = FormatList::Empty;
        self.selected_format = None;
        self.error_message = None;
        self.modal = ProgressModal::Hidden;
        self.metadata_trigger_enabled = false;
        self.download_trigger_enabled = false;
        self.phase = WorkflowPhase::FetchingMetadata;

        Ok(session)
    }

    fn is_current(&self, session_id: u64) -> bool {
        self.session.as_ref().map(|s| s.id) == Some(session_id)
    }

    /// Returns the thumbnail URL to load, if any
    pub fn metadata_received(
        &mut self,
        session_id: u64,
        result: Result<VideoMetadata, AppError>,
    ) -> Option<String> {
        if !self.is_current(session_id) || self.phase != WorkflowPhase::FetchingMetadata {
            return None;
        }

        self.metadata_trigger_enabled = true;

        match result {
            Ok(metadata) => {
                self.formats = FormatList::from_formats(&metadata.formats);
                self.selected_format = self.formats.first().cloned();
                info!(
                    title = %metadata.title,
                    formats = metadata.formats.len(),
                    audio_formats = self.formats.options().len(),
                    "metadata received"
                );

                let thumbnail_url = metadata.thumbnail.clone();
                self.metadata = Some(metadata);
                self.download_trigger_enabled = true;
                self.phase = WorkflowPhase::Ready;
                thumbnail_url
            }
            Err(e) => {
                warn!(error = %e, "metadata request failed");
                self.error_message = Some(format!("{}: {}", self.strings().error_prefix, e));
                self.phase = WorkflowPhase::Error;
                None
            }
        }
    }

    pub fn thumbnail_loaded(&mut self, session_id: u64, result: Result<ThumbnailImage, AppError>) {
        if !self.is_current(session_id) || self.metadata.is_none() {
            return;
        }
        match result {
            Ok(image) => self.thumbnail = Some(image),
            Err(e) => warn!(error = %e, "thumbnail not shown"),
        }
    }

    pub fn select_format(&mut self, option: FormatOption) {
        if self.formats.options().contains(&option) {
            self.selected_format = Some(option);
        }
    }

    pub fn set_convert_to_mp3(&mut self, convert: bool) {
        self.convert_to_mp3 = convert;
    }

    /// Validate the selection and enter `Downloading`; returns the request to send
    pub fn begin_download(&mut self, task_id: String) -> Result<DownloadRequest, AppError> {
        if matches!(
            self.phase,
            WorkflowPhase::FetchingMetadata | WorkflowPhase::Downloading
        ) {
            return Err(AppError::Busy);
        }

        let format_id = match &self.selected_format {
            Some(option) if !option.format_id.is_empty() => option.format_id.clone(),
            _ => return Err(AppError::NoFormatSelected),
        };
        let session = self.session.as_mut().ok_or(AppError::NoFormatSelected)?;
        session.task_id = Some(task_id.clone());

        let request = DownloadRequest {
            url: session.video_url.clone(),
            format_id,
            convert_to_mp3: self.convert_to_mp3,
            task_id: Some(task_id),
        };
        info!(
            format_id = %request.format_id,
            convert_to_mp3 = request.convert_to_mp3,
            task_id = ?request.task_id,
            "starting download"
        );

        self.modal_generation += 1;
        self.modal = ProgressModal::Visible {
            text: self.strings().initializing_download.to_string(),
        };
        self.download_trigger_enabled = false;
        self.polling = true;
        self.phase = WorkflowPhase::Downloading;

        Ok(request)
    }

    pub fn progress_received(&mut self, update: &ProgressUpdate) {
        if !self.polling || self.phase != WorkflowPhase::Downloading {
            return;
        }
        if let ProgressUpdate::Unrecognized { stage, .. } = update {
            warn!(stage = %stage, "backend reported an unknown progress stage");
        }
        self.modal = ProgressModal::Visible {
            text: update.status_text(self.strings()),
        };
    }

    /// The download call finished; polling ends here whatever the outcome.
    pub fn download_settled(
        &mut self,
        result: Result<DownloadedFile, AppError>,
    ) -> Option<SettleAction> {
        if self.phase != WorkflowPhase::Downloading {
            return None;
        }
        self.polling = false;
        let task_id = self.session.as_ref().and_then(|s| s.task_id.clone());

        match result {
            Ok(file) => {
                info!(
                    task_id = ?task_id,
                    filename = %file.filename,
                    bytes = file.payload.len(),
                    "download received"
                );
                self.modal = ProgressModal::Visible {
                    text: self.strings().download_received.to_string(),
                };
                Some(SettleAction::Save(file))
            }
            Err(e) => {
                warn!(task_id = ?task_id, error = %e, "download failed");
                let strings = self.strings();
                let text = match &e {
                    AppError::DownloadRejected(Some(detail)) => {
                        format!("{}: {}", strings.download_failed, detail)
                    }
                    AppError::DownloadRejected(None) => strings.download_failed_generic.to_string(),
                    other => format!("{}: {}", strings.unexpected_error, other),
                };
                Some(SettleAction::Dismiss(self.finish(WorkflowPhase::Error, text)))
            }
        }
    }

    /// Returns the modal generation to dismiss
    pub fn file_saved(&mut self, result: Result<PathBuf, AppError>) -> u64 {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "file saved");
                let text = self.strings().file_ready.to_string();
                self.finish(WorkflowPhase::Done, text)
            }
            Err(e) => {
                warn!(error = %e, "saving failed");
                let text = format!("{}: {}", self.strings().unexpected_error, e);
                self.finish(WorkflowPhase::Error, text)
            }
        }
    }

    pub fn save_cancelled(&mut self) -> u64 {
        info!("save dialog cancelled");
        let text = self.strings().save_cancelled.to_string();
        self.finish(WorkflowPhase::Done, text)
    }

    fn finish(&mut self, phase: WorkflowPhase, text: String) -> u64 {
        self.polling = false;
        self.modal = ProgressModal::Visible { text };
        self.download_trigger_enabled = true;
        self.phase = phase;
        self.modal_generation
    }

    /// Hide the progress panel unless a newer download has reopened it
    pub fn dismiss_progress(&mut self, generation: u64) {
        if generation == self.modal_generation && self.phase != WorkflowPhase::Downloading {
            self.modal = ProgressModal::Hidden;
        }
    }

    /// Text for a blocking alert; `None` for refusals the user did not cause
    pub fn alert_text(&self, error: &AppError) -> Option<String> {
        if !error.is_user_input() {
            return None;
        }
        let strings = self.strings();
        let text = match error {
            AppError::EmptyUrl => strings.enter_url_alert,
            AppError::UrlTooLong(_) => strings.url_too_long_alert,
            _ => strings.select_format_alert,
        };
        Some(text.to_string())
    }
}
