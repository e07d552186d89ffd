use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("No video URL entered")]
    EmptyUrl,

    #[error("Video URL is longer than {0} characters")]
    UrlTooLong(usize),

    #[error("No audio format selected")]
    NoFormatSelected,

    #[error("Another request is still in progress")]
    Busy,

    #[error("{0}")]
    Backend(String),

    #[error("Download rejected")]
    DownloadRejected(Option<String>),

    #[error("{0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Thumbnail error: {0}")]
    Thumbnail(String),
}

impl AppError {
    /// Errors caused by user input; shown as a blocking alert, nothing is sent
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AppError::EmptyUrl | AppError::UrlTooLong(_) | AppError::NoFormatSelected
        )
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Backend(message) => AppError::Backend(message),
            ApiError::Rejected(detail) => AppError::DownloadRejected(detail),
            other => AppError::Transport(other.to_string()),
        }
    }
}
