pub mod client;
pub mod models;

use async_trait::async_trait;

pub use client::{ApiClient, ApiError, Result};
pub use models::{
    ApiConfig, AudioFormat, DownloadRequest, DownloadedFile, ProgressReport, VideoMetadata,
};

/// The backend endpoints the workflow talks to
#[async_trait]
pub trait Backend: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata>;

    async fn fetch_progress(&self, task_id: &str) -> Result<Option<ProgressReport>>;

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile>;

    async fn fetch_thumbnail(&self, thumbnail_url: &str) -> Result<bytes::Bytes>;
}
