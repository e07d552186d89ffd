use std::{path::PathBuf, sync::Arc, time::Duration};

use futures::{stream::BoxStream, StreamExt};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info};

use crate::{
    api::{client::DEFAULT_FILENAME, Backend, DownloadRequest, DownloadedFile, VideoMetadata},
    domain::{AppError, ProgressUpdate},
    utils::{
        sanitize_filename,
        thumbnail::{decode_thumbnail, ThumbnailImage},
    },
};

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Started { task_id: Option<String> },
    Progress(ProgressUpdate),
    Settled(Result<DownloadedFile, AppError>),
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    backend: Arc<dyn Backend>,
    poll_interval: Duration,
}

impl DownloadCoordinator {
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
        }
    }

    pub async fn check_backend(&self) -> Result<(), AppError> {
        self.backend.ping().await.map_err(AppError::from)
    }

    pub async fn fetch_metadata(&self, video_url: String) -> Result<VideoMetadata, AppError> {
        self.backend
            .fetch_metadata(&video_url)
            .await
            .map_err(AppError::from)
    }

    pub async fn fetch_thumbnail(&self, thumbnail_url: String) -> Result<ThumbnailImage, AppError> {
        let data = self
            .backend
            .fetch_thumbnail(&thumbnail_url)
            .await
            .map_err(|e| AppError::Thumbnail(e.to_string()))?;
        tokio::task::spawn_blocking(move || decode_thumbnail(&data))
            .await
            .map_err(|e| AppError::Thumbnail(e.to_string()))?
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        let mut filename = sanitize_filename(&suggested_filename);
        if filename.is_empty() {
            filename = DEFAULT_FILENAME.to_string();
        }
        rfd::AsyncFileDialog::new()
            .set_file_name(&filename)
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// Write the payload and drop it; nothing keeps the bytes afterwards
    pub async fn save_file(&self, path: PathBuf, file: DownloadedFile) -> Result<PathBuf, AppError> {
        tokio::fs::write(&path, &file.payload)
            .await
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    /// Run one download attempt. Progress is polled while the call is in flight
    /// and no `Progress` event follows `Settled`.
    pub fn download_stream(&self, request: DownloadRequest) -> BoxStream<'static, DownloadEvent> {
        futures::stream::unfold(
            DownloadRuntimeState::Start {
                backend: Arc::clone(&self.backend),
                poll_interval: self.poll_interval,
                request,
            },
            |state| async move {
                match state {
                    DownloadRuntimeState::Start {
                        backend,
                        poll_interval,
                        request,
                    } => {
                        let (tx, rx) = mpsc::unbounded_channel();
                        let task_id = request.task_id.clone();
                        tokio::spawn(run_download(backend, request, poll_interval, tx));
                        Some((
                            DownloadEvent::Started { task_id },
                            DownloadRuntimeState::Running { events: rx },
                        ))
                    }
                    DownloadRuntimeState::Running { mut events } => match events.recv().await {
                        Some(event @ DownloadEvent::Settled(_)) => {
                            Some((event, DownloadRuntimeState::Finished))
                        }
                        Some(event) => Some((event, DownloadRuntimeState::Running { events })),
                        None => Some((
                            DownloadEvent::Settled(Err(AppError::Transport(
                                "download task ended unexpectedly".to_string(),
                            ))),
                            DownloadRuntimeState::Finished,
                        )),
                    },
                    DownloadRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

/// Resolves with `generation` after `delay`; used to hide the progress panel
pub async fn dismiss_after(delay: Duration, generation: u64) -> u64 {
    tokio::time::sleep(delay).await;
    generation
}

enum DownloadRuntimeState {
    Start {
        backend: Arc<dyn Backend>,
        poll_interval: Duration,
        request: DownloadRequest,
    },
    Running {
        events: mpsc::UnboundedReceiver<DownloadEvent>,
    },
    Finished,
}

async fn run_download(
    backend: Arc<dyn Backend>,
    request: DownloadRequest,
    poll_interval: Duration,
    tx: mpsc::UnboundedSender<DownloadEvent>,
) {
    let poller = request.task_id.clone().map(|task_id| {
        tokio::spawn(poll_progress(
            Arc::clone(&backend),
            task_id,
            poll_interval,
            tx.clone(),
        ))
    });

    let result = backend.download(&request).await.map_err(AppError::from);

    if let Some(poller) = poller {
        poller.abort();
        // wait until the poller is really gone so nothing lands after `Settled`
        let _ = poller.await;
    }

    info!(ok = result.is_ok(), "download call settled");
    let _ = tx.send(DownloadEvent::Settled(result));
}

async fn poll_progress(
    backend: Arc<dyn Backend>,
    task_id: String,
    poll_interval: Duration,
    tx: mpsc::UnboundedSender<DownloadEvent>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match backend.fetch_progress(&task_id).await {
            Ok(Some(report)) => {
                debug!(task_id = %task_id, stage = %report.stage, "progress polled");
                if tx.send(DownloadEvent::Progress(report.into())).is_err() {
                    break;
                }
            }
            Ok(None) => debug!(task_id = %task_id, "task not registered yet"),
            Err(e) => debug!(task_id = %task_id, error = %e, "progress poll failed"),
        }
    }
}
