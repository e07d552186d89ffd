use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::utils::{decode_header_value, filename_from_content_disposition};

use super::models::{
    detail_text, ApiConfig, DownloadRequest, DownloadedFile, ErrorBody, MetadataBody,
    PingResponse, ProgressReport, VideoMetadata,
};
use super::Backend;

/// Name used when the server sends no usable filename
pub const DEFAULT_FILENAME: &str = "audio";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    Backend(String),

    #[error("Download rejected")]
    Rejected(Option<String>),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    /// Health check against /ping
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .http
            .get(self.endpoint("ping")?)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Backend(format!("Ping failed: {}", e)))?;

        let json: PingResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if json.status != "ok" {
            return Err(ApiError::Backend(format!("Backend status: {}", json.status)));
        }
        Ok(())
    }

    pub async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata> {
        let response = self
            .http
            .get(self.endpoint("metadata")?)
            .query(&[("url", video_url)])
            .send()
            .await?;

        let status = response.status();
        let body: MetadataBody = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if let Some(error) = body.error.filter(|e| !e.is_empty()) {
            return Err(ApiError::Backend(error));
        }

        if !status.is_success() {
            let detail = body
                .detail
                .as_ref()
                .and_then(detail_text)
                .unwrap_or_else(|| status_text(status));
            return Err(ApiError::Backend(detail));
        }

        Ok(VideoMetadata {
            title: body.title.unwrap_or_default(),
            author: body.author.unwrap_or_default(),
            thumbnail: body.thumbnail.filter(|t| !t.is_empty()),
            formats: body.formats.unwrap_or_default().into_iter().flatten().collect(),
        })
    }

    /// Returns `None` while the backend does not know the task yet
    pub async fn fetch_progress(&self, task_id: &str) -> Result<Option<ProgressReport>> {
        let response = self
            .http
            .get(self.endpoint("progress")?)
            .query(&[("task_id", task_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(task_id, status = %response.status(), "progress not available yet");
            return Ok(None);
        }

        let report: ProgressReport = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        Ok(Some(report))
    }

    /// Posts the download request and reads the whole payload into memory
    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile> {
        let response = self
            .http
            .post(self.endpoint("download")?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|err| err.detail_text().unwrap_or_else(|| status_text(status)));
            return Err(ApiError::Rejected(detail));
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .map(|value| decode_header_value(value.as_bytes()))
            .and_then(|value| filename_from_content_disposition(&value))
            .unwrap_or_else(|| {
                warn!("no filename in Content-Disposition, using {}", DEFAULT_FILENAME);
                DEFAULT_FILENAME.to_string()
            });

        let payload = response.bytes().await?;
        Ok(DownloadedFile { filename, payload })
    }

    pub async fn fetch_thumbnail(&self, thumbnail_url: &str) -> Result<bytes::Bytes> {
        let url = self.config.base_url.join(thumbnail_url)?;
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Backend(format!("Thumbnail request failed: {}", e)))?;

        Ok(response.bytes().await?)
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

#[async_trait]
impl Backend for ApiClient {
    async fn ping(&self) -> Result<()> {
        ApiClient::ping(self).await
    }

    async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata> {
        ApiClient::fetch_metadata(self, video_url).await
    }

    async fn fetch_progress(&self, task_id: &str) -> Result<Option<ProgressReport>> {
        ApiClient::fetch_progress(self, task_id).await
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile> {
        ApiClient::download(self, request).await
    }

    async fn fetch_thumbnail(&self, thumbnail_url: &str) -> Result<bytes::Bytes> {
        ApiClient::fetch_thumbnail(self, thumbnail_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        let base_url = Url::parse(&format!("{}/", server.url())).unwrap();
        ApiClient::new(ApiConfig { base_url })
    }

    #[tokio::test]
    async fn test_fetch_metadata_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/metadata")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"title":"T","author":"A","thumbnail":"u","formats":[
                    {"format_id":"1","ext":"m4a","acodec":"aac","abr":128,"vcodec":"none"},
                    null
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let metadata = client
            .fetch_metadata("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(metadata.title, "T");
        assert_eq!(metadata.author, "A");
        assert_eq!(metadata.thumbnail.as_deref(), Some("u"));
        assert_eq!(metadata.formats.len(), 1);
        assert_eq!(metadata.formats[0].format_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_fetch_metadata_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/metadata")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":"Invalid YouTube URL"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_metadata("invalid-url")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend(ref m) if m == "Invalid YouTube URL"));
    }

    #[tokio::test]
    async fn test_fetch_metadata_http_error_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/metadata")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"detail":"Video unavailable"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_metadata("https://youtu.be/xxxxxxxxxxx")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Backend(ref m) if m == "Video unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_progress_not_registered() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/progress")
            .match_query(Matcher::UrlEncoded("task_id".into(), "abc".into()))
            .with_status(404)
            .with_body(r#"{"detail":"Not Found"}"#)
            .create_async()
            .await;

        let report = client_for(&server).fetch_progress("abc").await.unwrap();
        assert_eq!(report, None);
    }

    #[tokio::test]
    async fn test_fetch_progress_report() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/progress")
            .match_query(Matcher::UrlEncoded("task_id".into(), "abc".into()))
            .with_status(200)
            .with_body(r#"{"stage":"download_complete","detail":"3.2 MB"}"#)
            .create_async()
            .await;

        let report = client_for(&server).fetch_progress("abc").await.unwrap();
        assert_eq!(
            report,
            Some(ProgressReport {
                stage: "download_complete".into(),
                detail: Some("3.2 MB".into()),
            })
        );
    }

    #[tokio::test]
    async fn test_download_reads_filename_and_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/download")
            .match_body(Matcher::Json(serde_json::json!({
                "url": "https://youtu.be/abc",
                "format_id": "140",
                "convert_to_mp3": true,
                "task_id": "t-1"
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_header("content-disposition", r#"attachment; filename="song.mp3""#)
            .with_body(b"ID3payload")
            .create_async()
            .await;

        let request = DownloadRequest {
            url: "https://youtu.be/abc".into(),
            format_id: "140".into(),
            convert_to_mp3: true,
            task_id: Some("t-1".into()),
        };
        let file = client_for(&server).download(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(file.filename, "song.mp3");
        assert_eq!(&file.payload[..], b"ID3payload");
    }

    #[tokio::test]
    async fn test_download_rejected_with_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(400)
            .with_body(r#"{"detail":"URL and format_id are required."}"#)
            .create_async()
            .await;

        let request = DownloadRequest {
            url: String::new(),
            format_id: "140".into(),
            convert_to_mp3: false,
            task_id: None,
        };
        let err = client_for(&server).download(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected(Some(ref d)) if d == "URL and format_id are required."
        ));
    }

    #[tokio::test]
    async fn test_download_rejected_without_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let request = DownloadRequest {
            url: "https://youtu.be/abc".into(),
            format_id: "140".into(),
            convert_to_mp3: false,
            task_id: None,
        };
        let err = client_for(&server).download(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(None)));
    }

    #[tokio::test]
    async fn test_download_falls_back_to_reason_phrase() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(429)
            .with_body(r#"{"message":"slow down"}"#)
            .create_async()
            .await;

        let request = DownloadRequest {
            url: "https://youtu.be/abc".into(),
            format_id: "140".into(),
            convert_to_mp3: false,
            task_id: None,
        };
        let err = client_for(&server).download(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(Some(ref d)) if d == "Too Many Requests"));
    }

    #[tokio::test]
    async fn test_download_without_content_disposition_keeps_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(200)
            .with_body(b"data")
            .create_async()
            .await;

        let request = DownloadRequest {
            url: "https://youtu.be/abc".into(),
            format_id: "140".into(),
            convert_to_mp3: false,
            task_id: None,
        };
        let file = client_for(&server).download(&request).await.unwrap();
        assert_eq!(file.filename, DEFAULT_FILENAME);
        assert_eq!(&file.payload[..], b"data");
    }

    /// Serves one raw HTTP response after reading the full request
    async fn serve_raw_once(response: Vec<u8>) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_download_latin1_filename() {
        let mut response = b"HTTP/1.1 200 OK\r\ncontent-type: audio/mpeg\r\n".to_vec();
        response.extend_from_slice(b"content-disposition: attachment; filename=\"Caf\xE9.mp3\"\r\n");
        response.extend_from_slice(b"content-length: 3\r\nconnection: close\r\n\r\nID3");
        let base_url = serve_raw_once(response).await;

        let request = DownloadRequest {
            url: "https://youtu.be/abc".into(),
            format_id: "140".into(),
            convert_to_mp3: true,
            task_id: None,
        };
        let file = ApiClient::new(ApiConfig { base_url })
            .download(&request)
            .await
            .unwrap();

        assert_eq!(file.filename, "Café.mp3");
        assert_eq!(&file.payload[..], b"ID3");
    }

    #[tokio::test]
    async fn test_ping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).ping().await.is_ok());
    }
}
