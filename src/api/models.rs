use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Bitrate as reported by the backend, either numeric or already a string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bitrate {
    Number(f64),
    Text(String),
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bitrate::Number(n) => write!(f, "{}", n),
            Bitrate::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of the `formats` array returned by /metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AudioFormat {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub abr: Option<Bitrate>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Raw body of /metadata; carries either the video fields or an error
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MetadataBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<Option<AudioFormat>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub formats: Vec<AudioFormat>,
}

/// Body of POST /download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub convert_to_mp3: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Response from /progress
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressReport {
    pub stage: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// JSON error body (`{"detail": ...}`) returned on failed requests
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<String> {
        detail_text(self.detail.as_ref()?)
    }
}

/// Renders a `detail` value; structured details are kept as compact JSON
pub(crate) fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PingResponse {
    pub status: String,
}

/// A finished download, held only until it is written to disk
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub filename: String,
    pub payload: bytes::Bytes,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}
