use std::str::FromStr;

use thiserror::Error;

use crate::api::ProgressReport;
use crate::localization::Strings;

/// Backend pipeline position of one download task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Initializing,
    StartingDownload,
    Downloading,
    DownloadComplete,
    Converting,
    Streaming,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown progress stage `{0}`")]
pub struct UnknownStage(pub String);

impl FromStr for ProgressStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "initializing" => ProgressStage::Initializing,
            "starting_download" => ProgressStage::StartingDownload,
            "downloading" => ProgressStage::Downloading,
            "download_complete" => ProgressStage::DownloadComplete,
            "converting" => ProgressStage::Converting,
            "streaming" => ProgressStage::Streaming,
            "completed" => ProgressStage::Completed,
            "error" => ProgressStage::Error,
            other => return Err(UnknownStage(other.to_string())),
        })
    }
}

impl ProgressStage {
    pub fn status_text(self, strings: &Strings, detail: Option<&str>) -> String {
        let detail = detail.filter(|d| !d.is_empty());
        match self {
            ProgressStage::Initializing => strings.stage_initializing.to_string(),
            ProgressStage::StartingDownload => strings.stage_starting_download.to_string(),
            ProgressStage::Downloading => strings.stage_downloading.to_string(),
            ProgressStage::DownloadComplete => match detail {
                Some(d) => format!("{} ({})", strings.stage_download_complete, d),
                None => strings.stage_download_complete.to_string(),
            },
            ProgressStage::Converting => strings.stage_converting.to_string(),
            ProgressStage::Streaming => strings.stage_streaming.to_string(),
            ProgressStage::Completed => strings.stage_completed.to_string(),
            ProgressStage::Error => {
                format!("{}: {}", strings.error_prefix, detail.unwrap_or_default())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressUpdate {
    Known {
        stage: ProgressStage,
        detail: Option<String>,
    },
    Unrecognized {
        stage: String,
        detail: Option<String>,
    },
}

impl From<ProgressReport> for ProgressUpdate {
    fn from(report: ProgressReport) -> Self {
        match report.stage.parse::<ProgressStage>() {
            Ok(stage) => ProgressUpdate::Known {
                stage,
                detail: report.detail,
            },
            Err(UnknownStage(stage)) => ProgressUpdate::Unrecognized {
                stage,
                detail: report.detail,
            },
        }
    }
}

impl ProgressUpdate {
    pub fn status_text(&self, strings: &Strings) -> String {
        match self {
            ProgressUpdate::Known { stage, detail } => stage.status_text(strings, detail.as_deref()),
            ProgressUpdate::Unrecognized { detail, .. } => match detail.as_deref() {
                Some(d) if !d.is_empty() => format!("{} {}", strings.processing, d),
                _ => strings.processing.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::{EN, PL};

    #[test]
    fn test_every_observed_stage_parses() {
        for name in [
            "initializing",
            "starting_download",
            "downloading",
            "download_complete",
            "converting",
            "streaming",
            "completed",
            "error",
        ] {
            assert!(name.parse::<ProgressStage>().is_ok(), "{name}");
        }
        assert_eq!(
            "uploading".parse::<ProgressStage>(),
            Err(UnknownStage("uploading".into()))
        );
    }

    #[test]
    fn test_download_complete_includes_detail() {
        assert_eq!(
            ProgressStage::DownloadComplete.status_text(&EN, Some("4.1 MB")),
            "Download complete (4.1 MB)"
        );
        assert_eq!(
            ProgressStage::DownloadComplete.status_text(&EN, None),
            "Download complete"
        );
    }

    #[test]
    fn test_error_stage_overrides() {
        assert_eq!(
            ProgressStage::Error.status_text(&PL, Some("ffmpeg failed")),
            "Błąd: ffmpeg failed"
        );
    }

    #[test]
    fn test_unknown_stage_is_detectable() {
        let update = ProgressUpdate::from(ProgressReport {
            stage: "uploading".into(),
            detail: Some("50%".into()),
        });
        assert!(matches!(update, ProgressUpdate::Unrecognized { ref stage, .. } if stage == "uploading"));
        assert_eq!(update.status_text(&EN), "Processing... 50%");
    }
}
