/// Context of one workflow run, threaded from the metadata phase to the download phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: u64,
    pub video_url: String,
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    FetchingMetadata,
    Ready,
    Downloading,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProgressModal {
    #[default]
    Hidden,
    Visible {
        text: String,
    },
}

impl ProgressModal {
    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        matches!(self, ProgressModal::Visible { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ProgressModal::Visible { text } => Some(text),
            ProgressModal::Hidden => None,
        }
    }
}
