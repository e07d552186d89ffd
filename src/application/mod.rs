pub mod download_coordinator;
pub mod workflow;

pub use download_coordinator::{dismiss_after, DownloadCoordinator, DownloadEvent};
pub use workflow::{SettleAction, WorkflowController};
