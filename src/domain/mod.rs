pub mod error;
pub mod formats;
pub mod model;
pub mod progress;

pub use error::AppError;
pub use formats::{FormatList, FormatOption};
pub use model::{ProgressModal, Session, WorkflowPhase};
pub use progress::ProgressUpdate;
