mod app_error;
mod pipeline_error;

pub use app_error::{AppError, AppResult};
pub use pipeline_error::{PipelineError, RunError};
