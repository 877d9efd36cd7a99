//! Error types for the wt-app service layer.

/// Application error type wrapping the backend crates' errors behind one
/// interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wt-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<wt_project::ProjectError> for AppError {
    fn from(err: wt_project::ProjectError) -> Self {
        match err {
            wt_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<wt_project::ValidationError> for AppError {
    fn from(err: wt_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<wt_sim::SimError> for AppError {
    fn from(err: wt_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<wt_results::ResultsError> for AppError {
    fn from(err: wt_results::ResultsError) -> Self {
        match err {
            wt_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
