use std::process::ExitStatus;

pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("registry returned no authorization data")]
    AuthorizationFailed,

    #[error("malformed registry authorization token")]
    MalformedToken,

    #[error("no task definitions found for family: {0}")]
    FamilyNotFound(String),

    #[error("task definition registration rejected: {0}")]
    RegistrationFailed(String),

    #[error("service update failed for '{service}': {reason}")]
    ServiceUpdateFailed { service: String, reason: String },

    #[error("environment variable missing: {0}")]
    EnvMissing(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
