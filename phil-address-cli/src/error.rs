#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
    #[error("invalid log level: {0}")]
    LogLevel(String),
    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("{0}\n\n{usage}", usage = crate::command::USAGE)]
    Usage(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
