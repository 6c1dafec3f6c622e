use kestrel_base::VisitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{0}` not found")]
    NotFound(PathBuf),
    #[error("failed to read resource `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid core configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Visit(#[from] VisitError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
