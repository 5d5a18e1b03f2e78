use thiserror::Error;

#[derive(Debug, Error)]
pub enum SxError {
    #[error("Config error: {0}")]
    Config(#[from] siloxane_couch::ConfigError),

    #[error("CouchDB error: {0}")]
    Couch(#[from] siloxane_couch::CouchError),

    #[error("Failed to render response: {0}")]
    Render(#[from] serde_json::Error),
}
