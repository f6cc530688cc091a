#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config `{key}`: {message}")]
    InvalidConfig { key: &'static str, message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
