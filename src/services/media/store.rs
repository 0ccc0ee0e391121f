use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),
    #[error("media upload transport error")]
    Transport(#[from] reqwest::Error),
    #[error("media upload rejected with status {0}")]
    Rejected(u16),
    #[error("media upload response carried no url")]
    MissingUrl,
    #[error("media upload endpoint cannot carry a path")]
    BadEndpoint,
    #[error("media client construction failed")]
    Client(#[source] reqwest::Error),
}

/// MediaStore resolves an uploaded file payload to a stable URI.
///
/// The store owns everything about the binary object (placement, naming,
/// format whitelisting); callers only consume the returned URI.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<String, MediaError>;
}
