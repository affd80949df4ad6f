use thiserror::Error;

/// Failure of a single request to the OpenWeather endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a readable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    NotFound { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The task running the request panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClientError {
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::NotFound { status: status.as_u16(), body: truncate_body(body) }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
