use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response; `message` is the server's `message` field when it sent one.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("form incomplete: {0}")]
    Incomplete(String),
}
