use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size: {0}")]
pub struct ParseSizeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown customer type: {0}")]
pub struct ParseCustomerTypeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("session expired, sign in again")]
    Unauthorized,
    #[error("not signed in")]
    NotAuthenticated,
    #[error("{0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    pub fn notice_text(&self) -> String {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            Self::Rejected(_) => "request was rejected".to_string(),
            other => other.to_string(),
        }
    }
}
