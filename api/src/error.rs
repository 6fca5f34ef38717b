use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown tricode, conference, division or round, or a template
    /// placeholder nobody supplied. Caller error.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Valid team, but no game with a started period on today's scoreboard.
    #[error("{0} is not currently playing")]
    TeamNotPlaying(String),

    /// An id referenced by one document is missing from another.
    #[error("Unknown {kind} id {id}")]
    UnknownIdentifier { kind: &'static str, id: String },

    #[error("Transport error for {1}: {0}")]
    Transport(#[source] TransportError, String),

    #[error("Malformed response from {source_name}: {reason}")]
    MalformedResponse { source_name: String, reason: String },
}

/// Why a request produced no usable body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or body read failure.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Any non-2xx answer other than a revalidation `304`.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

impl ApiError {
    pub fn transport(cause: impl Into<TransportError>, url: impl Into<String>) -> Self {
        ApiError::Transport(cause.into(), url.into())
    }

    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown(kind: &'static str, id: impl ToString) -> Self {
        ApiError::UnknownIdentifier { kind, id: id.to_string() }
    }
}
