use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Malformed API payload: missing or invalid field `{field}`")]
    MalformedPayload { field: String },

    #[error("Cannot compute {metric}: division by zero")]
    DivisionByZero { metric: &'static str },

    #[error("Channel list is empty")]
    EmptyCollection,
}

impl ChannelError {
    pub(crate) fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedPayload {
            field: field.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API key is invalid or missing")]
    InvalidApiKey,

    #[error("Quota exceeded - please try again tomorrow")]
    QuotaExceeded,

    #[error("Unexpected API response - status: {status}, body: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`, type `help` to see the available commands")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{0}` is not a channel URL or id")]
    InvalidChannel(String),

    #[error("{0}")]
    InvalidSortKey(String),

    #[error("Unknown sort direction `{0}`, expected `asc` or `desc`")]
    InvalidDirection(String),
}
