use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchApiError {
    #[error("URLError ({url}): {reason}")]
    Connection { url: String, reason: String },

    #[error("HTTP {code} Error: {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("Response from {url} is not valid UTF-8: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("{0}")]
    Configuration(String),

    #[error("No port found for {kind} '{value}'")]
    LookupNotFound { kind: &'static str, value: String },

    #[error("Failed to parse {resource} response: {source}")]
    Parse {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Interface reported invalid port number {0}")]
    InvalidPort(i64),
}
