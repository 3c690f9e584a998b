//! Error types for bt-dip

/// Result type for bt-dip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] values.
///
/// Callers that only need to know *what went wrong* (and not the details)
/// match on this instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API could not be reached or the connection failed mid-request
    Network,
    /// The API key is missing or was rejected
    Auth,
    /// The API answered but returned no records
    EmptyResult,
    /// The response did not have the expected JSON or XML shape
    Parse,
    /// A requested item does not exist in the document
    NotFound,
    /// Anything else (unexpected status codes, bad configuration)
    Other,
}

/// Errors that can occur while talking to the DIP API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API key configured
    #[error("No API key configured: set the BUNDESTAG_API_KEY environment variable")]
    MissingApiKey,

    /// The API rejected the key
    #[error("DIP API rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The listing contained no records
    #[error("No plenary protocol found")]
    NoProtocolFound,

    /// The protocol record has no XML transcript attached
    #[error("Plenary protocol {nummer} has no XML transcript")]
    NoXmlDocument { nummer: String },

    /// A speech id was requested that the transcript does not contain
    #[error("Speech '{id}' not found in plenary protocol {nummer}")]
    SpeechNotFound { id: String, nummer: String },

    /// Non-success HTTP status other than an auth failure
    #[error("DIP API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body parsed, but not into the expected structure
    #[error("Unexpected response shape: {message}")]
    UnexpectedShape { message: String },

    /// Invalid client configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Transport-level failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization error
    #[error("Failed to parse DIP response: {0}")]
    Json(#[from] serde_json::Error),

    /// XML transcript could not be read
    #[error("Failed to parse protocol XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::MissingApiKey | Error::Unauthorized { .. } => ErrorKind::Auth,
            Error::NoProtocolFound => ErrorKind::EmptyResult,
            Error::Json(_) | Error::Xml(_) | Error::UnexpectedShape { .. } => ErrorKind::Parse,
            Error::NoXmlDocument { .. } | Error::SpeechNotFound { .. } => ErrorKind::NotFound,
            Error::Status { .. } | Error::InvalidConfig { .. } => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_message_is_explicit() {
        let err = Error::NoProtocolFound;
        assert_eq!(err.to_string(), "No plenary protocol found");
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn auth_errors_share_a_kind() {
        assert_eq!(Error::MissingApiKey.kind(), ErrorKind::Auth);
        assert_eq!(Error::Unauthorized { status: 401 }.kind(), ErrorKind::Auth);
    }

    #[test]
    fn json_errors_are_parse_failures() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("Failed to parse DIP response"));
    }

    #[test]
    fn missing_key_message_names_the_variable() {
        assert!(Error::MissingApiKey.to_string().contains("BUNDESTAG_API_KEY"));
    }
}
