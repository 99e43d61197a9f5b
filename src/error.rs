use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

/// Everything a service call can fail with.
///
/// Backend messages are carried verbatim so the UI can show them as-is.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Top-level `success: false` from the backend.
    #[error("{message}")]
    Rejected { message: String },

    /// At least one record in a create/update/delete batch failed.
    #[error("{message}")]
    RecordFailed { message: String },

    /// The response carried neither data nor per-record results we can use.
    #[error("Unexpected response format")]
    UnexpectedResponse { operation: &'static str },

    #[error("record {id} not found in {table}")]
    NotFound { table: &'static str, id: i64 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not decode record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl CrmError {
    /// Builds a rejection from an optional backend message.
    pub fn rejected(message: Option<&str>) -> Self {
        Self::Rejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or("request rejected by backend")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CrmError;

    #[test]
    fn rejected_prefers_backend_message() {
        let err = CrmError::rejected(Some("quota exceeded"));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn rejected_falls_back_on_blank_message() {
        assert_eq!(
            CrmError::rejected(Some("  ")).to_string(),
            "request rejected by backend"
        );
        assert_eq!(
            CrmError::rejected(None).to_string(),
            "request rejected by backend"
        );
    }

    #[test]
    fn unexpected_response_has_generic_text() {
        let err = CrmError::UnexpectedResponse { operation: "create" };
        assert_eq!(err.to_string(), "Unexpected response format");
    }
}
