use std::path::PathBuf;

use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("catalog file `{path}` lists product id {id} more than once")]
    DuplicateId { path: PathBuf, id: ProductId },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("unsupported media type: {message}")]
    UnsupportedMediaType { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), correlation_id: "unassigned".to_owned() }
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            message: message.into(),
            correlation_id: "unassigned".to_owned(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        let correlation_id = correlation_id.into();
        match &mut self {
            Self::BadRequest { correlation_id: id, .. }
            | Self::UnsupportedMediaType { correlation_id: id, .. } => *id = correlation_id,
        }
        self
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::UnsupportedMediaType { correlation_id, .. } => correlation_id,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "I couldn't read that request. Please send a JSON body with the expected fields."
            }
            Self::UnsupportedMediaType { .. } => {
                "Please send the request body as JSON (Content-Type: application/json)."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::domain::product::ProductId;
    use crate::errors::{CatalogError, InterfaceError};

    #[test]
    fn bad_request_carries_correlation_id() {
        let interface = InterfaceError::bad_request("missing field `message`")
            .with_correlation_id("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.correlation_id(), "req-1");
    }

    #[test]
    fn user_messages_do_not_leak_parser_details() {
        let interface = InterfaceError::bad_request("expected value at line 1 column 1");
        assert!(!interface.user_message().contains("line 1"));

        let interface = InterfaceError::unsupported_media_type("missing content type");
        assert!(interface.user_message().contains("application/json"));
    }

    #[test]
    fn duplicate_id_error_names_path_and_id() {
        let error = CatalogError::DuplicateId {
            path: PathBuf::from("data/products.json"),
            id: ProductId(42),
        };
        let message = error.to_string();
        assert!(message.contains("data/products.json"));
        assert!(message.contains("42"));
    }
}
