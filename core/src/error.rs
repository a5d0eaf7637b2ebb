//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Resolution and configuration failures are created explicitly; only IO and
/// YAML errors convert automatically.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document or configuration could not be deserialized.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A referenced type has no matching schema and resolution was mandatory.
    #[from(ignore)]
    #[display("Unresolved type '{type_name}' referenced from {context}")]
    Resolution {
        /// The type name that could not be resolved.
        type_name: String,
        /// Where the reference was found (model field, operation return, ...).
        context: String,
    },

    /// The generator configuration is unusable. Raised before any enrichment.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_resolution_display_names_type() {
        let err = AppError::Resolution {
            type_name: "Order".into(),
            context: "operation 'getOrder' return type".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unresolved type 'Order' referenced from operation 'getOrder' return type"
        );
    }

    #[test]
    fn test_configuration_manual_creation() {
        let app_err = AppError::Configuration("moduleRoot must not be empty".into());
        assert_eq!(
            format!("{}", app_err),
            "Configuration Error: moduleRoot must not be empty"
        );
    }
}
