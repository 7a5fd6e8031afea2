use super::types::AssetIntelError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl AssetIntelError {
    /// Classify this error to determine its type and whether a remote call
    /// producing it may be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Transient remote conditions
            AssetIntelError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                retryable: true,
            },
            AssetIntelError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            AssetIntelError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },

            // Caller or credential problems never improve on retry
            AssetIntelError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
            },
            AssetIntelError::Permission(_) => ErrorClassification {
                error_type: "PermissionError",
                retryable: false,
            },
            AssetIntelError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            AssetIntelError::InvalidArgument(_) => ErrorClassification {
                error_type: "InvalidArgumentError",
                retryable: false,
            },

            // Lookup misses and pipeline outcomes are reportable, not transient
            AssetIntelError::MalformedRecord { .. } => ErrorClassification {
                error_type: "MalformedRecordError",
                retryable: false,
            },
            AssetIntelError::StoreUnavailable { .. } => ErrorClassification {
                error_type: "StoreUnavailableError",
                retryable: false,
            },
            AssetIntelError::ExportFailed(_) => ErrorClassification {
                error_type: "ExportFailedError",
                retryable: false,
            },
            AssetIntelError::AssetNotFound { .. } => ErrorClassification {
                error_type: "AssetNotFoundError",
                retryable: false,
            },
            AssetIntelError::PluginNotFound { .. } => ErrorClassification {
                error_type: "PluginNotFoundError",
                retryable: false,
            },
            AssetIntelError::Api(_) => ErrorClassification {
                error_type: "ApiError",
                retryable: false,
            },
            AssetIntelError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            AssetIntelError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            AssetIntelError::Csv(_) => ErrorClassification {
                error_type: "CsvError",
                retryable: false,
            },
            AssetIntelError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                retryable: false,
            },

            AssetIntelError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
            AssetIntelError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_retryable() {
        let err = AssetIntelError::RateLimit("too many requests".into());
        let class = err.classify();
        assert!(class.retryable);
        assert_eq!(class.error_type, "RateLimitError");
    }

    #[test]
    fn test_auth_error_not_retryable() {
        let err = AssetIntelError::Authentication("bad key".into());
        let class = err.classify();
        assert!(!class.retryable);
        assert_eq!(class.error_type, "AuthenticationError");
    }

    #[test]
    fn test_network_and_timeout_retryable() {
        assert!(AssetIntelError::Network("connection refused".into()).classify().retryable);
        assert!(AssetIntelError::Timeout("timed out".into()).classify().retryable);
    }

    #[test]
    fn test_lookup_misses_not_retryable() {
        let err = AssetIntelError::AssetNotFound { identifier: "web-01".into() };
        assert!(!err.classify().retryable);
        let err = AssetIntelError::PluginNotFound { plugin_id: 10114 };
        assert_eq!(err.classify().error_type, "PluginNotFoundError");
    }

    #[test]
    fn test_export_failed_not_retryable() {
        let err = AssetIntelError::ExportFailed("job reported ERROR".into());
        assert!(!err.classify().retryable);
    }

    #[test]
    fn test_store_unavailable_message_names_path() {
        let err = AssetIntelError::store_unavailable(std::path::Path::new("/tmp/assets.csv"), "not found");
        assert!(err.to_string().contains("/tmp/assets.csv"));
        assert_eq!(err.classify().error_type, "StoreUnavailableError");
    }
}
