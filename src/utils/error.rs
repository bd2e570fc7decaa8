use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipsGoError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    MissingFieldError { message: String },

    #[error("Project '{record_id}' not found")]
    RecordNotFoundError { record_id: String },

    #[error("ShipsGo Integration is disabled in Settings")]
    IntegrationDisabledError,

    #[error("No ShipsGo token configured for user {user}")]
    TokenNotFoundError { user: String },

    #[error("ShipsGo token is not active for user {user}")]
    InactiveTokenError { user: String },

    #[error("ShipsGo API returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Record store error: {message}")]
    StoreError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ShipsGoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Remote,
    Network,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShipsGoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::MissingFieldError { .. }
            | Self::RecordNotFoundError { .. } => ErrorCategory::Input,
            Self::IntegrationDisabledError
            | Self::TokenNotFoundError { .. }
            | Self::InactiveTokenError { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ApiError { .. } | Self::SerializationError(_) => ErrorCategory::Remote,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::StoreError { .. } | Self::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Remote => match self {
                Self::ApiError { status, .. } if *status == 429 || *status >= 500 => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息（不含內部細節）
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } | Self::MissingFieldError { message } => {
                message.clone()
            }
            Self::HttpError(e) if e.is_timeout() => "Request timed out. Please try again.".into(),
            Self::HttpError(e) if e.is_connect() => "Unable to connect to ShipsGo.".into(),
            Self::HttpError(_) => "The request to ShipsGo failed.".into(),
            Self::ApiError { status, .. } => format!("ShipsGo rejected the request (HTTP {})", status),
            Self::StoreError { .. } | Self::IoError(_) => {
                "Local record store could not be read or written.".into()
            }
            Self::SerializationError(_) => "Unexpected data format received.".into(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Correct the tracking number format and save again",
            Self::MissingFieldError { .. } => "Fill in the carrier and tracking number first",
            Self::RecordNotFoundError { .. } => "Check the project name",
            Self::IntegrationDisabledError => "Set integration.enable = true in the configuration",
            Self::TokenNotFoundError { .. } => "Add a [[tokens]] entry for this user",
            Self::InactiveTokenError { .. } => "Mark the user's token as active",
            Self::ApiError { .. } => "Inspect the response body and the ShipsGo dashboard",
            Self::HttpError(_) => "Check network connectivity and retry later",
            Self::StoreError { .. } | Self::IoError(_) => "Check the store path and file permissions",
            Self::SerializationError(_) => "Verify the ShipsGo API version matches base_api_url",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and try again",
        }
    }
}
