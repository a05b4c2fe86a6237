use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Spreadsheet rendering failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API responded with status {status}{}", detail_suffix(.message))]
    ApiResponseError {
        status: u16,
        message: Option<String>,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not signed in")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, DeskError>;

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Configuration,
    Input,
    FileSystem,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeskError::HttpError(_) => ErrorCategory::Network,
            DeskError::ApiResponseError { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Session
            }
            DeskError::ApiResponseError { .. } => ErrorCategory::Server,
            DeskError::ConfigError { .. }
            | DeskError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DeskError::ValidationError { .. } | DeskError::SerializationError(_) => {
                ErrorCategory::Input
            }
            DeskError::XlsxError(_) | DeskError::CsvError(_) | DeskError::IoError(_) => {
                ErrorCategory::FileSystem
            }
            DeskError::NotAuthenticated => ErrorCategory::Session,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Session => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::FileSystem => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，伺服器回傳的 message 原樣顯示
    pub fn user_friendly_message(&self) -> String {
        match self {
            DeskError::ApiResponseError {
                message: Some(message),
                ..
            } => message.clone(),
            DeskError::ApiResponseError { status, .. } => {
                format!("The server rejected the request (status {})", status)
            }
            DeskError::HttpError(e) if e.is_timeout() => "The server did not answer in time".to_string(),
            DeskError::HttpError(_) => "Could not reach the pricing API".to_string(),
            DeskError::NotAuthenticated => "You are not signed in".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API base URL and your connection, then retry",
            ErrorCategory::Server => "Review the request and retry; the server rejected it",
            ErrorCategory::Session => "Run `pricing-desk login` and retry",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::Input => "Correct the input values and retry",
            ErrorCategory::FileSystem => "Check that the output directory is writable",
        }
    }
}
