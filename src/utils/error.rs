use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutListError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

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

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Optimization error: {message}")]
    OptimizationError { message: String },

    #[error("Manifest error: {message}")]
    ManifestError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CutListError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::ValidationError { .. }
            | Self::NotFound { .. }
            | Self::CsvError(_)
            | Self::ManifestError { .. } => ErrorCategory::Input,
            Self::OptimizationError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Processing
            }
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::TomlError(_) | Self::ConfigError { .. } => {
                "Check the settings file syntax or regenerate it with `cutlist settings init`"
            }
            Self::InvalidConfigValueError { .. } => {
                "Fix the reported value and run the command again"
            }
            Self::ValidationError { .. } => "Review the input values; dimensions and prices must be positive",
            Self::NotFound { .. } => "List existing entries with `cutlist project list` or `cutlist material list`",
            Self::CsvError(_) => {
                "Make sure the CSV has the header name,length,width,thickness,quantity,material_id"
            }
            Self::ManifestError { .. } => "Check the manifest path and encoding",
            Self::OptimizationError { .. } => {
                "Try another algorithm, a smaller kerf, or enable rotation"
            }
            Self::SerializationError(_) => {
                "The workspace file may be corrupted; restore it from a backup export"
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { kind, key } => format!("Could not find {} '{}'", kind.to_lowercase(), key),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("The value given for '{}' is not valid: {}", field, reason)
            }
            Self::IoError(e) => format!("A file could not be read or written ({})", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CutListError>;
