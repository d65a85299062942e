use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Duplicate point id: {id}")]
    DuplicateId { id: String },

    #[error("Sample #{index} is not a finite number: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    #[error("Invalid start ordinal {ordinal}: ordinals are 1-based")]
    InvalidOrdinal { ordinal: u32 },

    #[error("Ordinal overflow: {len} samples starting at {start} exceed u32::MAX")]
    OrdinalOverflow { start: u32, len: usize },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Block '{label}' references unknown block '{reference}'")]
    UnknownBlock { label: String, reference: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Samples or points that break the engine's input contract.
    Input,
    Configuration,
    /// Rendering or writing report artifacts.
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Any failure that is not a filesystem error.
    High,
    /// The filesystem refused a read or write.
    Critical,
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::DuplicateId { .. }
            | AnalysisError::NonFiniteSample { .. }
            | AnalysisError::InvalidOrdinal { .. }
            | AnalysisError::OrdinalOverflow { .. } => ErrorCategory::Input,
            AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. }
            | AnalysisError::UnknownBlock { .. } => ErrorCategory::Configuration,
            AnalysisError::IoError(_)
            | AnalysisError::CsvError(_)
            | AnalysisError::SerializationError(_)
            | AnalysisError::ZipError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => match self {
                AnalysisError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::High,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalysisError::DuplicateId { .. } => {
                "Derive points with derive_points so ids are assigned sequentially"
            }
            AnalysisError::NonFiniteSample { .. } => {
                "Remove NaN or infinite values from the block's samples"
            }
            AnalysisError::InvalidOrdinal { .. } => "Use a start_ordinal of 1 or greater",
            AnalysisError::OrdinalOverflow { .. } => {
                "Lower start_ordinal or split the samples into smaller blocks"
            }
            AnalysisError::ConfigValidationError { .. } => {
                "Check the configuration file for TOML syntax errors"
            }
            AnalysisError::InvalidConfigValueError { .. } => {
                "Correct the reported field in the configuration file"
            }
            AnalysisError::MissingConfigError { .. } => {
                "Add the missing field to the configuration file"
            }
            AnalysisError::UnknownBlock { .. } => {
                "A composite block may only combine sample blocks declared before it"
            }
            AnalysisError::IoError(_) => "Check that the output directory exists and is writable",
            AnalysisError::CsvError(_) | AnalysisError::SerializationError(_) => {
                "Re-run with --verbose and report the failing block"
            }
            AnalysisError::ZipError(_) => "Disable bundling or check free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input data rejected: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Failed to write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
