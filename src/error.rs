//! Application error type.
//!
//! Every fallible operation in the crate returns [`AppError`]. The error carries:
//!
//! - an [`ErrorKind`] so library callers can branch on the failure class
//! - a process exit code so the `tas` binary can report it directly
//! - a human-readable message

/// Failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A range whose maximum is below its minimum (or an out-of-bounds index range).
    InvalidRange,
    /// Arithmetic between spectra/decays defined on different axes.
    IncompatibleRange,
    /// Parallel arrays of different length.
    ArgumentMismatch,
    /// A nearest/directional index search found no qualifying element.
    EmptySearchResult,
    /// A value outside its domain (e.g. a non-positive wavelength).
    InvalidValue,
    /// Not enough data to perform the requested operation.
    InsufficientData,
    /// A required raw data file is missing.
    MissingFile,
    /// Malformed text (scientific values, CSV cells, documents).
    Format,
    /// Invalid configuration value.
    Config,
    /// Filesystem or archive failure.
    Io,
    /// Non-finite or otherwise unusable numerical result.
    Numerical,
}

impl ErrorKind {
    /// Exit code used by the `tas` binary for this kind.
    ///
    /// - 2: invalid user input / configuration / text
    /// - 3: data problems
    /// - 4: numerical or I/O failures
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidRange | ErrorKind::InvalidValue | ErrorKind::Format | ErrorKind::Config => 2,
            ErrorKind::IncompatibleRange
            | ErrorKind::ArgumentMismatch
            | ErrorKind::EmptySearchResult
            | ErrorKind::InsufficientData
            | ErrorKind::MissingFile => 3,
            ErrorKind::Io | ErrorKind::Numerical => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRange, message)
    }

    pub fn incompatible_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompatibleRange, message)
    }

    pub fn argument_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArgumentMismatch, message)
    }

    pub fn empty_search(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptySearchResult, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn missing_file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingFile, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Numerical, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::invalid_range("x").exit_code(), 2);
        assert_eq!(AppError::argument_mismatch("x").exit_code(), 3);
        assert_eq!(AppError::io("x").exit_code(), 4);
        assert_eq!(AppError::empty_search("x").kind(), ErrorKind::EmptySearchResult);
    }
}
