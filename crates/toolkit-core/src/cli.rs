//! CLI-specific value types.
//!
//! Strong types for output format selection and process exit codes, shared
//! by the binary and its formatters.
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//! assert!(ExitCode::SUCCESS.is_success());
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Colored output for humans
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::Config {
                message: format!("invalid output format: '{s}' (expected: json, text, or pretty)"),
            }),
        }
    }
}

/// Process exit code with semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution.
    pub const SUCCESS: Self = Self(0);

    /// General error.
    pub const ERROR: Self = Self(1);

    /// Invalid input, configuration or credentials.
    pub const INVALID_INPUT: Self = Self(2);

    /// Remote API failure.
    pub const API_ERROR: Self = Self(3);

    /// Requested product, adapter or record does not exist.
    pub const NOT_FOUND: Self = Self(4);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Maps an engine error to the exit code reported for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::Error;
    /// use toolkit_engine_core::cli::ExitCode;
    ///
    /// let err = Error::Api { status: Some(500), body: String::new() };
    /// assert_eq!(ExitCode::for_error(&err), ExitCode::API_ERROR);
    /// ```
    #[must_use]
    pub const fn for_error(err: &Error) -> Self {
        match err {
            Error::Config { .. }
            | Error::InvalidSelection { .. }
            | Error::MissingParameter { .. }
            | Error::UnsupportedOperation { .. } => Self::INVALID_INPUT,
            Error::Api { .. } | Error::Discovery { .. } => Self::API_ERROR,
            Error::NotFound { .. } | Error::ProductNotFound { .. } | Error::AdapterNotFound { .. } => {
                Self::NOT_FOUND
            }
            _ => Self::ERROR,
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
