//! Output formatters for CLI commands.
//!
//! Every command serializes its result and renders it in the format chosen
//! with `--format`.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use toolkit_engine_core::cli::OutputFormat;

/// Renders `data` in `format`.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use toolkit_engine_cli::formatters::format_output;
/// use toolkit_engine_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Registered {
///     product_id: String,
/// }
///
/// let out = format_output(
///     &Registered { product_id: "pipedrive".into() },
///     OutputFormat::Text,
/// )?;
/// assert_eq!(out, r#"{"product_id":"pipedrive"}"#);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output.
pub mod json {
    use super::{Result, Serialize};

    /// Indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain output for scripts.
pub mod text {
    use super::{Result, Serialize, json};

    /// Single-line JSON without colors.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Colored output for terminals.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;
    use std::fmt::Write;

    const INDENT: &str = "  ";

    /// Indented YAML-like rendering with colored keys and scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        match &value {
            Value::Object(_) | Value::Array(_) => write_nested(&mut out, &value, 0)?,
            scalar => out.push_str(&scalar_text(scalar)),
        }
        Ok(out.trim_end().to_string())
    }

    fn write_nested(out: &mut String, value: &Value, depth: usize) -> std::fmt::Result {
        let pad = INDENT.repeat(depth);
        match value {
            Value::Object(map) if map.is_empty() => writeln!(out, "{pad}{}", "(empty)".dimmed()),
            Value::Array(items) if items.is_empty() => {
                writeln!(out, "{pad}{}", "(none)".dimmed())
            }
            Value::Object(map) => {
                for (key, item) in map {
                    if is_scalar(item) {
                        writeln!(out, "{pad}{}: {}", key.blue().bold(), scalar_text(item))?;
                    } else {
                        writeln!(out, "{pad}{}:", key.blue().bold())?;
                        write_nested(out, item, depth + 1)?;
                    }
                }
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    if is_scalar(item) {
                        writeln!(out, "{pad}- {}", scalar_text(item))?;
                    } else {
                        writeln!(out, "{pad}-")?;
                        write_nested(out, item, depth + 1)?;
                    }
                }
                Ok(())
            }
            scalar => writeln!(out, "{pad}{}", scalar_text(scalar)),
        }
    }

    const fn is_scalar(value: &Value) -> bool {
        !matches!(value, Value::Object(_) | Value::Array(_))
    }

    fn scalar_text(value: &Value) -> String {
        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            other => other.to_string(),
        }
    }
}
