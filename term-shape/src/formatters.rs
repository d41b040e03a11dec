//! Result formatting for row-shape verdicts.
//!
//! This module provides formatters that render a [`ValidationResult`] as a
//! one-line human message, as JSON for programmatic consumers, or as Markdown
//! for reports.
//!
//! # Examples
//!
//! ```rust
//! use term_shape::core::ValidationResult;
//! use term_shape::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//!
//! let result = ValidationResult::invalid(
//!     "data.csv",
//!     4,
//!     2,
//!     vec!["1".to_string(), "2".to_string(), "3".to_string()],
//! );
//! let formatter = HumanFormatter::with_config(FormatterConfig::minimal());
//! assert_eq!(
//!     formatter.format(&result).unwrap(),
//!     "data.csv is invalid. expected 4 columns but found 3 in this row: ['1', '2', '3']"
//! );
//! ```

use crate::core::result::{write_quoted, FieldList};
use crate::core::{OffendingRow, ValidationResult};
use crate::logging::truncate_field;
use crate::prelude::*;
use std::fmt::Write;
use std::str::FromStr;

/// Configuration options for formatting validation results.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to mention the 1-based record number of the offending row
    pub include_record_number: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
    /// Truncate rendered field values longer than this many bytes
    pub max_field_length: Option<usize>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            include_record_number: true,
            include_timestamps: false,
            max_field_length: None,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration: the plain message and nothing else.
    pub fn minimal() -> Self {
        Self {
            use_colors: false,
            include_record_number: false,
            include_timestamps: false,
            max_field_length: None,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            use_colors: false,
            include_record_number: true,
            include_timestamps: true,
            max_field_length: Some(256),
        }
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Sets whether to mention the offending record number.
    pub fn with_record_number(mut self, include: bool) -> Self {
        self.include_record_number = include;
        self
    }

    /// Sets whether to include a timestamp.
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Sets the maximum rendered length of a single field.
    pub fn with_max_field_length(mut self, max: Option<usize>) -> Self {
        self.max_field_length = max;
        self
    }

    fn field<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_field_length {
            Some(max) if value.len() > max => truncate_field(value, max).into(),
            _ => value.into(),
        }
    }
}

/// Trait for formatting validation results into different output formats.
pub trait ResultFormatter {
    /// Formats a validation result into a string representation.
    fn format(&self, result: &ValidationResult) -> Result<String>;

    /// Formats a validation result with custom configuration.
    fn format_with_config(
        &self,
        result: &ValidationResult,
        _config: &FormatterConfig,
    ) -> Result<String> {
        // Default implementation ignores config and uses standard format
        self.format(result)
    }
}

/// Output formats understood by [`OutputFormat::formatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line of text per source
    #[default]
    Human,
    /// Structured JSON
    Json,
    /// A Markdown report
    Markdown,
}

impl OutputFormat {
    /// Returns a formatter for this output format.
    pub fn formatter(self, config: FormatterConfig) -> Box<dyn ResultFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter::with_config(config)),
            Self::Json => Box::new(JsonFormatter::with_config(config)),
            Self::Markdown => Box::new(MarkdownFormatter::with_config(config)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ShapeError::Configuration(format!(
                "Unknown output format '{other}' (expected human, json or markdown)"
            ))),
        }
    }
}

/// Formats results as the one-line message `<source> is valid` or
/// `<source> is invalid. expected N columns but found M in this row: [...]`.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();

        if config.include_timestamps {
            write!(output, "[{}] ", chrono::Utc::now().to_rfc3339()).map_err(fmt_error)?;
        }

        let Some(row) = result.offending_row() else {
            let verdict = paint("valid", "32", config.use_colors);
            write!(output, "{} is {verdict}", result.source_identifier()).map_err(fmt_error)?;
            return Ok(output);
        };

        let verdict = paint("invalid", "31", config.use_colors);
        write!(
            output,
            "{} is {verdict}. expected {} columns but found {} in this row",
            result.source_identifier(),
            result.expected_field_count(),
            row.width()
        )
        .map_err(fmt_error)?;

        if config.include_record_number {
            write!(output, " (record {})", row.record_number()).map_err(fmt_error)?;
        }
        output.push_str(": ");

        if config.max_field_length.is_none() {
            write!(output, "{}", FieldList(row.fields())).map_err(fmt_error)?;
        } else {
            write_truncated_fields(&mut output, row, config).map_err(fmt_error)?;
        }

        Ok(output)
    }
}

fn write_truncated_fields(
    output: &mut String,
    row: &OffendingRow,
    config: &FormatterConfig,
) -> std::fmt::Result {
    output.push('[');
    for (i, field) in row.fields().iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        write_quoted(output, &config.field(field))?;
    }
    output.push(']');
    Ok(())
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{color}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn fmt_error(e: std::fmt::Error) -> ShapeError {
    ShapeError::Internal(format!("Failed to format result: {e}"))
}

/// Formats validation results as structured JSON.
///
/// # Examples
///
/// ```rust
/// use term_shape::core::ValidationResult;
/// use term_shape::formatters::{JsonFormatter, ResultFormatter};
///
/// let json = JsonFormatter::new()
///     .with_pretty(false)
///     .format(&ValidationResult::valid("a.csv", 3))
///     .unwrap();
/// assert!(json.contains("\"is_valid\":true"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut value = serde_json::to_value(result).map_err(|e| {
            ShapeError::Serialization(format!("Failed to serialize result to JSON: {e}"))
        })?;

        if config.include_timestamps {
            if let Some(object) = value.as_object_mut() {
                object.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
                );
            }
        }

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        rendered.map_err(|e| {
            ShapeError::Serialization(format!("Failed to serialize result to JSON: {e}"))
        })
    }
}

/// Formats validation results as Markdown suitable for reports.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a new Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    /// Creates a new Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, result: &ValidationResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        self.render(result, config).map_err(fmt_error)
    }
}

impl MarkdownFormatter {
    fn render(
        &self,
        result: &ValidationResult,
        config: &FormatterConfig,
    ) -> std::result::Result<String, std::fmt::Error> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        if result.is_valid() {
            writeln!(output, "{h} ✅ Row Shape Report - VALID")?;
        } else {
            writeln!(output, "{h} ❌ Row Shape Report - INVALID")?;
        }

        writeln!(output)?;
        writeln!(
            output,
            "**Source:** {}",
            escape_cell(result.source_identifier())
        )?;
        if config.include_timestamps {
            writeln!(output, "**Timestamp:** {}", chrono::Utc::now().to_rfc3339())?;
        }

        writeln!(output)?;
        writeln!(output, "| Metric | Value |")?;
        writeln!(output, "|--------|-------|")?;
        writeln!(
            output,
            "| Expected Columns | {} |",
            result.expected_field_count()
        )?;

        if let Some(row) = result.offending_row() {
            writeln!(output, "| Found Columns | {} |", row.width())?;
            if config.include_record_number {
                writeln!(output, "| Record | {} |", row.record_number())?;
            }

            writeln!(output)?;
            writeln!(output, "{h}# Offending Row")?;
            writeln!(output)?;
            writeln!(output, "| # | Field |")?;
            writeln!(output, "|---|-------|")?;
            for (i, field) in row.fields().iter().enumerate() {
                writeln!(output, "| {} | `{}` |", i + 1, escape_cell(&config.field(field)))?;
            }
        }

        Ok(output)
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
