//! Validation result types.

use serde::Serialize;
use std::fmt;

/// The first row of a table whose width differs from the expected field count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffendingRow {
    /// 1-based position of the row in stream order
    record_number: u64,
    /// Number of fields the tokenizer produced for the row
    width: usize,
    /// The row's fields, already unquoted by the tokenizer
    fields: Vec<String>,
}

impl OffendingRow {
    /// Creates an offending row. The width is always taken from `fields`.
    pub fn new(record_number: u64, fields: Vec<String>) -> Self {
        Self {
            record_number,
            width: fields.len(),
            fields,
        }
    }

    /// Returns the 1-based position of the row in stream order.
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    /// Returns the number of fields in the row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the row's fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// The verdict of a row-shape scan over a single data source.
///
/// A result is built once, when the scan finishes, and cannot be changed
/// afterwards. The offending row is present exactly when the table is invalid.
///
/// # Examples
///
/// ```rust
/// use term_shape::core::ValidationResult;
///
/// let ok = ValidationResult::valid("users.csv", 3);
/// assert!(ok.is_valid());
/// assert_eq!(ok.to_string(), "users.csv is valid");
///
/// let bad = ValidationResult::invalid("users.csv", 3, 7, vec!["a".into(), "b".into()]);
/// assert!(!bad.is_valid());
/// assert_eq!(bad.first_offending_row_width(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    source_identifier: String,
    expected_field_count: i64,
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_offending_row: Option<OffendingRow>,
}

impl ValidationResult {
    /// Creates a result for a table where every row matched.
    pub fn valid(source_identifier: impl Into<String>, expected_field_count: i64) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            expected_field_count,
            is_valid: true,
            first_offending_row: None,
        }
    }

    /// Creates a result for a table whose row at `record_number` did not match.
    pub fn invalid(
        source_identifier: impl Into<String>,
        expected_field_count: i64,
        record_number: u64,
        fields: Vec<String>,
    ) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            expected_field_count,
            is_valid: false,
            first_offending_row: Some(OffendingRow::new(record_number, fields)),
        }
    }

    /// Returns the opaque label of the validated source.
    pub fn source_identifier(&self) -> &str {
        &self.source_identifier
    }

    /// Returns the field count every row was compared against.
    pub fn expected_field_count(&self) -> i64 {
        self.expected_field_count
    }

    /// Returns true if every scanned row had the expected field count.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Returns the first offending row, if the table is invalid.
    pub fn offending_row(&self) -> Option<&OffendingRow> {
        self.first_offending_row.as_ref()
    }

    /// Returns the fields of the first offending row, if the table is invalid.
    pub fn first_offending_row(&self) -> Option<&[String]> {
        self.first_offending_row.as_ref().map(OffendingRow::fields)
    }

    /// Returns the width of the first offending row, if the table is invalid.
    pub fn first_offending_row_width(&self) -> Option<usize> {
        self.first_offending_row.as_ref().map(OffendingRow::width)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.first_offending_row {
            None => write!(f, "{} is valid", self.source_identifier),
            Some(row) => write!(
                f,
                "{} is invalid. expected {} columns but found {} in this row: {}",
                self.source_identifier,
                self.expected_field_count,
                row.width,
                FieldList(&row.fields)
            ),
        }
    }
}

/// Renders fields as a bracketed list of single-quoted literals.
pub(crate) struct FieldList<'a>(pub(crate) &'a [String]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, field)?;
        }
        f.write_str("]")
    }
}

pub(crate) fn write_quoted(out: &mut impl fmt::Write, field: &str) -> fmt::Result {
    out.write_char('\'')?;
    for c in field.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '\'' => out.write_str("\\'")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_result_has_no_offending_row() {
        let result = ValidationResult::valid("data.csv", 4);
        assert!(result.is_valid());
        assert_eq!(result.source_identifier(), "data.csv");
        assert_eq!(result.expected_field_count(), 4);
        assert!(result.first_offending_row().is_none());
        assert!(result.first_offending_row_width().is_none());
    }

    #[test]
    fn test_invalid_result_width_matches_row() {
        let result = ValidationResult::invalid("data.csv", 4, 2, strings(&["1", "2", "3"]));
        assert!(!result.is_valid());
        assert_eq!(result.first_offending_row_width(), Some(3));
        assert_eq!(
            result.first_offending_row(),
            Some(strings(&["1", "2", "3"]).as_slice())
        );
        assert_eq!(result.offending_row().map(|r| r.record_number()), Some(2));
    }

    #[test]
    fn test_display_valid() {
        assert_eq!(
            ValidationResult::valid("data.csv", 4).to_string(),
            "data.csv is valid"
        );
    }

    #[test]
    fn test_display_invalid() {
        let result = ValidationResult::invalid("data.csv", 4, 1, strings(&["1", "2", "3"]));
        assert_eq!(
            result.to_string(),
            "data.csv is invalid. expected 4 columns but found 3 in this row: ['1', '2', '3']"
        );
    }

    #[test]
    fn test_display_escapes_quotes() {
        let result = ValidationResult::invalid("t", 1, 1, strings(&["it's", "a\\b", ""]));
        assert_eq!(
            result.to_string(),
            r"t is invalid. expected 1 columns but found 3 in this row: ['it\'s', 'a\\b', '']"
        );
    }

    #[test]
    fn test_display_empty_row() {
        let result = ValidationResult::invalid("t", 2, 5, Vec::new());
        assert!(result.to_string().ends_with("found 0 in this row: []"));
    }

    #[test]
    fn test_serialize_valid_omits_offending_row() {
        let json = serde_json::to_value(ValidationResult::valid("a.csv", 3)).unwrap();
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["expected_field_count"], 3);
        assert!(json.get("first_offending_row").is_none());
    }

    #[test]
    fn test_serialize_invalid() {
        let result = ValidationResult::invalid("a.csv", 2, 3, strings(&["x", "y", "z"]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["first_offending_row"]["record_number"], 3);
        assert_eq!(json["first_offending_row"]["width"], 3);
        assert_eq!(json["first_offending_row"]["fields"][2], "z");
    }
}
