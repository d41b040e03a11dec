//! The row-shape scan.
//!
//! [`RowShapeValidator`] pulls rows from a lazy stream, one at a time, and
//! stops at the first row whose width differs from the expected field count.
//! Rows after that point are never requested from the stream.

use super::result::ValidationResult;

/// A tokenized record whose width can be measured without copying it.
///
/// Only the offending row is ever converted into owned strings.
pub trait Row {
    /// Number of fields in the row.
    fn width(&self) -> usize;

    /// Consumes the row, returning its fields.
    fn into_fields(self) -> Vec<String>;
}

impl<S: Into<String>> Row for Vec<S> {
    fn width(&self) -> usize {
        self.len()
    }

    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> Row for [S; N] {
    fn width(&self) -> usize {
        N
    }

    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: AsRef<str>> Row for &[S] {
    fn width(&self) -> usize {
        self.len()
    }

    fn into_fields(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_owned()).collect()
    }
}

impl Row for csv::StringRecord {
    fn width(&self) -> usize {
        self.len()
    }

    fn into_fields(self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

/// Checks that every row of a stream has the same, expected number of fields.
///
/// The validator holds no state between calls; each call to
/// [`validate`](Self::validate) builds a fresh [`ValidationResult`].
///
/// # Examples
///
/// ```rust
/// use term_shape::core::RowShapeValidator;
///
/// let validator = RowShapeValidator::new("inline", 2);
/// let result = validator.validate_rows(vec![vec!["a", "b"], vec!["c", "d", "e"]]);
///
/// assert!(!result.is_valid());
/// assert_eq!(result.first_offending_row_width(), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct RowShapeValidator {
    source_identifier: String,
    expected_field_count: i64,
}

impl RowShapeValidator {
    /// Creates a validator for the given source label and expected width.
    ///
    /// `expected_field_count` is used as given: zero only accepts zero-width
    /// rows and a negative count rejects every row.
    pub fn new(source_identifier: impl Into<String>, expected_field_count: i64) -> Self {
        Self {
            source_identifier: source_identifier.into(),
            expected_field_count,
        }
    }

    /// Returns the label carried into every result.
    pub fn source_identifier(&self) -> &str {
        &self.source_identifier
    }

    /// Returns the expected number of fields per row.
    pub fn expected_field_count(&self) -> i64 {
        self.expected_field_count
    }

    /// Scans a fallible row stream.
    ///
    /// The first error pulled from the stream is returned unchanged. A width
    /// mismatch is not an error; it ends the scan with an invalid result.
    pub fn validate<I, R, E>(&self, rows: I) -> Result<ValidationResult, E>
    where
        I: IntoIterator<Item = Result<R, E>>,
        R: Row,
    {
        for (index, row) in rows.into_iter().enumerate() {
            let row = row?;
            if !self.matches(row.width()) {
                return Ok(ValidationResult::invalid(
                    self.source_identifier.clone(),
                    self.expected_field_count,
                    index as u64 + 1,
                    row.into_fields(),
                ));
            }
        }

        Ok(ValidationResult::valid(
            self.source_identifier.clone(),
            self.expected_field_count,
        ))
    }

    /// Scans a stream of rows that cannot fail.
    pub fn validate_rows<I, R>(&self, rows: I) -> ValidationResult
    where
        I: IntoIterator<Item = R>,
        R: Row,
    {
        match self.validate(rows.into_iter().map(Ok::<R, std::convert::Infallible>)) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    fn matches(&self, width: usize) -> bool {
        i64::try_from(width).map_or(false, |width| width == self.expected_field_count)
    }
}

/// Scans `rows` and reports the first one whose width is not
/// `expected_field_count`.
///
/// Shorthand for `RowShapeValidator::new(source_identifier, expected_field_count).validate(rows)`.
pub fn validate<I, R, E>(
    rows: I,
    source_identifier: impl Into<String>,
    expected_field_count: i64,
) -> Result<ValidationResult, E>
where
    I: IntoIterator<Item = Result<R, E>>,
    R: Row,
{
    RowShapeValidator::new(source_identifier, expected_field_count).validate(rows)
}

/// Infallible form of [`validate`].
pub fn validate_rows<I, R>(
    rows: I,
    source_identifier: impl Into<String>,
    expected_field_count: i64,
) -> ValidationResult
where
    I: IntoIterator<Item = R>,
    R: Row,
{
    RowShapeValidator::new(source_identifier, expected_field_count).validate_rows(rows)
}
