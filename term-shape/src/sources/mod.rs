//! Row sources for term-shape.
//!
//! A row source turns some acquisition method (a local file, an in-memory
//! string, an arbitrary reader, an object in cloud storage) into a lazy stream
//! of tokenized rows. The scan itself lives in [`core`](crate::core) and knows
//! nothing about where rows come from.
//!
//! Every source tokenizes with the `csv` crate, configured by [`CsvOptions`].
//! The reader is flexible, so ragged rows come through as data rather than as
//! parse errors, and headers are not special: the first line is a row like any
//! other.

use crate::core::{validate, ValidationResult};
use crate::prelude::*;
use csv::{StringRecord, StringRecordsIntoIter};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::io::Read;
use tracing::{debug, instrument};

mod file;
mod memory;

#[cfg(feature = "cloud-storage")]
pub mod cloud;

pub use file::FileSource;
pub use memory::{MemorySource, ReaderSource};

#[cfg(feature = "cloud-storage")]
pub use cloud::{DownloadedObject, ObjectStoreSource};

#[cfg(feature = "s3")]
pub use cloud::{S3Auth, S3Config};

/// Options for configuring how delimited text is split into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether `""` inside a quoted field is a literal quote (default: true)
    pub double_quote: bool,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            escape: None,
            comment: None,
        }
    }
}

impl CsvOptions {
    /// Options for tab separated files.
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the escape character.
    pub fn with_escape(mut self, escape: Option<u8>) -> Self {
        self.escape = escape;
        self
    }

    /// Sets the comment prefix.
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets whether doubled quotes are unescaped inside quoted fields.
    pub fn with_double_quote(mut self, enabled: bool) -> Self {
        self.double_quote = enabled;
        self
    }

    /// Builds a tokenizer for these options.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .escape(self.escape)
            .comment(self.comment);
        builder
    }
}

/// A lazy stream of tokenized rows.
///
/// Rows are read from the underlying reader on demand; dropping the stream
/// closes the reader. An empty line is a row with no fields. Comment lines
/// are not rows.
pub struct CsvRows {
    records: StringRecordsIntoIter<Recorded>,
    comment: Option<u8>,
    blank_rows: u64,
    ready: Option<Result<StringRecord>>,
    after_cr: bool,
    done: bool,
}

impl CsvRows {
    /// Wraps a reader, tokenizing it with `options`.
    pub fn from_reader<R>(reader: R, options: &CsvOptions) -> Self
    where
        R: Read + Send + 'static,
    {
        let reader = Recorded {
            inner: Box::new(reader),
            base: 0,
            bytes: VecDeque::new(),
        };
        Self {
            records: options.reader_builder().from_reader(reader).into_records(),
            comment: options.comment,
            blank_rows: 0,
            ready: None,
            after_cr: false,
            done: false,
        }
    }

    fn offset(&self) -> u64 {
        self.records.reader().position().byte()
    }

    /// Counts the empty lines the tokenizer skipped in `start..end` before
    /// the next record, and forgets the bytes up to `end`.
    fn skipped_blank_lines(&mut self, start: u64, end: u64) -> u64 {
        let comment = self.comment;
        let after_cr = self.after_cr;
        let recorded = self.records.reader_mut().get_mut();
        let to = (end.saturating_sub(recorded.base) as usize).min(recorded.bytes.len());
        let from = (start.saturating_sub(recorded.base) as usize).min(to);

        let blank = count_blank_lines(recorded.bytes.range(from..to).copied(), after_cr, comment);
        if to > from {
            self.after_cr = recorded.bytes.get(to - 1) == Some(&b'\r');
        }

        recorded.bytes.drain(..to);
        recorded.base += to as u64;
        blank
    }
}

/// Counts blank lines at the start of a record's span, skipping comment
/// lines and the `\n` left over from a previous `\r\n` terminator.
fn count_blank_lines(bytes: impl Iterator<Item = u8>, after_cr: bool, comment: Option<u8>) -> u64 {
    let mut bytes = bytes.peekable();
    if after_cr {
        bytes.next_if_eq(&b'\n');
    }

    let mut blank = 0;
    while let Some(&byte) = bytes.peek() {
        match byte {
            b'\r' | b'\n' => {
                bytes.next();
                if byte == b'\r' {
                    bytes.next_if_eq(&b'\n');
                }
                blank += 1;
            }
            c if Some(c) == comment => {
                while let Some(c) = bytes.next() {
                    if c == b'\n' {
                        break;
                    }
                    if c == b'\r' {
                        bytes.next_if_eq(&b'\n');
                        break;
                    }
                }
            }
            _ => break,
        }
    }
    blank
}

/// The tokenizer's input, keeping the bytes it has not yet moved past.
struct Recorded {
    inner: Box<dyn Read + Send>,
    base: u64,
    bytes: VecDeque<u8>,
}

impl Read for Recorded {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes.extend(&buf[..n]);
        Ok(n)
    }
}

impl Debug for CsvRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRows")
            .field("blank_rows", &self.blank_rows)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Iterator for CsvRows {
    type Item = Result<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.blank_rows > 0 {
                self.blank_rows -= 1;
                return Some(Ok(StringRecord::new()));
            }
            if let Some(row) = self.ready.take() {
                return Some(row);
            }
            if self.done {
                return None;
            }

            let start = self.offset();
            match self.records.next() {
                Some(row) => self.ready = Some(row.map_err(ShapeError::from)),
                None => self.done = true,
            }
            let end = self.offset();
            self.blank_rows = self.skipped_blank_lines(start, end);
        }
    }
}

/// A source of rows for validation.
///
/// Implementations own whatever resources acquisition needs and release them
/// when dropped. `open` may be called more than once unless the source says
/// otherwise.
///
/// # Examples
///
/// ```rust
/// use term_shape::sources::{MemorySource, RowSource, validate_source};
///
/// let source = MemorySource::new("inline", "a,b\nc,d\n");
/// let result = validate_source(&source, 2).unwrap();
/// assert!(result.is_valid());
/// ```
pub trait RowSource: Debug + Send + Sync {
    /// Returns the label reported in validation results.
    fn identifier(&self) -> &str;

    /// Returns a human-readable description of this source.
    fn description(&self) -> String;

    /// Opens a fresh row stream.
    fn open(&self) -> Result<CsvRows>;
}

/// Opens `source` and scans it for the first row whose width is not
/// `expected_field_count`.
///
/// Acquisition and tokenizer failures are returned as errors; a width
/// mismatch is returned as an invalid [`ValidationResult`].
#[instrument(skip(source), fields(source.id = %source.identifier()))]
pub fn validate_source(
    source: &dyn RowSource,
    expected_field_count: i64,
) -> Result<ValidationResult> {
    let rows = source.open()?;
    let result = validate(rows, source.identifier(), expected_field_count)?;

    debug!(
        source.id = %result.source_identifier(),
        valid = result.is_valid(),
        record = result.offending_row().map(|row| row.record_number()),
        "Row shape scan finished"
    );

    Ok(result)
}

/// Expands glob patterns into the paths of matching regular files.
pub(crate) fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    use glob::glob;

    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob(pattern).map_err(|e| {
            ShapeError::Configuration(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        for entry in matches {
            let path = entry.map_err(|e| ShapeError::Io(e.into_error()))?;

            if path.is_file() {
                if let Some(path_str) = path.to_str() {
                    paths.push(path_str.to_string());
                }
            }
        }
    }

    if paths.is_empty() {
        return Err(ShapeError::data_source(
            "file",
            "No files found matching glob patterns",
        ));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(input: &str, options: &CsvOptions) -> Vec<usize> {
        CsvRows::from_reader(std::io::Cursor::new(input.to_string()), options)
            .map(|row| row.unwrap().len())
            .collect()
    }

    #[test]
    fn test_default_options() {
        let options = CsvOptions::default();
        assert_eq!(options.delimiter, b',');
        assert_eq!(options.quote, b'"');
        assert!(options.double_quote);
        assert!(options.escape.is_none());
        assert!(options.comment.is_none());
    }

    #[test]
    fn test_header_is_a_row() {
        assert_eq!(widths("a,b,c\n1,2\n", &CsvOptions::default()), vec![3, 2]);
    }

    #[test]
    fn test_quoted_delimiter() {
        let rows: Vec<StringRecord> =
            CsvRows::from_reader(std::io::Cursor::new("1,\"2,2\",3\n"), &CsvOptions::default())
                .collect::<Result<_>>()
                .unwrap();
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), vec!["1", "2,2", "3"]);
    }

    #[test]
    fn test_mismatched_quote_splits_field() {
        let options = CsvOptions::default().with_quote(b'\'');
        assert_eq!(widths("1,\"2,2\",3\n", &options), vec![4]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        assert_eq!(widths("a,b,\n", &CsvOptions::default()), vec![3]);
    }

    #[test]
    fn test_tsv_and_comments() {
        let options = CsvOptions::tsv().with_comment(Some(b'#'));
        assert_eq!(widths("# note\na\tb\nc\td\n", &options), vec![2, 2]);
    }

    #[test]
    fn test_blank_line_is_an_empty_row() {
        let options = CsvOptions::default();
        assert_eq!(widths("a,b\n\nc,d\n", &options), vec![2, 0, 2]);
        assert_eq!(widths("\na,b\n", &options), vec![0, 2]);
        assert_eq!(widths("a,b\n\n", &options), vec![2, 0]);
        assert_eq!(widths("a,b\n\n\n\nc,d", &options), vec![2, 0, 0, 0, 2]);
    }

    #[test]
    fn test_blank_lines_with_crlf_terminators() {
        let options = CsvOptions::default();
        assert_eq!(widths("a,b\r\nc,d\r\n", &options), vec![2, 2]);
        assert_eq!(widths("a,b\r\n\r\nc,d\r\n", &options), vec![2, 0, 2]);
    }

    #[test]
    fn test_empty_line_inside_quotes_is_data() {
        assert_eq!(widths("\"x\n\ny\",z\nu,v\n", &CsvOptions::default()), vec![2, 2]);
    }

    #[test]
    fn test_comment_lines_are_not_rows() {
        let options = CsvOptions::default().with_comment(Some(b'#'));
        assert_eq!(widths("# note\n\n# more\na,b\n", &options), vec![0, 2]);
    }

    #[test]
    fn test_blank_row_comes_before_parse_error() {
        let mut rows = CsvRows::from_reader(
            std::io::Cursor::new(b"a,b\n\n\xff,c\n".to_vec()),
            &CsvOptions::default(),
        );
        assert_eq!(rows.next().unwrap().unwrap().len(), 2);
        assert_eq!(rows.next().unwrap().unwrap().len(), 0);
        assert!(rows.next().unwrap().unwrap_err().is_parse_error());
    }

    #[test]
    fn test_escape_character() {
        let options = CsvOptions::default()
            .with_double_quote(false)
            .with_escape(Some(b'\\'));
        let rows: Vec<StringRecord> = CsvRows::from_reader(
            std::io::Cursor::new("\"say \\\"hi\\\", ok\",x\n"),
            &options,
        )
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(&rows[0][0], "say \"hi\", ok");
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut rows = CsvRows::from_reader(
            std::io::Cursor::new(b"a,b\n\xff,c\n".to_vec()),
            &CsvOptions::default(),
        );
        assert!(rows.next().unwrap().is_ok());
        let err = rows.next().unwrap().unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_expand_globs_no_match() {
        let err = expand_globs(&["/definitely/not/here/*.csv".to_string()]).unwrap_err();
        assert!(matches!(err, ShapeError::DataSource { .. }));
    }

    #[test]
    fn test_expand_globs_invalid_pattern() {
        let err = expand_globs(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, ShapeError::Configuration(_)));
    }
}
