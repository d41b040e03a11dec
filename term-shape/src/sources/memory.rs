//! In-memory and reader-backed sources.

use super::{CsvOptions, CsvRows, RowSource};
use crate::prelude::*;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

/// Delimited text already held in memory.
///
/// # Examples
///
/// ```rust
/// use term_shape::sources::{MemorySource, validate_source};
///
/// let source = MemorySource::new("simple_valid.csv", "Col1,Col2,Col3\nval1,val2,val3\n");
/// assert!(validate_source(&source, 3).unwrap().is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    identifier: String,
    content: Arc<[u8]>,
    options: CsvOptions,
}

impl MemorySource {
    /// Creates a source over `content`, reported as `identifier`.
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_options(identifier, content, CsvOptions::default())
    }

    /// Creates a source with custom tokenizer options.
    pub fn with_options(
        identifier: impl Into<String>,
        content: impl Into<String>,
        options: CsvOptions,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            content: Arc::from(content.into().into_bytes()),
            options,
        }
    }

    /// Returns the size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if there is no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl RowSource for MemorySource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn description(&self) -> String {
        format!("In-memory table: {} bytes", self.content.len())
    }

    fn open(&self) -> Result<CsvRows> {
        Ok(CsvRows::from_reader(
            Cursor::new(Arc::clone(&self.content)),
            &self.options,
        ))
    }
}

/// A source over an arbitrary reader such as standard input.
///
/// The reader can only be consumed once; opening the source a second time is
/// an error.
pub struct ReaderSource {
    identifier: String,
    reader: Mutex<Option<Box<dyn Read + Send>>>,
    options: CsvOptions,
}

impl ReaderSource {
    /// Wraps `reader`, reported as `identifier`.
    pub fn new<R>(identifier: impl Into<String>, reader: R, options: CsvOptions) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            identifier: identifier.into(),
            reader: Mutex::new(Some(Box::new(reader))),
            options,
        }
    }

    /// A source reading standard input, reported as `<stdin>`.
    pub fn stdin(options: CsvOptions) -> Self {
        Self::new("<stdin>", std::io::stdin(), options)
    }
}

impl std::fmt::Debug for ReaderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("identifier", &self.identifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RowSource for ReaderSource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn description(&self) -> String {
        format!("Reader: {}", self.identifier)
    }

    fn open(&self) -> Result<CsvRows> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| ShapeError::Internal("reader lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| {
                ShapeError::data_source(
                    "reader",
                    format!("{} has already been consumed", self.identifier),
                )
            })?;
        Ok(CsvRows::from_reader(reader, &self.options))
    }
}
