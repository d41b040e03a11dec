//! Local file source implementation.

use super::{CsvOptions, CsvRows, RowSource};
use crate::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A delimited text file on the local filesystem.
///
/// The file is opened on each call to [`RowSource::open`] and closed when the
/// returned stream is dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use term_shape::sources::{CsvOptions, FileSource, validate_source};
///
/// # fn example() -> term_shape::prelude::Result<()> {
/// let source = FileSource::new("data/users.csv");
/// let result = validate_source(&source, 3)?;
///
/// // Tab separated, one source per matching file
/// for source in FileSource::from_glob("data/*.tsv", CsvOptions::tsv())? {
///     println!("{}", validate_source(&source, 5)?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    identifier: String,
    options: CsvOptions,
}

impl FileSource {
    /// Creates a source for a single file with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a source for a single file with custom options.
    pub fn with_options(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        let path = path.into();
        Self {
            identifier: path.display().to_string(),
            path,
            options,
        }
    }

    /// Creates one source per regular file matching a glob pattern.
    pub fn from_glob(pattern: impl Into<String>, options: CsvOptions) -> Result<Vec<Self>> {
        Self::from_globs(vec![pattern.into()], options)
    }

    /// Creates one source per regular file matching any of the glob patterns.
    pub fn from_globs(patterns: Vec<String>, options: CsvOptions) -> Result<Vec<Self>> {
        let paths = super::expand_globs(&patterns)?;
        Ok(paths
            .into_iter()
            .map(|path| Self::with_options(path, options.clone()))
            .collect())
    }

    /// Replaces the label reported in results (the path by default).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the tokenizer options.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }
}

impl RowSource for FileSource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn description(&self) -> String {
        format!("CSV file: {}", self.path.display())
    }

    #[instrument(skip(self), fields(source.type = "file", path = %self.path.display()))]
    fn open(&self) -> Result<CsvRows> {
        let file = File::open(&self.path)?;
        debug!(
            source.type = "file",
            csv.delimiter = %self.options.delimiter as char,
            csv.quote = %self.options.quote as char,
            "Opened file source"
        );
        Ok(CsvRows::from_reader(BufReader::new(file), &self.options))
    }
}
