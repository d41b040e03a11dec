//! term-shape
//!
//! Checks that every row of one or more delimited text tables has the
//! expected number of fields.
//!
//! Exit status is 0 when every input is valid, 1 when any input has a row of
//! the wrong width, and 2 when an input could not be read or tokenized.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use term_shape::core::ValidationResult;
use term_shape::formatters::{FormatterConfig, OutputFormat, ResultFormatter};
use term_shape::log_data_op;
use term_shape::logging::setup::{init_logging, LoggingConfig};
use term_shape::logging::LogConfig;
use term_shape::security::redact_locator;
use term_shape::sources::{validate_source, CsvOptions, FileSource, ReaderSource, RowSource};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files, glob patterns, `-` for standard input, or object URLs
    /// (s3://, gs://, az://, requires the matching feature)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Expected number of fields in every row
    #[arg(short = 'c', long = "columns", allow_negative_numbers = true)]
    columns: i64,

    /// Field delimiter (a single ASCII character, or `\t`)
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Quote character
    #[arg(short, long, default_value = "\"")]
    quote: String,

    /// Escape character inside quoted fields
    #[arg(long)]
    escape: Option<String>,

    /// Skip lines starting with this character
    #[arg(long)]
    comment: Option<String>,

    /// Do not treat `""` inside a quoted field as a literal quote
    #[arg(long)]
    no_double_quote: bool,

    /// Output format: human, json or markdown
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Mention the record number of the offending row
    #[arg(long)]
    show_record_number: bool,

    /// Truncate rendered fields longer than this many bytes
    #[arg(long)]
    max_field_length: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn csv_options(&self) -> Result<CsvOptions> {
        Ok(CsvOptions {
            delimiter: parse_byte("delimiter", &self.delimiter)?,
            quote: parse_byte("quote", &self.quote)?,
            double_quote: !self.no_double_quote,
            escape: self
                .escape
                .as_deref()
                .map(|value| parse_byte("escape", value))
                .transpose()?,
            comment: self
                .comment
                .as_deref()
                .map(|value| parse_byte("comment", value))
                .transpose()?,
        })
    }

    /// Colors are only used when stdout is a terminal.
    fn formatter_config(&self, stdout_is_terminal: bool) -> FormatterConfig {
        FormatterConfig::default()
            .with_colors(stdout_is_terminal && !self.no_color)
            .with_record_number(self.show_record_number)
            .with_max_field_length(self.max_field_length)
    }

    fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from(&self.log_config()).with_json_format(self.json_logs)
    }

    fn log_config(&self) -> LogConfig {
        match self.verbose {
            0 => LogConfig::production(),
            1 => LogConfig::default(),
            _ => LogConfig::verbose(),
        }
    }
}

/// Parses a single-byte option value.
fn parse_byte(name: &str, value: &str) -> Result<u8> {
    let bytes = match value {
        "\\t" | "tab" => return Ok(b'\t'),
        other => other.as_bytes(),
    };
    match bytes {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(anyhow!(term_shape::error::ShapeError::Configuration(
            format!("--{name} must be a single ASCII character, got '{value}'")
        ))),
    }
}

#[derive(Debug, Default)]
struct Summary {
    valid: usize,
    invalid: usize,
    errors: usize,
}

impl Summary {
    fn record(&mut self, result: &ValidationResult) {
        if result.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
    }

    fn exit_code(&self) -> ExitCode {
        if self.errors > 0 {
            ExitCode::from(2)
        } else if self.invalid > 0 {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.logging_config()) {
        eprintln!("warning: could not initialize logging: {e}");
    }

    match run(&args).await {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: &Args) -> Result<Summary> {
    let options = args.csv_options()?;
    let formatter = args
        .format
        .formatter(args.formatter_config(std::io::stdout().is_terminal()));
    let log_config = args.log_config();
    let mut summary = Summary::default();

    for input in &args.inputs {
        let tables = match expand_input(input, &options) {
            Ok(tables) => tables,
            Err(e) => {
                report_error(input, &e, &mut summary);
                continue;
            }
        };

        for table in tables {
            match validate_table(&table, args.columns, &options).await {
                Ok(result) => {
                    log_result(&log_config, &result);
                    println!("{}", formatter.format(&result)?);
                    summary.record(&result);
                }
                Err(e) => report_error(table.label(), &e, &mut summary),
            }
        }
    }

    info!(
        valid = summary.valid,
        invalid = summary.invalid,
        errors = summary.errors,
        "Finished"
    );
    Ok(summary)
}

fn report_error(input: &str, error: &anyhow::Error, summary: &mut Summary) {
    let input = redact_locator(input);
    let chain = format!("{error:#}");
    warn!(input = %input, error = %chain, "Could not validate input");
    eprintln!("error: {input}: {chain}");
    summary.errors += 1;
}

fn log_result(config: &LogConfig, result: &ValidationResult) {
    log_data_op!(
        config,
        source.id = %result.source_identifier(),
        expected = result.expected_field_count(),
        valid = result.is_valid(),
        "Validated input"
    );

    if let (true, Some(row)) = (config.log_row_content, result.offending_row()) {
        let fields: Vec<String> = row
            .fields()
            .iter()
            .map(|field| config.preview(field))
            .collect();
        debug!(
            source.id = %result.source_identifier(),
            record = row.record_number(),
            width = row.width(),
            fields = ?fields,
            "Offending row"
        );
    }
}

/// One table named on the command line, after glob expansion.
#[derive(Debug)]
enum Table {
    Stdin,
    Remote(String),
    File(FileSource),
}

impl Table {
    fn label(&self) -> &str {
        match self {
            Table::Stdin => "-",
            Table::Remote(url) => url.as_str(),
            Table::File(source) => source.identifier(),
        }
    }
}

/// Classifies an input, expanding a glob pattern into one table per file.
fn expand_input(input: &str, options: &CsvOptions) -> Result<Vec<Table>> {
    if input == "-" {
        return Ok(vec![Table::Stdin]);
    }

    if input.contains("://") {
        return Ok(vec![Table::Remote(input.to_string())]);
    }

    if input.contains(['*', '?', '[']) {
        let sources = FileSource::from_glob(input, options.clone())?;
        debug!(pattern = input, files = sources.len(), "Expanded glob");
        return Ok(sources.into_iter().map(Table::File).collect());
    }

    Ok(vec![Table::File(FileSource::with_options(
        input,
        options.clone(),
    ))])
}

async fn validate_table(table: &Table, columns: i64, options: &CsvOptions) -> Result<ValidationResult> {
    match table {
        Table::Stdin => Ok(validate_source(&ReaderSource::stdin(options.clone()), columns)?),
        Table::Remote(url) => validate_remote(url, columns, options).await,
        Table::File(source) => Ok(validate_source(source, columns)?),
    }
}

#[cfg(feature = "cloud-storage")]
async fn validate_remote(url: &str, columns: i64, options: &CsvOptions) -> Result<ValidationResult> {
    use term_shape::sources::ObjectStoreSource;

    let source = ObjectStoreSource::from_url(url)?.with_options(options.clone());
    Ok(source.validate(columns).await?)
}

#[cfg(not(feature = "cloud-storage"))]
async fn validate_remote(url: &str, _columns: i64, _options: &CsvOptions) -> Result<ValidationResult> {
    Err(anyhow!(term_shape::error::ShapeError::Configuration(format!(
        "{url}: object storage support requires the `cloud-storage` feature"
    ))))
}
