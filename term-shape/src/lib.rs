//! # term-shape - Row-shape validation for delimited text
//!
//! term-shape checks that every row of a delimited text table (CSV, TSV, or
//! any single-byte delimiter) has the same, expected number of fields, and
//! reports the first row that does not. It is meant to run as a pre-flight
//! gate in ingestion pipelines, before a table is loaded into a downstream
//! store.
//!
//! ## Quick Start
//!
//! ```rust
//! use term_shape::prelude::*;
//! use term_shape::sources::{MemorySource, validate_source};
//!
//! # fn example() -> Result<()> {
//! let source = MemorySource::new("orders.csv", "id,item,qty\n1,\"nut, bolt\",3\n2,washer\n");
//! let result = validate_source(&source, 3)?;
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.first_offending_row_width(), Some(2));
//! println!("{result}");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## How it works
//!
//! The scan is a single pass over a lazy row stream. It stops pulling rows
//! as soon as one row's width differs from the expected count, so a broken
//! table is rejected without reading the rest of it. An empty table is valid.
//! A width mismatch is a verdict, not an error: [`ValidationResult`] carries
//! it. Errors ([`ShapeError`](error::ShapeError)) are reserved for tables that
//! cannot be read or tokenized.
//!
//! The scan works on any iterator of rows, not only on CSV:
//!
//! ```rust
//! use term_shape::core::validate_rows;
//!
//! let result = validate_rows(vec![vec!["a", "b"], vec!["c", "d"]], "inline", 2);
//! assert!(result.is_valid());
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: the scan ([`RowShapeValidator`](core::RowShapeValidator)) and its result
//! - **`sources`**: files, globs, in-memory strings, readers and (with the
//!   `cloud-storage` feature) S3, GCS and Azure objects
//! - **`formatters`**: human, JSON and Markdown rendering
//! - **`logging`**: `tracing` configuration helpers
//!
//! [`ValidationResult`]: core::ValidationResult

pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod security;
pub mod sources;
