//! Basic validation example demonstrating term-shape's core functionality.
//!
//! This example shows how to:
//! - Validate a file on disk, with default and custom tokenizer options
//! - Validate text already held in memory
//! - Read the verdict and the offending row
//!
//! Run with:
//! ```bash
//! cargo run --example basic_validation
//! ```

use std::io::Write;
use term_shape::prelude::*;
use term_shape::sources::{validate_source, FileSource, MemorySource};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // A customer export where one row lost its trailing field
    let csv_data = r#"customer_id,name,email,age
1,Alice Johnson,alice@example.com,28
2,"Smith, Bob",bob@example.com,35
3,Carol Davis,carol@example.com
4,David Wilson,david@example.com,31"#;

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(csv_data.as_bytes())?;
    file.flush()?;

    println!("Running basic validation example...\n");

    let source = FileSource::new(file.path()).with_identifier("customers.csv");
    let result = validate_source(&source, 4)?;
    println!("{result}");

    if let Some(row) = result.offending_row() {
        println!(
            "  record {} has {} fields, expected {}",
            row.record_number(),
            row.width(),
            result.expected_field_count()
        );
    }

    // The same text parsed with the wrong delimiter is ragged from the first row
    let semicolons = FileSource::with_options(file.path(), CsvOptions::default().with_delimiter(b';'))
        .with_identifier("customers.csv (';')");
    println!("{}", validate_source(&semicolons, 4)?);

    // In-memory text, e.g. a payload received over the network
    let payload = MemorySource::new("payload", "sku,qty\nA-1,3\nB-2,5\n");
    let verdict = validate_source(&payload, 2)?;
    println!("{verdict}");
    assert!(verdict.is_valid());

    // Rows produced by any other means go straight to the validator
    let rows = vec![vec!["a", "b", "c"], vec!["d", "e", "f"]];
    let in_process = RowShapeValidator::new("generated", 3).validate_rows(rows);
    println!("{in_process}");

    Ok(())
}
