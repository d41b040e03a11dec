//! Example demonstrating the various result formatters in term-shape.
//!
//! This example shows how to format validation results in different ways:
//! - Human-readable format for console output
//! - JSON format for programmatic consumption
//! - Markdown format for reports
//! - Custom formatting configurations

use term_shape::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, OutputFormat,
    ResultFormatter,
};
use term_shape::sources::{validate_source, MemorySource};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let source = MemorySource::new(
        "orders.csv",
        "order_id,customer,notes\n\
         1001,acme,\"rush, gift wrap\"\n\
         1002,globex,standard,\"an unquoted comma, split the note\"\n\
         1003,initech,standard\n",
    );
    let invalid = validate_source(&source, 3)?;
    let valid = validate_source(&MemorySource::new("empty.csv", ""), 3)?;

    println!("=== Human (default) ===");
    let human = HumanFormatter::new();
    println!("{}", human.format(&invalid)?);
    println!("{}", human.format(&valid)?);

    println!("\n=== Human (minimal) ===");
    println!(
        "{}",
        HumanFormatter::with_config(FormatterConfig::minimal()).format(&invalid)?
    );

    println!("\n=== Human (truncated fields) ===");
    let truncated = FormatterConfig::minimal().with_max_field_length(Some(8));
    println!("{}", HumanFormatter::with_config(truncated).format(&invalid)?);

    println!("\n=== JSON ===");
    println!("{}", JsonFormatter::new().format(&invalid)?);

    println!("\n=== JSON (compact, CI) ===");
    println!(
        "{}",
        JsonFormatter::with_config(FormatterConfig::ci())
            .with_pretty(false)
            .format(&valid)?
    );

    println!("\n=== Markdown ===");
    println!(
        "{}",
        MarkdownFormatter::new()
            .with_heading_level(3)
            .format(&invalid)?
    );

    println!("\n=== Selected at runtime ===");
    for name in ["human", "json", "md"] {
        let format: OutputFormat = name.parse()?;
        let formatter = format.formatter(FormatterConfig::minimal());
        println!("[{name}] {}", formatter.format(&valid)?);
    }

    Ok(())
}
