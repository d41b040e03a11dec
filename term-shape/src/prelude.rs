//! Prelude for commonly used types and traits in term-shape.

pub use crate::core::{RowShapeValidator, ValidationResult};
pub use crate::error::{ErrorContext, Result, ShapeError};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::sources::{CsvOptions, RowSource};
