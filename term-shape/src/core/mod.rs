//! Core validation types.
//!
//! - [`RowShapeValidator`] and the [`validate`] functions perform the scan
//! - [`ValidationResult`] is the immutable verdict it produces

pub mod result;
pub mod validator;

pub use result::{OffendingRow, ValidationResult};
pub use validator::{validate, validate_rows, Row, RowShapeValidator};
