//! tabview core - shared value and error types
//!
//! Every other tabview crate depends on this one. It defines:
//!
//! - `Value` - a dynamically typed cell value
//! - `Row` - a host-defined record addressed by field name
//! - `RowId` - the identity a table runtime assigns to each supplied row
//! - `TabviewError` / `Result`

mod error;
mod types;

pub use error::*;
pub use types::*;
