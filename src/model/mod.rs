//! Data model for tabular data representation

mod schema;
mod table;

pub use schema::{unique_column_names, CellType, Column};
pub use table::{CellValue, Row, Table};
