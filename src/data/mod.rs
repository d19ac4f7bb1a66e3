pub mod table;
pub mod value;

pub use table::{ColumnSelector, Table, TableError};
pub use value::Value;
