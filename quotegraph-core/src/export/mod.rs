//! Table export (CSV).

pub mod table;

pub use table::{parse, serialize, write_file};
