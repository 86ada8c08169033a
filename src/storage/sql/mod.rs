pub mod query;

pub use query::{insert_returning, select_filtered, update_returning, FieldSet, SqlValue};
