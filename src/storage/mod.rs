pub mod document;
pub mod sql;
