pub mod catalog;
pub mod http;
