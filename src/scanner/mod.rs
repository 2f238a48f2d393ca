//! Directory traversal

pub mod walker;

pub use walker::{is_reserved_name, TreeWalk};
