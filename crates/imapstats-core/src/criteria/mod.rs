//! Matching rules and their compilation to IMAP SEARCH.
//!
//! A [`Criterion`] is what users write in YAML. [`compile`] turns it into a
//! [`Query`], an immutable tree that mirrors IMAP SEARCH semantics, and
//! [`Query::to_search_criteria`] lowers that to the wire-level key tree.

mod compiler;
mod model;

pub use compiler::{Query, compile};
pub use model::Criterion;
