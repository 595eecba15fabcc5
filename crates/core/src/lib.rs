//! Domain types for the sales visit log.
//!
//! No I/O lives here: the schema registry, record and draft types, the staff
//! roster and the history render model are all plain data and functions.

pub mod draft;
pub mod error;
pub mod history;
pub mod schema;
pub mod staff;
pub mod types;
pub mod visit;
