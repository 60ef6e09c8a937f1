//! Domain logic: filtering, schema interpretation, sorting and the table engine

pub mod filter;
pub mod schema;
pub mod sort;
pub mod table;
