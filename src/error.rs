//! Error taxonomy for statement compilation.
//!
//! All errors are returned synchronously by the failing generator and
//! propagate unchanged through enclosing combinators; the first error
//! terminates the compile attempt.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A clause referenced a table that is not registered with the
    /// enclosing statement.
    #[error("table {0} is not in scope")]
    TableNotInScope(String),

    /// A descriptor field the variant mandates was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("select has no columns")]
    NoColumns,

    #[error("select has no from tables")]
    NoFromTables,

    #[error("insert has no values")]
    NoValues,

    /// Distinct from the other empty-statement errors so callers can
    /// special-case "nothing to update".
    #[error("update has no set assignments")]
    NoSets,

    /// DELETE without a predicate is refused unless the caller opted in
    /// with `full()`.
    #[error("delete without where clause, call full() to override")]
    DeleteWithoutWhere,
}
