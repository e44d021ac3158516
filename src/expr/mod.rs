//! Descriptor values that generate SQL fragments.
//!
//! Every predicate, join condition, projected column, ordering and
//! grouping term is an immutable value implementing [`Generate`];
//! combinators recurse over their children in list order.

pub mod column;
pub mod join;
pub mod order;
pub mod predicate;

use crate::error::Error;
use crate::scope::Scope;

/// The single capability shared by all clause descriptors: given the
/// enclosing statement's scope, produce a SQL fragment or fail.
pub trait Generate {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error>;
}
