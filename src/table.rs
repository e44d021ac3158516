//! Table and alias identity.

use std::sync::Arc;

use crate::error::Error;
use crate::scope::BindMap;
use crate::stmt::select::Select;
use crate::token::{RandomTokens, TokenSource};

/// Handle to one scope member: a physical relation or a derived table
/// wrapping a nested select.
///
/// Identity is by handle, not by name: two tables built from the same
/// name are distinct scope members, while clones of one handle are the
/// same member. The alias is assigned once at construction and never
/// changes.
#[derive(Debug, Clone)]
pub struct Table {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    source: Source,
    alias: String,
}

#[derive(Debug)]
enum Source {
    Relation(String),
    Derived(Select),
}

impl Table {
    /// Physical relation; alias = name + `_` + token.
    pub fn new(name: &str) -> Self {
        Self::with_tokens(name, &RandomTokens)
    }

    pub fn with_tokens(name: &str, tokens: &dyn TokenSource) -> Self {
        Self {
            inner: Arc::new(Inner {
                alias: format!("{}_{}", name, tokens.next_token()),
                source: Source::Relation(name.to_string()),
            }),
        }
    }

    /// Derived table over a nested select; alias = token + `_` + token.
    pub fn derived(query: Select) -> Self {
        Self::derived_with_tokens(query, &RandomTokens)
    }

    pub fn derived_with_tokens(query: Select, tokens: &dyn TokenSource) -> Self {
        Self {
            inner: Arc::new(Inner {
                alias: format!("{}_{}", tokens.next_token(), tokens.next_token()),
                source: Source::Derived(query),
            }),
        }
    }

    /// Physical relation name; `None` for derived tables.
    pub fn name(&self) -> Option<&str> {
        match &self.inner.source {
            Source::Relation(name) => Some(name),
            Source::Derived(_) => None,
        }
    }

    pub fn alias(&self) -> &str {
        &self.inner.alias
    }

    /// Reference identity: true only for clones of the same handle.
    pub fn is(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Label used in error messages.
    pub(crate) fn label(&self) -> &str {
        self.name().unwrap_or(&self.inner.alias)
    }

    /// Renders the table as a FROM item. A derived table compiles its
    /// nested statement first; the nested bindings propagate unchanged,
    /// tags are already globally unique.
    pub(crate) fn render_from(&self) -> Result<(String, BindMap), Error> {
        match &self.inner.source {
            Source::Relation(name) => {
                Ok((format!("{} AS {}", name, self.inner.alias), BindMap::new()))
            }
            Source::Derived(query) => {
                let (sql, binds) = query.compile()?;
                Ok((format!("({}) AS {}", sql, self.inner.alias), binds))
            }
        }
    }
}
