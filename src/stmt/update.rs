//! The UPDATE statement compiler.

use tracing::debug;

use crate::error::Error;
use crate::expr::predicate::Where;
use crate::scope::{BindMap, Scope};
use crate::stmt::{SetClause, render_assignments, render_where};
use crate::table::Table;
use crate::token::{RandomTokens, TokenSource};
use crate::value::Value;

/// Compiler for one UPDATE statement. SET assignment order is
/// preserved in the output.
#[derive(Debug)]
pub struct Update {
    table: Table,
    sets: Vec<SetClause>,
    where_clause: Option<Where>,
    tokens: Box<dyn TokenSource>,
}

impl Update {
    pub fn new(table: &Table) -> Self {
        Self::with_tokens(table, RandomTokens)
    }

    pub fn with_tokens(table: &Table, tokens: impl TokenSource + 'static) -> Self {
        Self {
            table: table.clone(),
            sets: Vec::new(),
            where_clause: None,
            tokens: Box::new(tokens),
        }
    }

    /// Adds a SET assignment binding a literal value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.sets.push(SetClause::value(column, value.into()));
        self
    }

    /// Adds a SET assignment emitting `NOW()` with no binding.
    pub fn set_now(mut self, column: &str) -> Self {
        self.sets.push(SetClause::now(column));
        self
    }

    pub fn where_clause(mut self, predicate: Where) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    pub fn compile(&self) -> Result<(String, BindMap), Error> {
        let name = self.table.name().ok_or(Error::MissingField("table name"))?;
        if self.sets.is_empty() {
            return Err(Error::NoSets);
        }

        let mut scope = Scope::new(
            std::slice::from_ref(&self.table),
            &[],
            false,
            self.tokens.as_ref(),
        );

        let sets = render_assignments(&self.sets, &mut scope)?;
        let where_sql = render_where(&self.where_clause, &mut scope)?;

        let sql = format!(
            "UPDATE {} AS {} SET {}{}",
            name,
            self.table.alias(),
            sets,
            where_sql
        );

        let binds = scope.into_binds();
        debug!("compiled UPDATE with {} bind(s)", binds.len());
        Ok((sql, binds))
    }
}
