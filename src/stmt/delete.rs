//! The DELETE statement compiler.

use tracing::debug;

use crate::error::Error;
use crate::expr::predicate::Where;
use crate::scope::{BindMap, Scope};
use crate::stmt::render_where;
use crate::table::Table;
use crate::token::{RandomTokens, TokenSource};

/// Compiler for one DELETE statement.
///
/// An unconditional delete is refused unless [`Delete::full`] was
/// called; the guard exists to stop accidental table wipes.
#[derive(Debug)]
pub struct Delete {
    table: Table,
    where_clause: Option<Where>,
    full: bool,
    tokens: Box<dyn TokenSource>,
}

impl Delete {
    pub fn new(table: &Table) -> Self {
        Self::with_tokens(table, RandomTokens)
    }

    pub fn with_tokens(table: &Table, tokens: impl TokenSource + 'static) -> Self {
        Self {
            table: table.clone(),
            where_clause: None,
            full: false,
            tokens: Box::new(tokens),
        }
    }

    pub fn where_clause(mut self, predicate: Where) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    /// Opts in to deleting without a WHERE clause.
    pub fn full(mut self) -> Self {
        self.full = true;
        self
    }

    pub fn compile(&self) -> Result<(String, BindMap), Error> {
        let name = self.table.name().ok_or(Error::MissingField("table name"))?;

        let mut scope = Scope::new(
            std::slice::from_ref(&self.table),
            &[],
            false,
            self.tokens.as_ref(),
        );

        let where_sql = render_where(&self.where_clause, &mut scope)?;
        if !self.full && where_sql.is_empty() {
            return Err(Error::DeleteWithoutWhere);
        }

        let sql = format!("DELETE FROM {} AS {}{}", name, self.table.alias(), where_sql);

        let binds = scope.into_binds();
        debug!("compiled DELETE with {} bind(s)", binds.len());
        Ok((sql, binds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_without_where_is_refused() {
        let table = Table::new("table1");
        let err = Delete::new(&table).compile().unwrap_err();
        assert_eq!(err, Error::DeleteWithoutWhere);
    }

    #[test]
    fn test_empty_combinator_counts_as_no_predicate() {
        let table = Table::new("table1");
        let err = Delete::new(&table)
            .where_clause(Where::And(vec![]))
            .compile()
            .unwrap_err();
        assert_eq!(err, Error::DeleteWithoutWhere);
    }

    #[test]
    fn test_full_override_omits_where_entirely() {
        let table = Table::new("table1");
        let (sql, binds) = Delete::new(&table).full().compile().unwrap();

        assert_eq!(sql, format!("DELETE FROM table1 AS {}", table.alias()));
        assert!(binds.is_empty());
    }

    #[test]
    fn test_delete_with_predicate() {
        let table = Table::new("table1");
        let (sql, binds) = Delete::new(&table)
            .where_clause(Where::eq(&table, "id", 4))
            .compile()
            .unwrap();

        let tag = binds.keys().next().unwrap();
        assert_eq!(
            sql,
            format!(
                "DELETE FROM table1 AS {alias} WHERE {alias}.id = @{tag}",
                alias = table.alias()
            )
        );
    }
}
