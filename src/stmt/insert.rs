//! The INSERT statement compiler.

use tracing::debug;

use crate::error::Error;
use crate::expr::Generate;
use crate::expr::column::Column;
use crate::scope::{BindMap, Scope};
use crate::stmt::{SetClause, render_assignments};
use crate::table::Table;
use crate::token::{RandomTokens, TokenSource};
use crate::value::Value;

/// Compiler for one INSERT statement. Value-assignment order is
/// preserved in the output.
#[derive(Debug)]
pub struct Insert {
    table: Table,
    values: Vec<(String, Value)>,
    returning: Vec<Column>,
    conflict_target: Vec<String>,
    conflict_updates: Vec<SetClause>,
    tokens: Box<dyn TokenSource>,
}

impl Insert {
    pub fn new(table: &Table) -> Self {
        Self::with_tokens(table, RandomTokens)
    }

    pub fn with_tokens(table: &Table, tokens: impl TokenSource + 'static) -> Self {
        Self {
            table: table.clone(),
            values: Vec::new(),
            returning: Vec::new(),
            conflict_target: Vec::new(),
            conflict_updates: Vec::new(),
            tokens: Box::new(tokens),
        }
    }

    /// Adds one column/value assignment; allocates its bind tag at
    /// compile time, keyed by the column name.
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.push((column.to_string(), value.into()));
        self
    }

    /// Adds a RETURNING projection, reusing the column generator
    /// contract; the scope is the target table.
    pub fn returning(mut self, column: Column) -> Self {
        self.returning.push(column);
        self
    }

    /// Adds a column to the conflict target list. ON CONFLICT text is
    /// emitted only when update assignments are also present.
    pub fn on_conflict(mut self, column: &str) -> Self {
        self.conflict_target.push(column.to_string());
        self
    }

    /// Adds a DO UPDATE assignment binding a literal value.
    pub fn update_set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conflict_updates
            .push(SetClause::value(column, value.into()));
        self
    }

    /// Adds a DO UPDATE assignment emitting `NOW()` with no binding.
    pub fn update_set_now(mut self, column: &str) -> Self {
        self.conflict_updates.push(SetClause::now(column));
        self
    }

    pub fn compile(&self) -> Result<(String, BindMap), Error> {
        let name = self.table.name().ok_or(Error::MissingField("table name"))?;
        if self.values.is_empty() {
            return Err(Error::NoValues);
        }

        let mut scope = Scope::new(
            std::slice::from_ref(&self.table),
            &[],
            false,
            self.tokens.as_ref(),
        );

        let mut columns = Vec::with_capacity(self.values.len());
        let mut tags = Vec::with_capacity(self.values.len());
        for (column, value) in &self.values {
            if column.is_empty() {
                return Err(Error::MissingField("column"));
            }
            let tag = scope.bind(column, value.clone());
            columns.push(column.clone());
            tags.push(format!("@{tag}"));
        }

        let mut sql = format!(
            "INSERT INTO {} AS {} ({}) VALUES ({})",
            name,
            self.table.alias(),
            columns.join(", "),
            tags.join(", ")
        );

        // Both halves are required for any ON CONFLICT text at all.
        if !self.conflict_target.is_empty() && !self.conflict_updates.is_empty() {
            sql.push_str(&format!(
                " ON CONFLICT ({}) DO UPDATE SET {}",
                self.conflict_target.join(", "),
                render_assignments(&self.conflict_updates, &mut scope)?
            ));
        }

        if !self.returning.is_empty() {
            let mut parts = Vec::with_capacity(self.returning.len());
            for column in &self.returning {
                parts.push(column.generate(&mut scope)?);
            }
            sql.push_str(" RETURNING ");
            sql.push_str(&parts.join(", "));
        }

        let binds = scope.into_binds();
        debug!("compiled INSERT with {} bind(s)", binds.len());
        Ok((sql, binds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_values_fails() {
        let table = Table::new("table1");
        let err = Insert::new(&table).compile().unwrap_err();
        assert_eq!(err, Error::NoValues);
    }

    #[test]
    fn test_basic_insert() {
        let table = Table::new("table1");
        let (sql, binds) = Insert::new(&table)
            .value("a", 5)
            .value("b", "x")
            .compile()
            .unwrap();

        assert_eq!(binds.len(), 2);
        let tag_a = binds
            .iter()
            .find(|(_, v)| **v == Value::Int(5))
            .map(|(k, _)| k.clone())
            .unwrap();
        let tag_b = binds
            .iter()
            .find(|(_, v)| **v == Value::String("x".to_string()))
            .map(|(k, _)| k.clone())
            .unwrap();

        assert_eq!(
            sql,
            format!(
                "INSERT INTO table1 AS {} (a, b) VALUES (@{}, @{})",
                table.alias(),
                tag_a,
                tag_b
            )
        );
    }

    #[test]
    fn test_on_conflict_do_update() {
        let table = Table::new("t");
        let (sql, binds) = Insert::new(&table)
            .value("a", 5)
            .on_conflict("a")
            .update_set_now("b")
            .compile()
            .unwrap();

        assert!(sql.contains(" ON CONFLICT (a) DO UPDATE SET b = NOW()"));
        // one binding for a's value, none for b
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn test_on_conflict_requires_both_halves() {
        let table = Table::new("t");

        let (sql, _) = Insert::new(&table)
            .value("a", 5)
            .on_conflict("a")
            .compile()
            .unwrap();
        assert!(!sql.contains("ON CONFLICT"));

        let (sql, _) = Insert::new(&table)
            .value("a", 5)
            .update_set_now("b")
            .compile()
            .unwrap();
        assert!(!sql.contains("ON CONFLICT"));
    }

    #[test]
    fn test_conflict_update_binds_literals() {
        let table = Table::new("t");
        let (sql, binds) = Insert::new(&table)
            .value("a", 5)
            .on_conflict("a")
            .update_set("b", 7)
            .update_set_now("c")
            .compile()
            .unwrap();

        assert!(sql.contains("DO UPDATE SET b = @"));
        assert!(sql.ends_with("c = NOW()"));
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn test_returning_columns() {
        let table = Table::new("table1");
        let (sql, _) = Insert::new(&table)
            .value("a", 5)
            .returning(Column::name(&table, "id"))
            .returning(Column::name_as(&table, "a", "inserted_a"))
            .compile()
            .unwrap();

        assert!(sql.ends_with(&format!(
            " RETURNING {alias}.id, {alias}.a AS inserted_a",
            alias = table.alias()
        )));
    }

    #[test]
    fn test_returning_rejects_foreign_table() {
        let table = Table::new("table1");
        let other = Table::new("table2");
        let err = Insert::new(&table)
            .value("a", 5)
            .returning(Column::name(&other, "id"))
            .compile()
            .unwrap_err();
        assert_eq!(err, Error::TableNotInScope("table2".to_string()));
    }
}
