//! Projected-column descriptors, shared by SELECT projections and
//! INSERT RETURNING lists.

use crate::error::Error;
use crate::expr::Generate;
use crate::scope::Scope;
use crate::table::Table;
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum Column {
    /// Plain `alias.col`, optionally aliased.
    Name {
        table: Table,
        name: String,
        alias: Option<String>,
        distinct: bool,
    },
    /// `COUNT(*)` or `COUNT(alias.col)`. The alias is mandatory; the
    /// table and column are optional and fall back to `*`.
    Count {
        table: Option<Table>,
        column: Option<String>,
        alias: String,
        distinct: bool,
    },
    /// `COALESCE(alias.col, default)`. Alias and default are mandatory;
    /// the default renders inline, quoted when it is a string.
    Coalesce {
        table: Table,
        name: String,
        alias: String,
        default: Value,
    },
    /// `JSONB_ARRAY_ELEMENTS_TEXT(alias.col)`. Alias is mandatory.
    JsonbArrayElementsText {
        table: Table,
        name: String,
        alias: String,
        distinct: bool,
    },
    /// Inline literal projection, e.g. `SELECT 'x' AS kind`.
    Literal {
        value: Value,
        alias: Option<String>,
    },
}

impl Column {
    pub fn name(table: &Table, name: &str) -> Self {
        Column::Name {
            table: table.clone(),
            name: name.to_string(),
            alias: None,
            distinct: false,
        }
    }

    pub fn name_as(table: &Table, name: &str, alias: &str) -> Self {
        Column::Name {
            table: table.clone(),
            name: name.to_string(),
            alias: Some(alias.to_string()),
            distinct: false,
        }
    }

    /// `COUNT(*) AS alias`.
    pub fn count(alias: &str) -> Self {
        Column::Count {
            table: None,
            column: None,
            alias: alias.to_string(),
            distinct: false,
        }
    }

    /// `COUNT(alias.col) AS alias`.
    pub fn count_column(table: &Table, column: &str, alias: &str) -> Self {
        Column::Count {
            table: Some(table.clone()),
            column: Some(column.to_string()),
            alias: alias.to_string(),
            distinct: false,
        }
    }

    pub fn coalesce(table: &Table, name: &str, alias: &str, default: impl Into<Value>) -> Self {
        Column::Coalesce {
            table: table.clone(),
            name: name.to_string(),
            alias: alias.to_string(),
            default: default.into(),
        }
    }

    pub fn jsonb_array_elements_text(table: &Table, name: &str, alias: &str) -> Self {
        Column::JsonbArrayElementsText {
            table: table.clone(),
            name: name.to_string(),
            alias: alias.to_string(),
            distinct: false,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Column::Literal {
            value: value.into(),
            alias: None,
        }
    }

    pub fn literal_as(value: impl Into<Value>, alias: &str) -> Self {
        Column::Literal {
            value: value.into(),
            alias: Some(alias.to_string()),
        }
    }

    /// Flags the column DISTINCT where the variant supports it.
    pub fn distinct(mut self) -> Self {
        match &mut self {
            Column::Name { distinct, .. }
            | Column::Count { distinct, .. }
            | Column::JsonbArrayElementsText { distinct, .. } => *distinct = true,
            Column::Coalesce { .. } | Column::Literal { .. } => {}
        }
        self
    }
}

impl Generate for Column {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        match self {
            Column::Name {
                table,
                name,
                alias,
                distinct,
            } => {
                let target = qualify(scope, table, name)?;
                let mut sql = String::new();
                if *distinct {
                    sql.push_str("DISTINCT ");
                }
                sql.push_str(&target);
                if let Some(alias) = alias.as_deref().filter(|a| !a.is_empty()) {
                    sql.push_str(" AS ");
                    sql.push_str(alias);
                }
                Ok(sql)
            }
            Column::Count {
                table,
                column,
                alias,
                distinct,
            } => {
                if alias.is_empty() {
                    return Err(Error::MissingField("alias"));
                }
                let target = match (table, column) {
                    (Some(table), Some(column)) if !column.is_empty() => {
                        let target = qualify(scope, table, column)?;
                        if *distinct {
                            format!("DISTINCT {target}")
                        } else {
                            target
                        }
                    }
                    _ => "*".to_string(),
                };
                Ok(format!("COUNT({target}) AS {alias}"))
            }
            Column::Coalesce {
                table,
                name,
                alias,
                default,
            } => {
                if alias.is_empty() {
                    return Err(Error::MissingField("alias"));
                }
                if matches!(default, Value::Null) {
                    return Err(Error::MissingField("default"));
                }
                let target = qualify(scope, table, name)?;
                Ok(format!(
                    "COALESCE({target}, {}) AS {alias}",
                    default.literal()
                ))
            }
            Column::JsonbArrayElementsText {
                table,
                name,
                alias,
                distinct,
            } => {
                if alias.is_empty() {
                    return Err(Error::MissingField("alias"));
                }
                let target = qualify(scope, table, name)?;
                let prefix = if *distinct { "DISTINCT " } else { "" };
                Ok(format!(
                    "{prefix}JSONB_ARRAY_ELEMENTS_TEXT({target}) AS {alias}"
                ))
            }
            Column::Literal { value, alias } => {
                if matches!(value, Value::Null) {
                    return Err(Error::MissingField("value"));
                }
                let mut sql = value.literal();
                if let Some(alias) = alias.as_deref().filter(|a| !a.is_empty()) {
                    sql.push_str(" AS ");
                    sql.push_str(alias);
                }
                Ok(sql)
            }
        }
    }
}

fn qualify(scope: &mut Scope<'_>, table: &Table, column: &str) -> Result<String, Error> {
    if !scope.check_table(table) {
        return Err(Error::TableNotInScope(table.label().to_string()));
    }
    if column.is_empty() {
        return Err(Error::MissingField("name"));
    }
    Ok(format!("{}.{}", table.alias(), column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RandomTokens;

    fn scope_over(tables: &[Table]) -> Scope<'_> {
        Scope::new(tables, &[], false, &RandomTokens)
    }

    #[test]
    fn test_plain_and_aliased_names() {
        let table = Table::new("table1");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let sql = Column::name(&table, "col1").generate(&mut scope).unwrap();
        assert_eq!(sql, format!("{}.col1", table.alias()));

        let sql = Column::name_as(&table, "col1", "c")
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("{}.col1 AS c", table.alias()));

        let sql = Column::name(&table, "col1")
            .distinct()
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("DISTINCT {}.col1", table.alias()));
    }

    #[test]
    fn test_empty_alias_counts_as_none() {
        let table = Table::new("table1");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let sql = Column::name_as(&table, "col1", "")
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("{}.col1", table.alias()));

        let sql = Column::literal_as(1, "").generate(&mut scope).unwrap();
        assert_eq!(sql, "1");
    }

    #[test]
    fn test_name_requires_scope_and_column() {
        let table = Table::new("table1");
        let other = Table::new("table2");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let err = Column::name(&other, "col").generate(&mut scope).unwrap_err();
        assert_eq!(err, Error::TableNotInScope("table2".to_string()));

        let err = Column::name(&table, "").generate(&mut scope).unwrap_err();
        assert_eq!(err, Error::MissingField("name"));
    }

    #[test]
    fn test_count_variants() {
        let table = Table::new("table1");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let sql = Column::count("total").generate(&mut scope).unwrap();
        assert_eq!(sql, "COUNT(*) AS total");

        let sql = Column::count_column(&table, "id", "total")
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("COUNT({}.id) AS total", table.alias()));

        let sql = Column::count_column(&table, "id", "total")
            .distinct()
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("COUNT(DISTINCT {}.id) AS total", table.alias()));

        let err = Column::count("").generate(&mut scope).unwrap_err();
        assert_eq!(err, Error::MissingField("alias"));
    }

    #[test]
    fn test_coalesce() {
        let table = Table::new("table1");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let sql = Column::coalesce(&table, "col2", "a1", 10)
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, format!("COALESCE({}.col2, 10) AS a1", table.alias()));

        let sql = Column::coalesce(&table, "col2", "a1", "none")
            .generate(&mut scope)
            .unwrap();
        assert_eq!(
            sql,
            format!("COALESCE({}.col2, 'none') AS a1", table.alias())
        );

        let err = Column::coalesce(&table, "col2", "a1", Value::Null)
            .generate(&mut scope)
            .unwrap_err();
        assert_eq!(err, Error::MissingField("default"));
    }

    #[test]
    fn test_jsonb_array_elements_text() {
        let table = Table::new("docs");
        let from = [table.clone()];
        let mut scope = scope_over(&from);

        let sql = Column::jsonb_array_elements_text(&table, "tags", "tag")
            .distinct()
            .generate(&mut scope)
            .unwrap();
        assert_eq!(
            sql,
            format!(
                "DISTINCT JSONB_ARRAY_ELEMENTS_TEXT({}.tags) AS tag",
                table.alias()
            )
        );
    }

    #[test]
    fn test_literal_projection() {
        let mut scope = scope_over(&[]);

        let sql = Column::literal_as("fixed", "kind")
            .generate(&mut scope)
            .unwrap();
        assert_eq!(sql, "'fixed' AS kind");

        let sql = Column::literal(1).generate(&mut scope).unwrap();
        assert_eq!(sql, "1");

        let err = Column::literal(Value::Null).generate(&mut scope).unwrap_err();
        assert_eq!(err, Error::MissingField("value"));
    }
}
