//! WHERE predicate descriptors.

use crate::error::Error;
use crate::expr::Generate;
use crate::scope::Scope;
use crate::stmt::select::Select;
use crate::table::Table;
use crate::value::Value;

/// One node of a predicate tree: a leaf referencing one or two
/// table/column pairs, or an AND/OR list over child nodes.
#[derive(Debug)]
pub enum Where {
    Eq {
        table: Table,
        column: String,
        value: Value,
    },
    NotEq {
        table: Table,
        column: String,
        value: Value,
    },
    Gt {
        table: Table,
        column: String,
        value: Value,
    },
    Lt {
        table: Table,
        column: String,
        value: Value,
    },
    GtEq {
        table: Table,
        column: String,
        value: Value,
    },
    LtEq {
        table: Table,
        column: String,
        value: Value,
    },
    ILike {
        table: Table,
        column: String,
        value: Value,
    },
    IsNull {
        table: Table,
        column: String,
    },
    IsNotNull {
        table: Table,
        column: String,
    },
    /// `alias.col = ANY(@tag)` with the whole collection bound once.
    Any {
        table: Table,
        column: String,
        values: Value,
    },
    /// `to_tsvector('<lang>', alias.col) @@ plainto_tsquery(@tag)`.
    FullText {
        table: Table,
        column: String,
        language: String,
        value: String,
    },
    /// JSONB key test, `alias.col ? @tag`.
    JsonbHas {
        table: Table,
        column: String,
        key: String,
    },
    /// JSONB any-key test, `alias.col ?| @tag`.
    JsonbHasAny {
        table: Table,
        column: String,
        keys: Vec<String>,
    },
    /// Column-to-column comparison; both tables must be in scope, no
    /// parameter is bound.
    GtColumn {
        left: Table,
        left_column: String,
        right: Table,
        right_column: String,
    },
    /// `EXISTS(<nested select>)`; the nested statement is compiled as a
    /// correlated sub-statement and its bindings merge into the outer
    /// map unchanged.
    Exists(Box<Select>),
    And(Vec<Where>),
    Or(Vec<Where>),
}

impl Where {
    pub fn eq(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::Eq {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn not_eq(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::NotEq {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn gt(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::Gt {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn lt(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::Lt {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn gt_eq(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::GtEq {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn lt_eq(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::LtEq {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn ilike(table: &Table, column: &str, value: impl Into<Value>) -> Self {
        Where::ILike {
            table: table.clone(),
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn is_null(table: &Table, column: &str) -> Self {
        Where::IsNull {
            table: table.clone(),
            column: column.to_string(),
        }
    }

    pub fn is_not_null(table: &Table, column: &str) -> Self {
        Where::IsNotNull {
            table: table.clone(),
            column: column.to_string(),
        }
    }

    pub fn any(table: &Table, column: &str, values: impl Into<Value>) -> Self {
        Where::Any {
            table: table.clone(),
            column: column.to_string(),
            values: values.into(),
        }
    }

    pub fn full_text(table: &Table, column: &str, language: &str, value: &str) -> Self {
        Where::FullText {
            table: table.clone(),
            column: column.to_string(),
            language: language.to_string(),
            value: value.to_string(),
        }
    }

    pub fn jsonb_has(table: &Table, column: &str, key: &str) -> Self {
        Where::JsonbHas {
            table: table.clone(),
            column: column.to_string(),
            key: key.to_string(),
        }
    }

    pub fn jsonb_has_any(table: &Table, column: &str, keys: Vec<String>) -> Self {
        Where::JsonbHasAny {
            table: table.clone(),
            column: column.to_string(),
            keys,
        }
    }

    pub fn gt_column(left: &Table, left_column: &str, right: &Table, right_column: &str) -> Self {
        Where::GtColumn {
            left: left.clone(),
            left_column: left_column.to_string(),
            right: right.clone(),
            right_column: right_column.to_string(),
        }
    }

    /// Wraps a select into an EXISTS test, marking it as a correlated
    /// sub-statement.
    pub fn exists(query: Select) -> Self {
        Where::Exists(Box::new(query.as_sub()))
    }
}

impl Generate for Where {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        match self {
            Where::Eq {
                table,
                column,
                value,
            } => compare(scope, table, column, "=", value),
            Where::NotEq {
                table,
                column,
                value,
            } => compare(scope, table, column, "<>", value),
            Where::Gt {
                table,
                column,
                value,
            } => compare(scope, table, column, ">", value),
            Where::Lt {
                table,
                column,
                value,
            } => compare(scope, table, column, "<", value),
            Where::GtEq {
                table,
                column,
                value,
            } => compare(scope, table, column, ">=", value),
            Where::LtEq {
                table,
                column,
                value,
            } => compare(scope, table, column, "<=", value),
            Where::ILike {
                table,
                column,
                value,
            } => compare(scope, table, column, "ILIKE", value),
            Where::IsNull { table, column } => {
                let target = qualify(scope, table, column)?;
                Ok(format!("{target} IS NULL"))
            }
            Where::IsNotNull { table, column } => {
                let target = qualify(scope, table, column)?;
                Ok(format!("{target} IS NOT NULL"))
            }
            Where::Any {
                table,
                column,
                values,
            } => {
                let target = qualify(scope, table, column)?;
                let tag = scope.bind(column, values.clone());
                Ok(format!("{target} = ANY(@{tag})"))
            }
            Where::FullText {
                table,
                column,
                language,
                value,
            } => {
                if language.is_empty() {
                    return Err(Error::MissingField("language"));
                }
                let target = qualify(scope, table, column)?;
                let tag = scope.bind(column, Value::String(value.clone()));
                Ok(format!(
                    "to_tsvector('{language}', {target}) @@ plainto_tsquery(@{tag})"
                ))
            }
            Where::JsonbHas { table, column, key } => {
                let target = qualify(scope, table, column)?;
                let tag = scope.bind(column, Value::String(key.clone()));
                Ok(format!("{target} ? @{tag}"))
            }
            Where::JsonbHasAny {
                table,
                column,
                keys,
            } => {
                let target = qualify(scope, table, column)?;
                let tag = scope.bind(column, Value::StringArray(keys.clone()));
                Ok(format!("{target} ?| @{tag}"))
            }
            Where::GtColumn {
                left,
                left_column,
                right,
                right_column,
            } => {
                let left = qualify(scope, left, left_column)?;
                let right = qualify(scope, right, right_column)?;
                Ok(format!("{left} > {right}"))
            }
            Where::Exists(query) => {
                let (sql, binds) = query.compile()?;
                scope.merge(binds);
                Ok(format!("EXISTS({sql})"))
            }
            Where::And(list) => combine(scope, list, " AND "),
            Where::Or(list) => combine(scope, list, " OR "),
        }
    }
}

fn qualify(scope: &mut Scope<'_>, table: &Table, column: &str) -> Result<String, Error> {
    if !scope.check_table(table) {
        return Err(Error::TableNotInScope(table.label().to_string()));
    }
    if column.is_empty() {
        return Err(Error::MissingField("column"));
    }
    Ok(format!("{}.{}", table.alias(), column))
}

fn compare(
    scope: &mut Scope<'_>,
    table: &Table,
    column: &str,
    op: &str,
    value: &Value,
) -> Result<String, Error> {
    let target = qualify(scope, table, column)?;
    let tag = scope.bind(column, value.clone());
    Ok(format!("{target} {op} @{tag}"))
}

/// An empty list is "no predicate", not an error. Empty child fragments
/// (nested empty combinators) are skipped so no stray connective is
/// emitted.
fn combine(scope: &mut Scope<'_>, list: &[Where], sep: &str) -> Result<String, Error> {
    if list.is_empty() {
        return Ok(String::new());
    }

    let mut parts = Vec::with_capacity(list.len());
    for item in list {
        let sql = item.generate(scope)?;
        if !sql.is_empty() {
            parts.push(sql);
        }
    }

    if parts.is_empty() {
        return Ok(String::new());
    }

    Ok(format!("({})", parts.join(sep)))
}
