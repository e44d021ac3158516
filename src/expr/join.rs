//! Join wrappers and ON-condition descriptors.

use crate::error::Error;
use crate::expr::Generate;
use crate::scope::Scope;
use crate::table::Table;

/// A join condition over two table/column pairs. No parameters are
/// bound; both tables must be in scope.
#[derive(Debug, Clone)]
pub enum On {
    Eq {
        left: Table,
        left_column: String,
        right: Table,
        right_column: String,
    },
    Lt {
        left: Table,
        left_column: String,
        right: Table,
        right_column: String,
    },
    Gt {
        left: Table,
        left_column: String,
        right: Table,
        right_column: String,
    },
    And(Vec<On>),
}

impl On {
    pub fn eq(left: &Table, left_column: &str, right: &Table, right_column: &str) -> Self {
        On::Eq {
            left: left.clone(),
            left_column: left_column.to_string(),
            right: right.clone(),
            right_column: right_column.to_string(),
        }
    }

    pub fn lt(left: &Table, left_column: &str, right: &Table, right_column: &str) -> Self {
        On::Lt {
            left: left.clone(),
            left_column: left_column.to_string(),
            right: right.clone(),
            right_column: right_column.to_string(),
        }
    }

    pub fn gt(left: &Table, left_column: &str, right: &Table, right_column: &str) -> Self {
        On::Gt {
            left: left.clone(),
            left_column: left_column.to_string(),
            right: right.clone(),
            right_column: right_column.to_string(),
        }
    }
}

impl Generate for On {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        match self {
            On::Eq {
                left,
                left_column,
                right,
                right_column,
            } => pair(scope, left, left_column, "=", right, right_column),
            On::Lt {
                left,
                left_column,
                right,
                right_column,
            } => pair(scope, left, left_column, "<", right, right_column),
            On::Gt {
                left,
                left_column,
                right,
                right_column,
            } => pair(scope, left, left_column, ">", right, right_column),
            On::And(list) => {
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
                Ok(format!("({})", parts.join(" AND ")))
            }
        }
    }
}

fn pair(
    scope: &mut Scope<'_>,
    left: &Table,
    left_column: &str,
    op: &str,
    right: &Table,
    right_column: &str,
) -> Result<String, Error> {
    for table in [left, right] {
        if !scope.check_table(table) {
            return Err(Error::TableNotInScope(table.label().to_string()));
        }
    }
    if left_column.is_empty() || right_column.is_empty() {
        return Err(Error::MissingField("column"));
    }
    Ok(format!(
        "{}.{} {} {}.{}",
        left.alias(),
        left_column,
        op,
        right.alias(),
        right_column
    ))
}

/// Pairs a join target with its condition and inclusion kind.
///
/// Inclusion is deferred: the wrapper renders only if some clause's
/// scope check resolved against its target during this compile.
#[derive(Debug)]
pub struct Join {
    table: Table,
    on: On,
    left: bool,
}

impl Join {
    pub(crate) fn new(table: Table, on: On, left: bool) -> Self {
        Self { table, on, left }
    }

    pub(crate) fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        let on = self.on.generate(scope)?;
        let keyword = if self.left { " LEFT JOIN " } else { " JOIN " };
        let (target, binds) = self.table.render_from()?;
        scope.merge(binds);
        Ok(format!("{keyword}{target} ON {on}"))
    }
}
