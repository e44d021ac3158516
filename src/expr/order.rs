//! ORDER BY and GROUP BY term descriptors.

use crate::error::Error;
use crate::expr::Generate;
use crate::scope::Scope;
use crate::table::Table;

/// One ORDER BY term. Without a table the column renders unqualified.
#[derive(Debug, Clone)]
pub struct Order {
    pub table: Option<Table>,
    pub column: String,
    pub desc: bool,
}

impl Order {
    pub fn asc(table: &Table, column: &str) -> Self {
        Self {
            table: Some(table.clone()),
            column: column.to_string(),
            desc: false,
        }
    }

    pub fn desc(table: &Table, column: &str) -> Self {
        Self {
            table: Some(table.clone()),
            column: column.to_string(),
            desc: true,
        }
    }

    /// Unqualified term, e.g. for an aliased projection.
    pub fn bare(column: &str) -> Self {
        Self {
            table: None,
            column: column.to_string(),
            desc: false,
        }
    }
}

impl Generate for Order {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        let mut sql = qualified(scope, &self.table, &self.column)?;
        if self.desc {
            sql.push_str(" DESC");
        }
        Ok(sql)
    }
}

/// One GROUP BY term, same table rules as [`Order`].
#[derive(Debug, Clone)]
pub struct Group {
    pub table: Option<Table>,
    pub column: String,
}

impl Group {
    pub fn column(table: &Table, column: &str) -> Self {
        Self {
            table: Some(table.clone()),
            column: column.to_string(),
        }
    }

    pub fn bare(column: &str) -> Self {
        Self {
            table: None,
            column: column.to_string(),
        }
    }
}

impl Generate for Group {
    fn generate(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        qualified(scope, &self.table, &self.column)
    }
}

fn qualified(
    scope: &mut Scope<'_>,
    table: &Option<Table>,
    column: &str,
) -> Result<String, Error> {
    if column.is_empty() {
        return Err(Error::MissingField("column"));
    }
    match table {
        Some(table) => {
            if !scope.check_table(table) {
                return Err(Error::TableNotInScope(table.label().to_string()));
            }
            Ok(format!("{}.{}", table.alias(), column))
        }
        None => Ok(column.to_string()),
    }
}
