//! The SELECT statement compiler.

use tracing::debug;

use crate::error::Error;
use crate::expr::Generate;
use crate::expr::column::Column;
use crate::expr::join::{Join, On};
use crate::expr::order::{Group, Order};
use crate::expr::predicate::Where;
use crate::scope::{BindMap, Scope};
use crate::stmt::render_where;
use crate::table::Table;
use crate::token::{RandomTokens, TokenSource};
use crate::value::Value;

/// Compiler for one SELECT statement.
///
/// Configured through chained calls, finalized by [`Select::compile`].
/// Clause order in the output is fixed by the dialect and independent
/// of configuration order; only join declaration order is preserved.
#[derive(Debug)]
pub struct Select {
    from: Vec<Table>,
    columns: Vec<Column>,
    joins: Vec<Join>,
    where_clause: Option<Where>,
    group_by: Vec<Group>,
    order_by: Vec<Order>,
    limit: Option<(String, Value)>,
    offset: Option<(String, Value)>,
    sub: bool,
    tokens: Box<dyn TokenSource>,
}

impl Select {
    pub fn new() -> Self {
        Self::with_tokens(RandomTokens)
    }

    pub fn with_tokens(tokens: impl TokenSource + 'static) -> Self {
        Self {
            from: Vec::new(),
            columns: Vec::new(),
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            sub: false,
            tokens: Box::new(tokens),
        }
    }

    pub fn from(mut self, table: &Table) -> Self {
        self.from.push(table.clone());
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Declares a LEFT JOIN. It is emitted only if some other clause
    /// references the target table during compilation.
    pub fn left_join(mut self, table: &Table, on: On) -> Self {
        self.joins.push(Join::new(table.clone(), on, true));
        self
    }

    /// Declares an inner JOIN, same deferred-emission rules.
    pub fn join(mut self, table: &Table, on: On) -> Self {
        self.joins.push(Join::new(table.clone(), on, false));
        self
    }

    pub fn where_clause(mut self, predicate: Where) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    pub fn group_by(mut self, group: Group) -> Self {
        self.group_by.push(group);
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order_by.push(order);
        self
    }

    /// No-op for non-positive input; otherwise allocates one bind
    /// parameter per call.
    pub fn limit(mut self, limit: i64) -> Self {
        if limit <= 0 {
            return self;
        }
        let tag = format!("limit_{}", self.tokens.next_token());
        self.limit = Some((tag, Value::Int(limit)));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        if offset <= 0 {
            return self;
        }
        let tag = format!("offset_{}", self.tokens.next_token());
        self.offset = Some((tag, Value::Int(offset)));
        self
    }

    /// Marks this statement as a correlated sub-statement: every scope
    /// check passes (the outer scope is trusted) and the projection
    /// renders as the literal `1`.
    pub fn as_sub(mut self) -> Self {
        self.sub = true;
        self
    }

    /// Walks all descriptors and assembles the final statement text
    /// plus its bind map. The compile is a pure function of the
    /// descriptors; repeated calls regenerate fresh tags.
    pub fn compile(&self) -> Result<(String, BindMap), Error> {
        let mut scope = Scope::new(&self.from, &self.joins, self.sub, self.tokens.as_ref());

        let select = self.render_select(&mut scope)?;
        let from = self.render_from(&mut scope)?;
        let where_sql = render_where(&self.where_clause, &mut scope)?;
        let group = self.render_group(&mut scope)?;
        let order = self.render_order(&mut scope)?;
        // Joins render last: usage is only known once every other
        // clause has run its scope checks.
        let joins = self.render_joins(&mut scope)?;

        let mut sql = select;
        sql.push_str(&from);
        sql.push_str(&joins);
        sql.push_str(&where_sql);
        sql.push_str(&group);
        sql.push_str(&order);

        if let Some((tag, value)) = &self.limit {
            sql.push_str(" LIMIT @");
            sql.push_str(tag);
            scope.add_bind(tag, value.clone());
        }
        if let Some((tag, value)) = &self.offset {
            sql.push_str(" OFFSET @");
            sql.push_str(tag);
            scope.add_bind(tag, value.clone());
        }

        let binds = scope.into_binds();
        debug!("compiled SELECT with {} bind(s)", binds.len());
        Ok((sql, binds))
    }

    fn render_select(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        if self.sub {
            return Ok("SELECT 1".to_string());
        }
        if self.columns.is_empty() {
            return Err(Error::NoColumns);
        }
        let mut parts = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            parts.push(column.generate(scope)?);
        }
        Ok(format!("SELECT {}", parts.join(", ")))
    }

    fn render_from(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        if self.from.is_empty() {
            return Err(Error::NoFromTables);
        }
        let mut parts = Vec::with_capacity(self.from.len());
        for table in &self.from {
            let (sql, binds) = table.render_from()?;
            scope.merge(binds);
            parts.push(sql);
        }
        Ok(format!(" FROM {}", parts.join(", ")))
    }

    fn render_group(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        if self.group_by.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(self.group_by.len());
        for group in &self.group_by {
            parts.push(group.generate(scope)?);
        }
        Ok(format!(" GROUP BY {}", parts.join(", ")))
    }

    fn render_order(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        if self.order_by.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(self.order_by.len());
        for order in &self.order_by {
            parts.push(order.generate(scope)?);
        }
        Ok(format!(" ORDER BY {}", parts.join(", ")))
    }

    /// Single pass in declaration order: a join marked used only by a
    /// later join's ON condition stays omitted.
    fn render_joins(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        let mut sql = String::new();
        for (i, join) in self.joins.iter().enumerate() {
            if !scope.join_used(i) {
                continue;
            }
            sql.push_str(&join.generate(scope)?);
        }
        Ok(sql)
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}
