//! Per-compile scope: table membership, join-usage arena, bind
//! accumulation.

use std::collections::HashMap;

use crate::expr::join::Join;
use crate::table::Table;
use crate::token::TokenSource;
use crate::value::Value;

/// Mapping from bind-parameter tag to bound value. Tags appear in the
/// statement text as `@tag`.
pub type BindMap = HashMap<String, Value>;

/// Mutable accumulator threaded through every generator call of one
/// compile. Owns the running bind map and the join-usage flags.
///
/// Marking a join used is a side effect of [`Scope::check_table`], not
/// of join registration: the first membership test that resolves
/// against a wrapper's target flips it, one-way, whatever clause asked.
pub struct Scope<'a> {
    tables: &'a [Table],
    joins: &'a [Join],
    used: Vec<bool>,
    sub: bool,
    binds: BindMap,
    tokens: &'a dyn TokenSource,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        tables: &'a [Table],
        joins: &'a [Join],
        sub: bool,
        tokens: &'a dyn TokenSource,
    ) -> Self {
        Self {
            tables,
            joins,
            used: vec![false; joins.len()],
            sub,
            binds: BindMap::new(),
            tokens,
        }
    }

    /// Membership test for the enclosing statement. A correlated
    /// sub-statement accepts every table, trusting the outer scope,
    /// but a table matching one of its own joins still marks that
    /// join used so it gets emitted.
    pub fn check_table(&mut self, table: &Table) -> bool {
        if self.tables.iter().any(|t| t.is(table)) {
            return true;
        }

        for (i, join) in self.joins.iter().enumerate() {
            if join.table().is(table) {
                self.used[i] = true;
                return true;
            }
        }

        self.sub
    }

    /// Allocates a fresh tag from the hint and registers the binding.
    /// The tag is the hint plus a random suffix, unique for practical
    /// purposes across nested statements merged into one.
    pub fn bind(&mut self, hint: &str, value: Value) -> String {
        let tag = format!("{}_{}", hint, self.tokens.next_token());
        self.binds.insert(tag.clone(), value);
        tag
    }

    /// Registers a binding under an already-allocated tag.
    pub fn add_bind(&mut self, tag: &str, value: Value) {
        self.binds.insert(tag.to_string(), value);
    }

    /// Folds a nested statement's bindings in, inner before outer.
    pub fn merge(&mut self, binds: BindMap) {
        self.binds.extend(binds);
    }

    pub(crate) fn join_used(&self, index: usize) -> bool {
        self.used[index]
    }

    pub(crate) fn into_binds(self) -> BindMap {
        self.binds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::join::On;
    use crate::token::RandomTokens;

    #[test]
    fn test_check_table_membership() {
        let table1 = Table::new("table1");
        let table2 = Table::new("table2");
        let from = [table1.clone()];

        let mut scope = Scope::new(&from, &[], false, &RandomTokens);
        assert!(scope.check_table(&table1));
        assert!(!scope.check_table(&table2));
    }

    #[test]
    fn test_check_table_marks_join_used() {
        let table1 = Table::new("table1");
        let table2 = Table::new("table2");
        let from = [table1.clone()];
        let joins = [Join::new(
            table2.clone(),
            On::eq(&table1, "id", &table2, "table_id"),
            true,
        )];

        let mut scope = Scope::new(&from, &joins, false, &RandomTokens);
        assert!(!scope.join_used(0));

        assert!(scope.check_table(&table2));
        assert!(scope.join_used(0));

        // One-way: further checks keep it used.
        assert!(scope.check_table(&table2));
        assert!(scope.join_used(0));
    }

    #[test]
    fn test_sub_scope_accepts_everything() {
        let table = Table::new("outer_table");
        let mut scope = Scope::new(&[], &[], true, &RandomTokens);
        assert!(scope.check_table(&table));
    }

    #[test]
    fn test_sub_scope_still_marks_own_joins_used() {
        let table1 = Table::new("table1");
        let table2 = Table::new("table2");
        let from = [table1.clone()];
        let joins = [Join::new(
            table2.clone(),
            On::eq(&table1, "id", &table2, "table_id"),
            true,
        )];

        let mut scope = Scope::new(&from, &joins, true, &RandomTokens);
        assert!(scope.check_table(&table2));
        assert!(scope.join_used(0));
    }

    #[test]
    fn test_bind_tags_carry_the_hint() {
        let mut scope = Scope::new(&[], &[], false, &RandomTokens);

        let tag1 = scope.bind("id", Value::Int(1));
        let tag2 = scope.bind("id", Value::Int(2));

        assert!(tag1.starts_with("id_"));
        assert_ne!(tag1, tag2);

        let binds = scope.into_binds();
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[&tag1], Value::Int(1));
        assert_eq!(binds[&tag2], Value::Int(2));
    }

    #[test]
    fn test_merge_keeps_inner_tags_unchanged() {
        let mut scope = Scope::new(&[], &[], false, &RandomTokens);
        scope.add_bind("outer_tag", Value::Int(1));

        let mut inner = BindMap::new();
        inner.insert("inner_tag".to_string(), Value::Int(2));
        scope.merge(inner);

        let binds = scope.into_binds();
        assert_eq!(binds.len(), 2);
        assert_eq!(binds["inner_tag"], Value::Int(2));
    }
}
