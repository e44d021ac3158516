//! Convenience macros for predicate lists.

/// Builds a [`Where::And`](crate::expr::predicate::Where::And) over the
/// listed predicates.
#[macro_export]
macro_rules! and {
    ($($predicate:expr),* $(,)?) => {
        $crate::expr::predicate::Where::And(vec![$($predicate),*])
    };
}

/// Builds a [`Where::Or`](crate::expr::predicate::Where::Or) over the
/// listed predicates.
#[macro_export]
macro_rules! or {
    ($($predicate:expr),* $(,)?) => {
        $crate::expr::predicate::Where::Or(vec![$($predicate),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::expr::Generate;
    use crate::expr::predicate::Where;
    use crate::scope::Scope;
    use crate::table::Table;
    use crate::token::RandomTokens;

    #[test]
    fn test_and_or_macros() {
        let table = Table::new("table1");
        let from = [table.clone()];
        let mut scope = Scope::new(&from, &[], false, &RandomTokens);

        let predicate = and![
            Where::eq(&table, "a", 1),
            or![
                Where::is_null(&table, "b"),
                Where::eq(&table, "c", 2),
            ],
        ];

        let sql = predicate.generate(&mut scope).unwrap();
        assert!(sql.contains(" AND "));
        assert!(sql.contains(" OR "));

        let empty = and![];
        assert_eq!(empty.generate(&mut scope).unwrap(), "");
    }
}
