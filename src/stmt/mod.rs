//! Statement compilers, one per statement kind.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::error::Error;
use crate::expr::Generate;
use crate::expr::predicate::Where;
use crate::scope::Scope;
use crate::value::Value;

/// Renders an optional root predicate, treating an empty fragment
/// (absent predicate or empty combinator) as "no WHERE clause".
pub(crate) fn render_where(
    predicate: &Option<Where>,
    scope: &mut Scope<'_>,
) -> Result<String, Error> {
    match predicate {
        Some(predicate) => {
            let sql = predicate.generate(scope)?;
            if sql.is_empty() {
                Ok(String::new())
            } else {
                Ok(format!(" WHERE {sql}"))
            }
        }
        None => Ok(String::new()),
    }
}

/// One SET assignment: bind a literal value, or emit the `NOW()`
/// keyword with nothing bound. Used by UPDATE and by INSERT's
/// ON CONFLICT DO UPDATE list.
#[derive(Debug, Clone)]
pub(crate) struct SetClause {
    column: String,
    value: Option<Value>,
}

impl SetClause {
    pub(crate) fn value(column: &str, value: Value) -> Self {
        Self {
            column: column.to_string(),
            value: Some(value),
        }
    }

    pub(crate) fn now(column: &str) -> Self {
        Self {
            column: column.to_string(),
            value: None,
        }
    }

    fn render(&self, scope: &mut Scope<'_>) -> Result<String, Error> {
        if self.column.is_empty() {
            return Err(Error::MissingField("column"));
        }
        match &self.value {
            Some(value) => {
                let tag = scope.bind(&self.column, value.clone());
                Ok(format!("{} = @{}", self.column, tag))
            }
            None => Ok(format!("{} = NOW()", self.column)),
        }
    }
}

pub(crate) fn render_assignments(
    sets: &[SetClause],
    scope: &mut Scope<'_>,
) -> Result<String, Error> {
    let mut parts = Vec::with_capacity(sets.len());
    for set in sets {
        parts.push(set.render(scope)?);
    }
    Ok(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RandomTokens;

    #[test]
    fn test_value_assignment_binds_one_tag() {
        let mut scope = Scope::new(&[], &[], false, &RandomTokens);

        let sql = SetClause::value("name", Value::from("x"))
            .render(&mut scope)
            .unwrap();
        let binds = scope.into_binds();
        let tag = binds.keys().next().unwrap();

        assert_eq!(sql, format!("name = @{tag}"));
        assert_eq!(binds[tag], Value::String("x".to_string()));
    }

    #[test]
    fn test_now_assignment_binds_nothing() {
        let mut scope = Scope::new(&[], &[], false, &RandomTokens);

        let sql = SetClause::now("updated_at").render(&mut scope).unwrap();
        assert_eq!(sql, "updated_at = NOW()");
        assert!(scope.into_binds().is_empty());
    }

    #[test]
    fn test_assignments_preserve_declaration_order() {
        let mut scope = Scope::new(&[], &[], false, &RandomTokens);

        let sets = [
            SetClause::value("a", Value::Int(1)),
            SetClause::now("b"),
        ];
        let sql = render_assignments(&sets, &mut scope).unwrap();

        assert!(sql.starts_with("a = @a_"));
        assert!(sql.ends_with(", b = NOW()"));
    }
}
