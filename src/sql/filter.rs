use super::error::SqlError;
use super::value::SqlValue;

/// Composes optional search predicates into a single AND-ed WHERE clause.
///
/// Every user-supplied value is bound as a positional parameter; the only
/// literal SQL comes from compile-time column names. Placeholder numbering
/// starts at $1 and tracks the parameter list exactly.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    predicates: Vec<String>,
    params: Vec<SqlValue>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match. The wildcard-wrapped needle is a
    /// bound parameter, never interpolated into the SQL text.
    pub fn contains(&mut self, column: &'static str, needle: &str) -> &mut Self {
        let param = self.param(SqlValue::Text(Some(format!("%{}%", needle))));
        self.predicates.push(format!("\"{}\" ILIKE {}", column, param));
        self
    }

    /// Inclusive lower bound.
    pub fn at_least(&mut self, column: &'static str, bound: impl Into<SqlValue>) -> &mut Self {
        let param = self.param(bound.into());
        self.predicates.push(format!("\"{}\" >= {}", column, param));
        self
    }

    /// Inclusive upper bound.
    pub fn at_most(&mut self, column: &'static str, bound: impl Into<SqlValue>) -> &mut Self {
        let param = self.param(bound.into());
        self.predicates.push(format!("\"{}\" <= {}", column, param));
        self
    }

    /// Strictly-positive predicate; carries no parameter. NULLs never match.
    pub fn positive(&mut self, column: &'static str) -> &mut Self {
        self.predicates.push(format!("\"{}\" > 0", column));
        self
    }

    pub fn build(self) -> WhereClause {
        WhereClause {
            predicates: self.predicates,
            params: self.params,
        }
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

#[derive(Debug)]
pub struct WhereClause {
    predicates: Vec<String>,
    params: Vec<SqlValue>,
}

impl WhereClause {
    /// Full `WHERE ...` clause, or the empty string when no filter was
    /// supplied (all rows).
    pub fn sql(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.predicates.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Reject inconsistent numeric range bounds. Values arrive already parsed;
/// coercing query-string text to numbers is the HTTP boundary's job.
pub fn validate_range(
    what: &'static str,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<(), SqlError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(SqlError::InvalidRange { what, min, max });
        }
    }
    Ok(())
}
