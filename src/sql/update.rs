use super::error::SqlError;
use super::value::SqlValue;

/// A generated partial-update SET clause: one `"column"=$n` fragment per
/// supplied field, with the bound values in matching placeholder order.
///
/// Column names come from the per-entity update structs and are
/// compile-time constants; they are never taken from request input.
#[derive(Debug)]
pub struct SetClause {
    columns: Vec<&'static str>,
    params: Vec<SqlValue>,
}

impl SetClause {
    pub fn builder() -> SetClauseBuilder {
        SetClauseBuilder { assignments: vec![] }
    }

    /// The comma-joined assignment fragments, e.g. `"name"=$1, "num_employees"=$2`.
    pub fn sql(&self) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| format!("\"{}\"=${}", column, idx + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Placeholder index for the first parameter appended after the SET
    /// values (typically the WHERE-clause identifier).
    pub fn next_param(&self) -> usize {
        self.params.len() + 1
    }
}

pub struct SetClauseBuilder {
    assignments: Vec<(&'static str, SqlValue)>,
}

impl SetClauseBuilder {
    /// Add one column assignment. Insertion order determines placeholder
    /// numbering.
    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.assignments.push((column, value.into()));
        self
    }

    /// Add a column assignment only when the field was supplied. A supplied
    /// explicit NULL still counts as an assignment.
    pub fn set_opt<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn build(self) -> Result<SetClause, SqlError> {
        if self.assignments.is_empty() {
            return Err(SqlError::EmptyUpdate);
        }
        let (columns, params) = self.assignments.into_iter().unzip();
        Ok(SetClause { columns, params })
    }
}
