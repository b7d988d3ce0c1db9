use bigdecimal::BigDecimal;
use sqlx::{self, postgres::PgArguments, FromRow};

/// A positional query parameter carrying its column type, so that NULLs
/// bind with the correct Postgres type OID.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Bool(Option<bool>),
    Numeric(Option<BigDecimal>),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(Some(v))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(v: Option<i32>) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(Some(v))
    }
}

impl From<BigDecimal> for SqlValue {
    fn from(v: BigDecimal) -> Self {
        SqlValue::Numeric(Some(v))
    }
}

impl From<Option<BigDecimal>> for SqlValue {
    fn from(v: Option<BigDecimal>) -> Self {
        SqlValue::Numeric(v)
    }
}

/// Bind one parameter onto a typed query, dispatching on the value kind.
pub fn bind_value<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlValue::Text(s) => q.bind(s.clone()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Numeric(n) => q.bind(n.clone()),
    }
}
