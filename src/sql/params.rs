//! Typed query parameters and binding onto sqlx queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value bound to a positional placeholder. Each variant binds with its native PostgreSQL type.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Int(i32),
    Float(f64),
    Text(String),
    IntArray(Vec<i32>),
}

impl From<i32> for BindValue {
    fn from(v: i32) -> Self {
        BindValue::Int(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<Vec<i32>> for BindValue {
    fn from(v: Vec<i32>) -> Self {
        BindValue::IntArray(v)
    }
}

/// Bind params in placeholder order.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Int(n) => query.bind(*n),
            BindValue::Float(n) => query.bind(*n),
            BindValue::Text(s) => query.bind(s.clone()),
            BindValue::IntArray(v) => query.bind(v.clone()),
        };
    }
    query
}
