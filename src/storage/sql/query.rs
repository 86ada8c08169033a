//! Parameter-binding query builder.
//!
//! Callers describe *what* to filter or assign as a `FieldSet` of `(column, value)` pairs;
//! this module renders the SQL text and binds every value positionally through
//! `sqlx::QueryBuilder`. Column and table names only ever come from code, never from
//! request input, and values are never interpolated into the SQL text.

use crate::domain::schema::ValidationError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

/// A value that can be bound into a Postgres statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Numeric(Decimal),
    Timestamptz(DateTime<Utc>),
}

impl SqlValue {
    fn push_bind(self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            SqlValue::Text(v) => qb.push_bind(v),
            SqlValue::Int(v) => qb.push_bind(v),
            SqlValue::BigInt(v) => qb.push_bind(v),
            SqlValue::Numeric(v) => qb.push_bind(v),
            SqlValue::Timestamptz(v) => qb.push_bind(v),
        };
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Numeric(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamptz(v)
    }
}

/// Ordered `(column, value)` pairs. Absent optional values are dropped on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<(&'static str, SqlValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value`, replacing an earlier value for the same column.
    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    /// Adds `column = value` only when the value is present.
    pub fn set_opt<V: Into<SqlValue>>(&mut self, column: &'static str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(c, _)| *c).collect()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    /// Fails with a validation error when nothing would be changed.
    pub fn ensure_not_empty(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Err(ValidationError::empty_update())
        } else {
            Ok(())
        }
    }
}

/// `SELECT <columns> FROM <table> [WHERE a = $1 AND b = $2 ...] ORDER BY <order_by>`.
///
/// No filters means no predicate: every row is returned.
pub fn select_filtered(
    table: &str,
    columns: &str,
    filters: FieldSet,
    order_by: &str,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", columns, table));
    for (idx, (column, value)) in filters.fields.into_iter().enumerate() {
        qb.push(if idx == 0 { " WHERE " } else { " AND " });
        qb.push(column);
        qb.push(" = ");
        value.push_bind(&mut qb);
    }
    qb.push(" ORDER BY ");
    qb.push(order_by);
    qb
}

/// `UPDATE <table> SET a = $1, b = $2 WHERE <key> = $3 RETURNING <returning>`.
///
/// An empty field set is rejected before any SQL is produced.
pub fn update_returning(
    table: &str,
    assignments: FieldSet,
    key: (&'static str, SqlValue),
    returning: &str,
) -> Result<QueryBuilder<'static, Postgres>, ValidationError> {
    assignments.ensure_not_empty()?;

    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", table));
    for (idx, (column, value)) in assignments.fields.into_iter().enumerate() {
        if idx > 0 {
            qb.push(", ");
        }
        qb.push(column);
        qb.push(" = ");
        value.push_bind(&mut qb);
    }
    let (key_column, key_value) = key;
    qb.push(" WHERE ");
    qb.push(key_column);
    qb.push(" = ");
    key_value.push_bind(&mut qb);
    qb.push(" RETURNING ");
    qb.push(returning);
    Ok(qb)
}

/// `INSERT INTO <table> (a, b) VALUES ($1, $2) RETURNING <returning>`.
pub fn insert_returning(
    table: &str,
    values: FieldSet,
    returning: &str,
) -> Result<QueryBuilder<'static, Postgres>, ValidationError> {
    values.ensure_not_empty()?;

    let columns = values.columns().join(", ");
    let mut qb = QueryBuilder::new(format!("INSERT INTO {} ({}) VALUES (", table, columns));
    for (idx, (_, value)) in values.fields.into_iter().enumerate() {
        if idx > 0 {
            qb.push(", ");
        }
        value.push_bind(&mut qb);
    }
    qb.push(") RETURNING ");
    qb.push(returning);
    Ok(qb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn no_filters_means_no_predicate() {
        let qb = select_filtered("products", "id, name", FieldSet::new(), "id");
        assert_eq!(qb.sql(), "SELECT id, name FROM products ORDER BY id");
    }

    #[test]
    fn filters_are_bound_and_anded() {
        let mut filters = FieldSet::new();
        filters
            .set("name", "Widget".to_string())
            .set("price", Decimal::from_str("9.99").unwrap());
        let qb = select_filtered("products", "*", filters, "id");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM products WHERE name = $1 AND price = $2 ORDER BY id"
        );
    }

    #[test]
    fn hostile_values_never_reach_sql_text() {
        let mut filters = FieldSet::new();
        filters.set("name", "x'; DROP TABLE products; --".to_string());
        let qb = select_filtered("products", "*", filters, "id");
        assert!(!qb.sql().contains("DROP"));
        assert!(qb.sql().ends_with("WHERE name = $1 ORDER BY id"));
    }

    #[test]
    fn absent_optionals_are_dropped() {
        let mut fields = FieldSet::new();
        fields
            .set_opt("name", Some("Ada".to_string()))
            .set_opt::<String>("email", None)
            .set_opt("quantity", Some(2_i32));
        assert_eq!(fields.columns(), vec!["name", "quantity"]);
        assert_eq!(fields.get("quantity"), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn set_replaces_existing_column() {
        let mut fields = FieldSet::new();
        fields.set("quantity", 1_i32).set("quantity", 5_i32);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("quantity"), Some(&SqlValue::Int(5)));
    }

    #[test]
    fn update_covers_exactly_present_fields() {
        let mut fields = FieldSet::new();
        fields.set("name", "Ada".to_string()).set("email", "ada@example.com".to_string());
        let qb = update_returning("users", fields, ("id", SqlValue::BigInt(7)), "id, name, email")
            .unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE users SET name = $1, email = $2 WHERE id = $3 RETURNING id, name, email"
        );
    }

    #[test]
    fn empty_update_is_a_validation_error() {
        let err = update_returning("users", FieldSet::new(), ("id", SqlValue::BigInt(1)), "*")
            .err()
            .unwrap();
        assert_eq!(err, ValidationError::empty_update());
    }

    #[test]
    fn insert_lists_columns_in_order() {
        let mut values = FieldSet::new();
        values.set("user_id", 1_i64).set("quantity", 3_i32);
        let qb = insert_returning("orders", values, "*").unwrap();
        assert_eq!(
            qb.sql(),
            "INSERT INTO orders (user_id, quantity) VALUES ($1, $2) RETURNING *"
        );
    }
}
