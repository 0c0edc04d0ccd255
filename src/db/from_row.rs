//! Row mapping trait and helpers for reducing boilerplate in queries.
//!
//! This module provides a `FromRow` trait that models implement to define
//! how they are constructed from database rows, plus helper functions for
//! common query patterns.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Trait for constructing a type from a database row.
///
/// Implementing this trait allows using the `query_one` and `query_all`
/// helper functions, reducing repetitive row mapping closures.
pub trait FromRow: Sized {
    /// Construct an instance from a database row.
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const BRAND_COLS: &str = "id, name, email, created_at";

pub const PRODUCT_COLS: &str = "id, name, brand_id, created_at";

pub const CUSTOMER_COLS: &str = "id, email, created_at";

pub const LICENSE_COLS: &str =
    "id, key, customer_id, product_id, is_active, max_seats, expires_at, created_at";

pub const ACTIVATION_COLS: &str = "id, license_id, machine_id, friendly_name, activated_at";

// ============ FromRow Implementations ============

impl FromRow for Brand {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Brand {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            brand_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for Customer {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Customer {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl FromRow for License {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(License {
            id: row.get(0)?,
            key: row.get(1)?,
            customer_id: row.get(2)?,
            product_id: row.get(3)?,
            is_active: row.get::<_, i32>(4)? != 0,
            max_seats: row.get(5)?,
            expires_at: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for Activation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Activation {
            id: row.get(0)?,
            license_id: row.get(1)?,
            machine_id: row.get(2)?,
            friendly_name: row.get(3)?,
            activated_at: row.get(4)?,
        })
    }
}
