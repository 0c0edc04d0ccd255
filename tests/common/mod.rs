//! Test utilities and fixtures for licensor integration tests

#![allow(dead_code, unused_imports)]

use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub use licensor::db::queries::ActivationOutcome;
pub use licensor::db::{create_pool, init_db, queries, AppState, DbPool};
pub use licensor::error::AppError;
pub use licensor::handlers;
pub use licensor::models::*;

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("Failed to enable foreign keys");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Create an AppState backed by a single in-memory connection.
/// max_size is 1 so every request sees the same in-memory database.
pub fn create_test_app_state() -> AppState {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    AppState { db: pool }
}

/// Create a Router with all endpoints for oneshot-driven tests
pub fn app(state: AppState) -> Router {
    handlers::router().with_state(state)
}

/// Create a file-backed pool on a throwaway path, for tests that need
/// multiple connections against the same database (concurrency tests).
/// Returns the pool and the path so the caller can clean up.
pub fn setup_shared_test_db() -> (DbPool, String) {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir()
        .join(format!("licensor-test-{}-{}.db", std::process::id(), nanos))
        .to_string_lossy()
        .into_owned();

    let pool = create_pool(&path).expect("Failed to create file-backed pool");
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    (pool, path)
}

/// Remove a file-backed test database and its WAL/SHM side files
pub fn cleanup_shared_test_db(path: &str) {
    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(format!("{}-wal", path));
    let _ = std::fs::remove_file(format!("{}-shm", path));
}

pub fn create_test_brand(conn: &Connection, name: &str) -> Brand {
    let input = CreateBrand {
        name: name.to_string(),
        email: format!("contact@{}.example", name.to_lowercase().replace(' ', "-")),
    };
    queries::create_brand(conn, &input).expect("Failed to create test brand")
}

pub fn create_test_product(conn: &Connection, brand_id: &str, name: &str) -> Product {
    let input = CreateProduct {
        name: name.to_string(),
        brand_id: brand_id.to_string(),
    };
    queries::create_product(conn, &input).expect("Failed to create test product")
}

pub fn create_test_customer(conn: &Connection, email: &str) -> Customer {
    let input = CreateCustomer {
        email: email.to_string(),
    };
    queries::create_customer(conn, &input).expect("Failed to create test customer")
}

pub fn create_test_license(
    conn: &mut Connection,
    customer_id: &str,
    product_id: &str,
    max_seats: i32,
) -> License {
    let input = CreateLicense {
        customer_id: customer_id.to_string(),
        product_id: product_id.to_string(),
        key: None,
        max_seats,
        expires_at: None,
    };
    queries::create_license(conn, &input).expect("Failed to create test license")
}

pub fn create_test_activation(
    conn: &mut Connection,
    license_id: &str,
    machine_id: &str,
) -> Activation {
    let input = CreateActivation {
        license_id: license_id.to_string(),
        machine_id: machine_id.to_string(),
        friendly_name: Some("Test Machine".to_string()),
    };
    match queries::activate_machine(conn, &input).expect("Failed to activate test machine") {
        ActivationOutcome::Created(a) => a,
        ActivationOutcome::Existing(_) => panic!("Expected a fresh activation"),
    }
}

/// A timestamp `days` in the future
pub fn future_timestamp(days: i64) -> i64 {
    chrono_now() + days * 86400
}

/// A timestamp `days` in the past
pub fn past_timestamp(days: i64) -> i64 {
    chrono_now() - days * 86400
}

fn chrono_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
