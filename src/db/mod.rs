mod from_row;
pub mod queries;
mod schema;

pub use schema::init_db;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state holding the database pool
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

/// Create a connection pool for the given database path.
///
/// Every connection enables foreign keys and a busy timeout so IMMEDIATE
/// transactions on contended licenses wait for the writer instead of
/// failing with SQLITE_BUSY.
pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
    });
    Pool::builder().max_size(10).build(manager)
}
