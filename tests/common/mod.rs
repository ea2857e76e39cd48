#![allow(dead_code)]

use franchise_intranet::db::{DbPool, establish_connection_pool, run_migrations};
use tempfile::TempDir;

/// SQLite database living in a temporary directory for the duration of a test.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("temp path is not utf-8").to_string();

        let pool = establish_connection_pool(&url).expect("failed to build pool");
        run_migrations(&pool).expect("failed to run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
