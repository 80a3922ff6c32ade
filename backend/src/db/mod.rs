pub mod bible;
pub mod bible_models;
pub mod bible_schema;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Error as AnyhowError, Result, anyhow};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;
use parking_lot::Mutex;

use crate::db::bible::BibleDbHandle;
use crate::get_biblia_db_path;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
pub struct DatabaseHandle {
    pool: SqlitePool,
    pub write_lock: Mutex<()>,
}

impl DatabaseHandle {
    pub fn new(database_url: &str) -> Result<Self> {
        let manager = ConnectionManager::new(database_url);
        let pool = Pool::builder()
            .max_size(5)
            .build(manager)
            .with_context(|| format!("Failed to create pool for: {}", database_url))?;

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    pub fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(AnyhowError::from)
    }

    /// Performs a write operation on the database, guarded by the
    /// write_lock Mutex.
    pub fn do_write<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, diesel::result::Error>,
    {
        let _lock = self.write_lock.lock();
        let mut db_conn = self
            .pool
            .get()
            .context("Failed to get connection from pool for write")?;
        operation(&mut db_conn).map_err(AnyhowError::from)
    }

    /// Performs a read operation on the database.
    pub fn do_read<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, diesel::result::Error>,
    {
        let mut db_conn = self
            .pool
            .get()
            .context("Failed to get connection from pool for read")?;
        operation(&mut db_conn).map_err(AnyhowError::from)
    }

    pub fn run_migrations(&self) -> Result<()> {
        let _lock = self.write_lock.lock();
        let mut db_conn = self
            .pool
            .get()
            .context("Failed to get connection from pool for migrations")?;
        db_conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct DbManager {
    pub bible: Arc<BibleDbHandle>,
}

impl DbManager {
    pub fn new() -> Result<Self> {
        dotenv().ok();

        let db_path = get_biblia_db_path()?;
        Self::new_with_path(&db_path)
    }

    pub fn new_with_path(db_path: &Path) -> Result<Self> {
        let database_url = db_path
            .to_str()
            .ok_or_else(|| anyhow!("Invalid database path: {:?}", db_path))?;

        let handle = BibleDbHandle::new(database_url)?;
        handle.run_migrations()?;

        Ok(DbManager {
            bible: Arc::new(handle),
        })
    }
}
