use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use flowcrm::db::{DbPool, establish_connection_pool};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A file-backed SQLite database with migrations applied. The backing
/// directory (database file plus WAL sidecars) is removed on drop.
pub struct TestDb {
    // Held for its Drop impl.
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = dir.path().join(name).to_string_lossy().into_owned();
        let pool = establish_connection_pool(&url).expect("failed to build test pool");
        {
            let mut conn = pool.get().expect("failed to get test connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("failed to run migrations");
        }
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
