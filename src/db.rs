use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use tracing::debug;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Applies per-connection SQLite settings whenever the pool opens a connection
///
/// SQLite forgets `foreign_keys` between connections, so cascading deletes and
/// reference checks only work if every pooled connection turns it back on.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, R2d2Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), R2d2Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(R2d2Error::QueryError)
    }
}

/// Creates the connection pool for the given database URL
///
/// ### Errors
///
/// Returns an error if the pool cannot open its initial connections.
pub fn init_pool(database_url: &str) -> Result<DbPool, PoolError> {
    debug!("Opening database pool for {}", database_url);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
}
