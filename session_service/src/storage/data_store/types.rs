use sqlx::{PgPool, SqlitePool};

/// Connection pool behind a relational save handler. Cloning shares the pool.
#[derive(Clone, Debug)]
pub(crate) enum SessionPool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl SessionPool {
    pub(crate) fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
        }
    }
}
