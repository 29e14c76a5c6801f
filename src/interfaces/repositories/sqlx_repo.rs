use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqlxAlumniRepo {
    pub pool: SqlitePool,
}
