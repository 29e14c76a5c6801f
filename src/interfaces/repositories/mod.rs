pub mod alumni;
pub mod sqlx_repo;
