use async_trait::async_trait;
use mockall::automock;
use sqlx::{self, QueryBuilder, SqlitePool};

use crate::{
    entities::alumni::{Alumni, AlumniInsert, AlumniListFilter, AlumniUpdate, UpdateDisplayFlags},
    errors::AppError,
    repositories::sqlx_repo::SqlxAlumniRepo,
};

#[automock]
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_alumni(&self, record: &AlumniInsert) -> Result<i64, AppError>;
    async fn get_alumni_by_id(&self, id: i64) -> Result<Alumni, AppError>;
    async fn list_admin_alumni(&self, filter: &AlumniListFilter) -> Result<Vec<Alumni>, AppError>;
    async fn update_alumni(&self, id: i64, record: &AlumniUpdate) -> Result<Alumni, AppError>;
    async fn set_display_flags(&self, id: i64, flags: &UpdateDisplayFlags) -> Result<Alumni, AppError>;
    async fn delete_alumni(&self, id: i64) -> Result<(), AppError>;
    async fn current_executives(&self) -> Result<Vec<Alumni>, AppError>;
    async fn featured_alumni(&self) -> Result<Vec<Alumni>, AppError>;
    async fn other_alumni(&self) -> Result<Vec<Alumni>, AppError>;
    async fn count_non_exec(&self) -> Result<i64, AppError>;
}

impl SqlxAlumniRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqlxAlumniRepo { pool }
    }
}

#[async_trait]
impl AlumniRepository for SqlxAlumniRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_alumni(&self, record: &AlumniInsert) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO alumni (
                name, headshot, bio, position, company, shpe_status, email, major,
                graduation_year, linkedin_url, is_featured, is_current_exec,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&record.name)
        .bind(&record.headshot)
        .bind(&record.bio)
        .bind(&record.position)
        .bind(&record.company)
        .bind(record.shpe_status)
        .bind(&record.email)
        .bind(&record.major)
        .bind(record.graduation_year)
        .bind(&record.linkedin_url)
        .bind(record.is_featured)
        .bind(record.is_current_exec)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_alumni_by_id(&self, id: i64) -> Result<Alumni, AppError> {
        let record = sqlx::query_as::<_, Alumni>("SELECT * FROM alumni WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn list_admin_alumni(&self, filter: &AlumniListFilter) -> Result<Vec<Alumni>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM alumni WHERE 1 = 1");

        if let Some(year) = filter.graduation_year {
            builder.push(" AND graduation_year = ").push_bind(year);
        }

        if let Some(major) = &filter.major {
            builder.push(" AND LOWER(major) = LOWER(").push_bind(major).push(")");
        }

        if let Some(status) = filter.shpe_status {
            builder.push(" AND shpe_status = ").push_bind(status);
        }

        if let Some(featured) = filter.is_featured {
            builder.push(" AND is_featured = ").push_bind(featured);
        }

        if let Some(exec) = filter.is_current_exec {
            builder.push(" AND is_current_exec = ").push_bind(exec);
        }

        if let Some(after) = filter.created_after {
            builder.push(" AND date(created_at) >= date(").push_bind(after.to_string()).push(")");
        }

        if let Some(before) = filter.created_before {
            builder.push(" AND date(created_at) <= date(").push_bind(before.to_string()).push(")");
        }

        if let Some(q) = &filter.q {
            let pattern = format!("%{}%", q.to_lowercase());
            builder.push(" AND (LOWER(name) LIKE ").push_bind(pattern.clone());
            builder.push(" OR LOWER(email) LIKE ").push_bind(pattern.clone());
            builder.push(" OR LOWER(major) LIKE ").push_bind(pattern.clone());
            builder.push(" OR LOWER(position) LIKE ").push_bind(pattern.clone());
            builder.push(" OR LOWER(company) LIKE ").push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY graduation_year DESC, name ASC");

        let query = builder.build_query_as::<Alumni>();
        let records: Vec<Alumni> = query.fetch_all(&self.pool).await?;

        Ok(records)
    }

    async fn update_alumni(&self, id: i64, record: &AlumniUpdate) -> Result<Alumni, AppError> {
        // COALESCE keeps the stored headshot path when no new file was sent
        let updated = sqlx::query_as::<_, Alumni>(
            r#"
            UPDATE alumni SET
                name = ?,
                headshot = COALESCE(?, headshot),
                bio = ?,
                position = ?,
                company = ?,
                shpe_status = ?,
                email = ?,
                major = ?,
                graduation_year = ?,
                linkedin_url = ?,
                is_featured = ?,
                is_current_exec = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&record.name)
        .bind(&record.headshot)
        .bind(&record.bio)
        .bind(&record.position)
        .bind(&record.company)
        .bind(record.shpe_status)
        .bind(&record.email)
        .bind(&record.major)
        .bind(record.graduation_year)
        .bind(&record.linkedin_url)
        .bind(record.is_featured)
        .bind(record.is_current_exec)
        .bind(record.updated_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn set_display_flags(&self, id: i64, flags: &UpdateDisplayFlags) -> Result<Alumni, AppError> {
        let updated = sqlx::query_as::<_, Alumni>(
            r#"
            UPDATE alumni SET
                is_featured = COALESCE(?, is_featured),
                is_current_exec = COALESCE(?, is_current_exec),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(flags.is_featured)
        .bind(flags.is_current_exec)
        .bind(chrono::Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_alumni(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM alumni WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }

        Ok(())
    }

    async fn current_executives(&self) -> Result<Vec<Alumni>, AppError> {
        let records = sqlx::query_as::<_, Alumni>(
            r#"
            SELECT * FROM alumni
            WHERE is_current_exec = TRUE
            ORDER BY shpe_status ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn featured_alumni(&self) -> Result<Vec<Alumni>, AppError> {
        let records = sqlx::query_as::<_, Alumni>(
            r#"
            SELECT * FROM alumni
            WHERE is_featured = TRUE AND is_current_exec = FALSE
            ORDER BY graduation_year DESC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn other_alumni(&self) -> Result<Vec<Alumni>, AppError> {
        let records = sqlx::query_as::<_, Alumni>(
            r#"
            SELECT * FROM alumni
            WHERE is_featured = FALSE AND is_current_exec = FALSE
            ORDER BY graduation_year DESC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count_non_exec(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alumni WHERE is_current_exec = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(count)
    }
}
