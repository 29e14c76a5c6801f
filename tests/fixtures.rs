use alumni_backend::entities::alumni::ShpeStatus;
use chrono::Utc;
use sqlx::SqlitePool;

/// Builder for rows inserted straight into the database, bypassing the API.
/// Useful for page tests that need a populated directory without uploads.
pub struct AlumniFixture {
    pub name: String,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
    pub headshot: Option<String>,
    pub is_featured: bool,
    pub is_current_exec: bool,
}

impl AlumniFixture {
    pub fn new(name: &str) -> Self {
        let email_user = name.to_lowercase().replace(' ', ".");
        Self {
            name: name.to_string(),
            bio: "Organized the regional conference and tutored calculus.".to_string(),
            position: "Mechanical Engineer".to_string(),
            company: "Delta Fabrication".to_string(),
            shpe_status: ShpeStatus::Member,
            email: format!("{}@example.com", email_user),
            major: "Mechanical Engineering".to_string(),
            graduation_year: 2022,
            linkedin_url: None,
            headshot: None,
            is_featured: false,
            is_current_exec: false,
        }
    }

    #[allow(dead_code)]
    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }

    #[allow(dead_code)]
    pub fn exec(mut self, status: ShpeStatus) -> Self {
        self.is_current_exec = true;
        self.shpe_status = status;
        self
    }

    #[allow(dead_code)]
    pub fn status(mut self, status: ShpeStatus) -> Self {
        self.shpe_status = status;
        self
    }

    #[allow(dead_code)]
    pub fn class_of(mut self, year: i64) -> Self {
        self.graduation_year = year;
        self
    }

    #[allow(dead_code)]
    pub fn with_headshot(mut self, path: &str) -> Self {
        self.headshot = Some(path.to_string());
        self
    }
}

#[allow(dead_code)]
pub async fn insert_alumni(pool: &SqlitePool, fixture: AlumniFixture) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar(
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
    .bind(&fixture.name)
    .bind(&fixture.headshot)
    .bind(&fixture.bio)
    .bind(&fixture.position)
    .bind(&fixture.company)
    .bind(fixture.shpe_status)
    .bind(&fixture.email)
    .bind(&fixture.major)
    .bind(fixture.graduation_year)
    .bind(&fixture.linkedin_url)
    .bind(fixture.is_featured)
    .bind(fixture.is_current_exec)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("Failed to insert alumni fixture")
}
