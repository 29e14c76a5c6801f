use std::io::Cursor;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use alumni_backend::db::sqlite::create_pool;
use alumni_backend::entities::alumni::{NewAlumni, ShpeStatus};
use alumni_backend::routes::configure_routes;
use alumni_backend::settings::{AppConfig, AppEnvironment};
use alumni_backend::AppState;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
    pub client: Client,
    pub media_root: PathBuf,
    // Dropping the TempDir deletes the database and media files with it.
    _workspace: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let workspace = TempDir::new().expect("Failed to create test workspace");
        let db_path = workspace.path().join("alumni_test.db");
        let media_root = workspace.path().join("media");

        let config = test_config(&db_path, &media_root);

        let db_pool = create_pool(&config.database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .expect("Failed to run migrations");

        let app_state = Arc::new(AppState::new(&config, db_pool.clone()));
        app_state
            .media
            .ensure_layout()
            .await
            .expect("Failed to prepare media layout");

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = app_state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state.clone()))
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to listen on test port")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        wait_until_healthy(&client, &address).await;

        Self {
            address,
            db_pool,
            client,
            media_root,
            _workspace: workspace,
        }
    }

    #[allow(dead_code)]
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute GET request");

        let status = response.status();
        let body = response.json().await.expect("Response was not valid JSON");
        (status, body)
    }

    #[allow(dead_code)]
    pub async fn create_alumni(&self, record: &NewAlumni) -> reqwest::Response {
        self.client
            .post(format!("{}/api/v1/admin/alumni", self.address))
            .json(record)
            .send()
            .await
            .expect("Failed to execute create request")
    }

    #[allow(dead_code)]
    pub async fn create_alumni_with_photo(
        &self,
        record: &NewAlumni,
        file_name: &str,
        photo: Vec<u8>,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/api/v1/admin/alumni", self.address))
            .multipart(upload_form(record, file_name, photo))
            .send()
            .await
            .expect("Failed to execute multipart create request")
    }

    #[allow(dead_code)]
    pub async fn update_alumni_with_photo(
        &self,
        id: i64,
        record: &NewAlumni,
        file_name: &str,
        photo: Vec<u8>,
    ) -> reqwest::Response {
        self.client
            .put(format!("{}/api/v1/admin/alumni/{}", self.address, id))
            .multipart(upload_form(record, file_name, photo))
            .send()
            .await
            .expect("Failed to execute multipart update request")
    }

    #[allow(dead_code)]
    pub async fn count_alumni(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM alumni")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count alumni rows")
    }
}

async fn wait_until_healthy(client: &Client, address: &str) {
    let health_url = format!("{}/api/v1/admin/health", address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Test server never became healthy at {}", health_url);
}

fn test_config(db_path: &std::path::Path, media_root: &std::path::Path) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "alumni-backend-test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: format!("sqlite://{}", db_path.display()),
        media_root: media_root.to_path_buf(),
        cors_allowed_origins: vec!["*".to_string()],
    }
}

fn upload_form(record: &NewAlumni, file_name: &str, photo: Vec<u8>) -> Form {
    let metadata = serde_json::to_string(record).expect("Failed to serialize metadata");
    Form::new()
        .part(
            "metadata",
            Part::text(metadata)
                .mime_str("application/json")
                .expect("Invalid metadata mime type"),
        )
        .part(
            "headshot",
            Part::bytes(photo)
                .file_name(file_name.to_string())
                .mime_str("image/png")
                .expect("Invalid photo mime type"),
        )
}

#[allow(dead_code)]
pub fn valid_alumni(name: &str) -> NewAlumni {
    let email_user = name.to_lowercase().replace(' ', ".");
    NewAlumni {
        name: name.to_string(),
        bio: "Led the outreach committee and mentored first-year members.".to_string(),
        position: "Software Engineer".to_string(),
        company: "Orbital Works".to_string(),
        shpe_status: ShpeStatus::Member,
        email: format!("{}@example.com", email_user),
        major: "Computer Science".to_string(),
        graduation_year: 2021,
        linkedin_url: None,
        is_featured: false,
        is_current_exec: false,
    }
}

#[allow(dead_code)]
pub fn png_with_alpha(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 128]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

#[allow(dead_code)]
pub fn opaque_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([10, 120, 220]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

#[allow(dead_code)]
pub fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 90, 90]));
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), 90);
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(encoder)
        .expect("Failed to encode JPEG fixture");
    bytes
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .expect("Failed to encode image fixture");
    bytes
}
