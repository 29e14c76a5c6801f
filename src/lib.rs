mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, media, utils};

use media::store::MediaStore;
use repositories::sqlx_repo::SqlxAlumniRepo;
use use_cases::{alumni_admin::AlumniAdminHandler, pages::PagesHandler};

pub struct AppState {
    pub admin_handler: AppAdminHandler,
    pub pages_handler: AppPagesHandler,
    pub media: MediaStore,
}

pub type AppAdminHandler = AlumniAdminHandler<SqlxAlumniRepo>;
pub type AppPagesHandler = PagesHandler<SqlxAlumniRepo>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::SqlitePool) -> Self {
        let media = MediaStore::new(&config.media_root);
        let alumni_repo = SqlxAlumniRepo::new(pool);

        AppState {
            admin_handler: AlumniAdminHandler::new(alumni_repo.clone(), media.clone()),
            pages_handler: PagesHandler::new(alumni_repo),
            media,
        }
    }
}
