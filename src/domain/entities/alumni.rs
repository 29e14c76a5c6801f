use std::borrow::Cow;
use std::fmt;

use actix_multipart::form::{json::Json as MpJson, tempfile::TempFile, MultipartForm};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_NAME_LENGTH: u64 = 100;
const MAX_POSITION_LENGTH: u64 = 200;
const MAX_COMPANY_LENGTH: u64 = 200;
const MAX_MAJOR_LENGTH: u64 = 100;

// ───── Role Codes ─────────────────────────────────────────────────────

/// Role an alumnus held while in the chapter. Stored as the snake_case
/// code; ordering role listings by this column yields the code's
/// alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ShpeStatus {
    #[default]
    Member,
    Officer,
    Secretary,
    Treasurer,
    VicePresident,
    CoPresident,
    President,
    SocialChair,
    Marketing,
    CorporateRelations,
    CommunityOutreach,
    ConventionChair,
    FirstYearRep,
    Webmaster,
}

impl ShpeStatus {
    pub const ALL: [ShpeStatus; 14] = [
        ShpeStatus::Member,
        ShpeStatus::Officer,
        ShpeStatus::Secretary,
        ShpeStatus::Treasurer,
        ShpeStatus::VicePresident,
        ShpeStatus::CoPresident,
        ShpeStatus::President,
        ShpeStatus::SocialChair,
        ShpeStatus::Marketing,
        ShpeStatus::CorporateRelations,
        ShpeStatus::CommunityOutreach,
        ShpeStatus::ConventionChair,
        ShpeStatus::FirstYearRep,
        ShpeStatus::Webmaster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShpeStatus::Member => "member",
            ShpeStatus::Officer => "officer",
            ShpeStatus::Secretary => "secretary",
            ShpeStatus::Treasurer => "treasurer",
            ShpeStatus::VicePresident => "vice_president",
            ShpeStatus::CoPresident => "co_president",
            ShpeStatus::President => "president",
            ShpeStatus::SocialChair => "social_chair",
            ShpeStatus::Marketing => "marketing",
            ShpeStatus::CorporateRelations => "corporate_relations",
            ShpeStatus::CommunityOutreach => "community_outreach",
            ShpeStatus::ConventionChair => "convention_chair",
            ShpeStatus::FirstYearRep => "first_year_rep",
            ShpeStatus::Webmaster => "webmaster",
        }
    }

    /// Human-readable form shown on pages and in the admin select widget.
    pub fn label(&self) -> &'static str {
        match self {
            ShpeStatus::Member => "Member",
            ShpeStatus::Officer => "Officer",
            ShpeStatus::Secretary => "Secretary",
            ShpeStatus::Treasurer => "Treasurer",
            ShpeStatus::VicePresident => "Vice President",
            ShpeStatus::CoPresident => "Co-President",
            ShpeStatus::President => "President",
            ShpeStatus::SocialChair => "Social Chair",
            ShpeStatus::Marketing => "Marketing",
            ShpeStatus::CorporateRelations => "Corporate Relations",
            ShpeStatus::CommunityOutreach => "Community Outreach",
            ShpeStatus::ConventionChair => "Convention Chair",
            ShpeStatus::FirstYearRep => "First Year Representative",
            ShpeStatus::Webmaster => "WebMaster",
        }
    }
}

impl fmt::Display for ShpeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Alumni {
    pub id: i64,
    pub name: String,
    pub headshot: Option<String>,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
    pub is_featured: bool,
    pub is_current_exec: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AlumniInsert {
    pub name: String,
    pub headshot: Option<String>,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
    pub is_featured: bool,
    pub is_current_exec: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-record update. `headshot: None` keeps the stored path; a created
/// timestamp is never carried here, so it cannot be overwritten.
#[derive(Debug)]
pub struct AlumniUpdate {
    pub name: String,
    pub headshot: Option<String>,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
    pub is_featured: bool,
    pub is_current_exec: bool,
    pub updated_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

/// One row of the admin list view.
#[derive(Debug, Serialize)]
pub struct AlumniAdminRow {
    pub id: i64,
    pub name: String,
    pub graduation_year: i64,
    pub major: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub shpe_status_label: String,
    pub is_featured: bool,
    pub is_current_exec: bool,
    pub created_at: DateTime<Utc>,
    pub image_size: String,
}

#[derive(Debug, Serialize)]
pub struct AlumniDetail {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub headshot: Option<String>,
    pub headshot_url: Option<String>,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub shpe_status_label: String,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
    pub is_featured: bool,
    pub is_current_exec: bool,
    pub image_size: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public directory card. Carries no admin-only bookkeeping.
#[derive(Debug, Serialize)]
pub struct AlumniProfile {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub headshot_url: Option<String>,
    pub bio: String,
    pub position: String,
    pub company: String,
    pub shpe_status: ShpeStatus,
    pub shpe_status_label: String,
    pub email: String,
    pub major: String,
    pub graduation_year: i64,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlumniCreatedResponse {
    pub id: i64,
    pub display_name: String,
    pub headshot: Option<String>,
    pub admin_url: String,
}

/// Context for the executive-board page.
#[derive(Debug, Serialize)]
pub struct ExecutiveBoardContext {
    pub current_exec: Vec<AlumniProfile>,
    pub total_exec: i64,
}

/// Context for the alumni directory page. Featured and other are
/// disjoint; both exclude current executives.
#[derive(Debug, Serialize)]
pub struct AlumniDirectoryContext {
    pub featured_alumni: Vec<AlumniProfile>,
    pub other_alumni: Vec<AlumniProfile>,
    pub total_alumni: i64,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewAlumni {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Bio cannot be empty"))]
    pub bio: String,

    #[validate(length(min = 1, max = MAX_POSITION_LENGTH, message = "Position must be between 1 and 200 characters"))]
    pub position: String,

    #[validate(length(min = 1, max = MAX_COMPANY_LENGTH, message = "Company must be between 1 and 200 characters"))]
    pub company: String,

    #[serde(default)]
    pub shpe_status: ShpeStatus,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = MAX_MAJOR_LENGTH, message = "Major must be between 1 and 100 characters"))]
    pub major: String,

    #[validate(range(min = 0, message = "Graduation year cannot be negative"))]
    pub graduation_year: i64,

    #[validate(custom(function = "validate_profile_url"))]
    pub linkedin_url: Option<String>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_current_exec: bool,
}

/// Inline edit of the two list-view flags. Absent fields are left as
/// they are.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateDisplayFlags {
    pub is_featured: Option<bool>,
    pub is_current_exec: Option<bool>,
}

/// Admin list filters; all optional, combinable, ANDed together.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlumniListFilter {
    pub graduation_year: Option<i64>,
    pub major: Option<String>,
    pub shpe_status: Option<ShpeStatus>,
    pub is_featured: Option<bool>,
    pub is_current_exec: Option<bool>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
    pub q: Option<String>,
}

#[derive(Debug, MultipartForm)]
pub struct AlumniUpload {
    #[multipart(limit = "10MB")]
    pub headshot: Option<TempFile>,

    pub metadata: MpJson<NewAlumni>,
}

/// Raw uploaded photo after extraction from the multipart form, before
/// normalization.
#[derive(Debug)]
pub struct HeadshotUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

// ───── Admin Form Schema ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AdminFormSection {
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct StatusChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdminFormSchema {
    pub sections: Vec<AdminFormSection>,
    pub readonly_fields: Vec<&'static str>,
    pub status_choices: Vec<StatusChoice>,
}

/// Layout of the admin detail form. The bookkeeping fields exist only
/// once a record does, so they appear read-only on the change form and
/// not at all on the create form.
pub fn alumni_form_schema(existing: bool) -> AdminFormSchema {
    let readonly_fields = if existing {
        vec!["created_at", "updated_at", "image_size"]
    } else {
        vec![]
    };

    AdminFormSchema {
        sections: vec![
            AdminFormSection {
                title: "Personal Information",
                description: None,
                fields: vec!["name", "headshot", "email", "graduation_year", "major"],
            },
            AdminFormSection {
                title: "SHPE Information",
                description: Some("Role they held while at SHPE UVA"),
                fields: vec!["shpe_status"],
            },
            AdminFormSection {
                title: "Professional Information",
                description: None,
                fields: vec!["position", "company", "bio", "linkedin_url"],
            },
            AdminFormSection {
                title: "Display Options",
                description: Some("Control how this alumni appears on the website"),
                fields: vec!["is_featured", "is_current_exec"],
            },
        ],
        readonly_fields,
        status_choices: ShpeStatus::ALL
            .iter()
            .map(|s| StatusChoice {
                value: s.as_str(),
                label: s.label(),
            })
            .collect(),
    }
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_profile_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl NewAlumni {
    /// Blank optional URLs arrive from form submissions as empty strings;
    /// treat them as absent before validation.
    pub fn normalized(mut self) -> Self {
        if self
            .linkedin_url
            .as_deref()
            .map_or(false, |u| u.trim().is_empty())
        {
            self.linkedin_url = None;
        }
        self
    }

    pub fn prepare_for_insert(self, headshot: Option<String>) -> AlumniInsert {
        let now = Utc::now();

        AlumniInsert {
            name: self.name,
            headshot,
            bio: self.bio,
            position: self.position,
            company: self.company,
            shpe_status: self.shpe_status,
            email: self.email,
            major: self.major,
            graduation_year: self.graduation_year,
            linkedin_url: self.linkedin_url,
            is_featured: self.is_featured,
            is_current_exec: self.is_current_exec,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn prepare_for_update(self, headshot: Option<String>) -> AlumniUpdate {
        AlumniUpdate {
            name: self.name,
            headshot,
            bio: self.bio,
            position: self.position,
            company: self.company,
            shpe_status: self.shpe_status,
            email: self.email,
            major: self.major,
            graduation_year: self.graduation_year,
            linkedin_url: self.linkedin_url,
            is_featured: self.is_featured,
            is_current_exec: self.is_current_exec,
            updated_at: Utc::now(),
        }
    }
}

impl Alumni {
    /// How an alumnus is referred to across pages: "Jane Doe (Class of 2019)".
    pub fn display_name(&self) -> String {
        format!("{} (Class of {})", self.name, self.graduation_year)
    }

    pub fn headshot_url(&self) -> Option<String> {
        self.headshot.as_ref().map(|path| format!("/media/{}", path))
    }

    pub fn to_profile(&self) -> AlumniProfile {
        AlumniProfile {
            id: self.id,
            name: self.name.clone(),
            display_name: self.display_name(),
            headshot_url: self.headshot_url(),
            bio: self.bio.clone(),
            position: self.position.clone(),
            company: self.company.clone(),
            shpe_status: self.shpe_status,
            shpe_status_label: self.shpe_status.label().to_string(),
            email: self.email.clone(),
            major: self.major.clone(),
            graduation_year: self.graduation_year,
            linkedin_url: self.linkedin_url.clone(),
        }
    }

    pub fn to_admin_row(&self, image_size: String) -> AlumniAdminRow {
        AlumniAdminRow {
            id: self.id,
            name: self.name.clone(),
            graduation_year: self.graduation_year,
            major: self.major.clone(),
            position: self.position.clone(),
            company: self.company.clone(),
            shpe_status: self.shpe_status,
            shpe_status_label: self.shpe_status.label().to_string(),
            is_featured: self.is_featured,
            is_current_exec: self.is_current_exec,
            created_at: self.created_at,
            image_size,
        }
    }

    pub fn to_detail(&self, image_size: String) -> AlumniDetail {
        AlumniDetail {
            id: self.id,
            name: self.name.clone(),
            display_name: self.display_name(),
            headshot: self.headshot.clone(),
            headshot_url: self.headshot_url(),
            bio: self.bio.clone(),
            position: self.position.clone(),
            company: self.company.clone(),
            shpe_status: self.shpe_status,
            shpe_status_label: self.shpe_status.label().to_string(),
            email: self.email.clone(),
            major: self.major.clone(),
            graduation_year: self.graduation_year,
            linkedin_url: self.linkedin_url.clone(),
            is_featured: self.is_featured,
            is_current_exec: self.is_current_exec,
            image_size,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
