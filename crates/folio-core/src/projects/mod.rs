//! Portfolio projects
//!
//! The project is the central back-office entity: a titled portfolio item
//! with a derived slug and excerpt, an optional uploaded cover image, an
//! optional category, and a set of technology tags through the join table.
//!
//! # Architecture
//!
//! - `input`: validated input structures for create/update
//! - `repository`: row CRUD and join-table operations
//! - `workflow`: the create/update/destroy/list workflow

pub mod input;
pub mod repository;
pub mod workflow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use input::{CoverImage, NewProject, UpdateProject};
pub use repository::ProjectRepository;
pub use workflow::ProjectWorkflow;

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier
    pub id: String,
    /// Project title
    pub title: String,
    /// URL slug derived from the title, recomputed on every write
    pub slug: String,
    /// Full project description
    pub description: String,
    /// Preview derived from the description, at most 150 characters
    pub excerpt: String,
    /// Relative media-store path of the uploaded cover image
    pub cover_image: Option<String>,
    /// Owning category, if any
    pub category_id: Option<String>,
    /// When the project was created
    pub created_at: DateTime<Utc>,
    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with derived slug and excerpt already filled in
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
            excerpt: excerpt.into(),
            cover_image: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Notification payload summarizing a newly created project.
///
/// A lead exists only in memory: it is built once per project creation,
/// serialized into the operator notification, and never written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub title: String,
    pub description: String,
    pub slug: String,
}

impl Lead {
    /// Build the lead payload for a freshly created project
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            slug: project.slug.clone(),
        }
    }
}
