//! Validated input structures for project writes
//!
//! Every optional field is explicit: `None` means the field was not supplied
//! by the caller, which is distinct from an empty value. The workflow only
//! accepts inputs that pass `validate()`.

use crate::{Error, Result};

/// Maximum accepted title length, in characters
const MAX_TITLE_CHARS: usize = 200;

/// Input for creating a project
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Project title (required, non-empty)
    pub title: String,
    /// Project description (may be empty)
    pub description: String,
    /// Owning category id, when supplied
    pub category_id: Option<String>,
    /// Technology ids to attach, when supplied
    pub technologies: Option<Vec<String>>,
}

/// Input for updating a project
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New project title (required, non-empty)
    pub title: String,
    /// New project description (may be empty)
    pub description: String,
    /// New owning category id; `None` clears it
    pub category_id: Option<String>,
    /// Requested technology set; `None` leaves the attached set untouched,
    /// `Some` (including an empty set) replaces it
    pub technologies: Option<Vec<String>>,
}

/// An uploaded cover image payload
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Original file name, used only for its extension
    pub file_name: String,
    /// Raw file contents; the workflow treats these as opaque bytes
    pub bytes: Vec<u8>,
}

impl NewProject {
    /// Validate the input fields
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_technology_ids(self.technologies.as_deref())
    }
}

impl UpdateProject {
    /// Validate the input fields
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_technology_ids(self.technologies.as_deref())
    }
}

fn validate_title(title: &str) -> Result<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(Error::validation("title", "Title cannot be empty"));
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::validation(
            "title",
            format!("Title must be {} characters or less", MAX_TITLE_CHARS),
        ));
    }

    Ok(())
}

fn validate_technology_ids(ids: Option<&[String]>) -> Result<()> {
    if let Some(ids) = ids {
        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(Error::validation(
                "technologies",
                "Technology ids cannot be empty",
            ));
        }
    }
    Ok(())
}
