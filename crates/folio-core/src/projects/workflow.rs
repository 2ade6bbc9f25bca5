//! Project workflow
//!
//! The create/update/destroy/list workflow behind the back-office: derives
//! slug and excerpt, stores uploaded cover images, writes the project row,
//! synchronizes technology tags, and dispatches the lead notification on
//! creation.

use super::input::{CoverImage, NewProject, UpdateProject};
use super::repository::ProjectRepository;
use super::{Lead, Project};
use crate::media::MediaStore;
use crate::notify::Notifier;
use crate::storage::Database;
use crate::{Error, Result};
use tracing::{info, warn};

/// Media-store namespace for uploaded cover images
const COVER_NAMESPACE: &str = "project_images";

/// Excerpts keep at most this many characters of the description
const EXCERPT_CHARS: usize = 147;

/// Marker appended to truncated excerpts
const ELLIPSIS: &str = "...";

/// Derive a URL slug from a title.
///
/// Lowercase, alphanumeric runs kept, everything else collapsed into single
/// hyphens. Deterministic. No uniqueness check: two projects with the same
/// title share a slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppresses leading hyphens
    for c in title.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive the excerpt from a description.
///
/// Empty descriptions yield an empty excerpt. Descriptions of at most 147
/// characters are carried verbatim; longer ones truncate to the first 147
/// characters plus the ellipsis marker. Counts characters, so a UTF-8 scalar
/// is never split.
pub fn excerpt(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }
    if description.chars().count() <= EXCERPT_CHARS {
        return description.to_string();
    }
    let prefix: String = description.chars().take(EXCERPT_CHARS).collect();
    format!("{}{}", prefix, ELLIPSIS)
}

/// The back-office project workflow
pub struct ProjectWorkflow<'a> {
    db: &'a Database,
    media: &'a MediaStore,
    notifier: &'a dyn Notifier,
    operator_email: String,
}

impl<'a> ProjectWorkflow<'a> {
    /// Create a workflow over the given collaborators
    pub fn new(
        db: &'a Database,
        media: &'a MediaStore,
        notifier: &'a dyn Notifier,
        operator_email: impl Into<String>,
    ) -> Self {
        Self {
            db,
            media,
            notifier,
            operator_email: operator_email.into(),
        }
    }

    /// Create a project and dispatch the lead notification.
    ///
    /// The project row is committed before the notification goes out; a
    /// failed dispatch propagates as an error but does not roll the row back.
    pub async fn create(&self, input: NewProject, cover: Option<CoverImage>) -> Result<Project> {
        input.validate()?;

        let mut project = Project::new(
            input.title.clone(),
            slugify(&input.title),
            input.description.clone(),
            excerpt(&input.description),
        );
        project.category_id = input.category_id.clone();

        if let Some(cover) = cover {
            let path = self
                .media
                .put(COVER_NAMESPACE, &cover.file_name, &cover.bytes)?;
            project.cover_image = Some(path);
        }

        let repo = ProjectRepository::new(self.db);
        repo.create(&project).await?;

        if let Some(techs) = input.technologies.as_deref() {
            if !techs.is_empty() {
                // No existence check: an unknown id fails on the foreign key
                repo.attach_technologies(&project.id, techs).await?;
            }
        }

        info!(project_id = %project.id, slug = %project.slug, "Project created");

        let lead = Lead::from_project(&project);
        if let Err(e) = self.notifier.send(&self.operator_email, &lead).await {
            warn!(
                project_id = %project.id,
                error = %e,
                "Lead notification failed; the project row stays committed"
            );
            return Err(e);
        }

        Ok(project)
    }

    /// Update a project.
    ///
    /// Slug and excerpt are recomputed unconditionally, even when title and
    /// description did not change. A newly supplied cover image replaces the
    /// stored blob; when technology ids are supplied the attached set is
    /// synchronized to them. No notification is sent.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateProject,
        cover: Option<CoverImage>,
    ) -> Result<Project> {
        input.validate()?;

        let repo = ProjectRepository::new(self.db);
        let mut project = repo
            .get(id)
            .await?
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))?;

        project.title = input.title.clone();
        project.slug = slugify(&input.title);
        project.description = input.description.clone();
        project.excerpt = excerpt(&input.description);
        project.category_id = input.category_id.clone();

        if let Some(cover) = cover {
            // Drop the previous blob before storing the replacement
            if let Some(old) = project.cover_image.take() {
                self.media.delete(&old)?;
            }
            let path = self
                .media
                .put(COVER_NAMESPACE, &cover.file_name, &cover.bytes)?;
            project.cover_image = Some(path);
        }

        repo.update(&project).await?;

        if let Some(requested) = input.technologies.as_deref() {
            repo.sync_technologies(&project.id, requested).await?;
        }

        info!(project_id = %project.id, slug = %project.slug, "Project updated");
        Ok(project)
    }

    /// Destroy a project.
    ///
    /// Join rows are removed before the project row; the schema does not
    /// cascade from projects. The stored cover image, if any, stays on disk.
    pub async fn destroy(&self, id: &str) -> Result<()> {
        let repo = ProjectRepository::new(self.db);
        if !repo.exists(id).await? {
            return Err(Error::ProjectNotFound(id.to_string()));
        }

        repo.detach_all(id).await?;
        repo.delete(id).await?;

        info!(project_id = %id, "Project destroyed");
        Ok(())
    }

    /// List all projects
    pub async fn list(&self) -> Result<Vec<Project>> {
        ProjectRepository::new(self.db).list().await
    }

    /// Get a project by id
    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        ProjectRepository::new(self.db).get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Test double recording every dispatched lead
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, Lead)>>,
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, to: &str, lead: &Lead) -> Result<()> {
            self.sent.lock().unwrap().push((to.to_string(), lead.clone()));
            Ok(())
        }
    }

    /// Test double that always fails to dispatch
    struct FailingNotifier;

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _to: &str, _lead: &Lead) -> Result<()> {
            Err(Error::Notification("mail endpoint down".to_string()))
        }
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Hello World"), slugify("Hello World"));
    }

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust & Tokio!"), "rust-tokio");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify("CamelCase2024"), "camelcase2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_excerpt_empty_description() {
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn test_excerpt_short_description_untruncated() {
        let short = "A tidy little project.";
        assert_eq!(excerpt(short), short);

        let exactly = "x".repeat(147);
        assert_eq!(excerpt(&exactly), exactly);
    }

    #[test]
    fn test_excerpt_truncates_long_description() {
        let long = "x".repeat(200);
        let e = excerpt(&long);
        assert_eq!(e.chars().count(), 150);
        assert!(e.ends_with("..."));
        assert!(long.starts_with(e.trim_end_matches("...")));
    }

    #[test]
    fn test_excerpt_never_splits_a_scalar() {
        let long = "é".repeat(200);
        let e = excerpt(&long);
        assert_eq!(e.chars().count(), 150);
        assert!(e.starts_with('é'));
    }

    async fn setup() -> (Database, TempDir, MediaStore) {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let temp = TempDir::new().unwrap();
        let media = MediaStore::open(temp.path()).unwrap();
        (db, temp, media)
    }

    #[tokio::test]
    async fn test_create_without_cover() {
        let (db, _temp, media) = setup().await;
        let notifier = RecordingNotifier::default();
        let workflow = ProjectWorkflow::new(&db, &media, &notifier, "operator@example.com");

        let project = workflow
            .create(
                NewProject {
                    title: "Hello World".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(project.slug, "hello-world");
        assert_eq!(project.excerpt, "");
        assert!(project.cover_image.is_none());

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "operator@example.com");
        assert_eq!(sent[0].1.title, "Hello World");
    }

    #[tokio::test]
    async fn test_create_stores_cover_bytes() {
        let (db, _temp, media) = setup().await;
        let notifier = LogNotifier;
        let workflow = ProjectWorkflow::new(&db, &media, &notifier, "operator@example.com");

        let project = workflow
            .create(
                NewProject {
                    title: "With Cover".to_string(),
                    ..Default::default()
                },
                Some(CoverImage {
                    file_name: "cover.png".to_string(),
                    bytes: b"png-bytes".to_vec(),
                }),
            )
            .await
            .unwrap();

        let path = project.cover_image.expect("Cover path should be recorded");
        assert!(path.starts_with("project_images/"));
        assert_eq!(std::fs::read(media.resolve(&path)).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_create_survives_notification_failure() {
        let (db, _temp, media) = setup().await;
        let workflow = ProjectWorkflow::new(&db, &media, &FailingNotifier, "operator@example.com");

        let result = workflow
            .create(
                NewProject {
                    title: "Committed Anyway".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(result.is_err(), "Dispatch failure propagates");

        // The row was committed before the dispatch and is not rolled back
        let all = workflow.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Committed Anyway");
    }

    #[tokio::test]
    async fn test_update_recomputes_slug_and_excerpt() {
        let (db, _temp, media) = setup().await;
        let notifier = RecordingNotifier::default();
        let workflow = ProjectWorkflow::new(&db, &media, &notifier, "operator@example.com");

        let project = workflow
            .create(
                NewProject {
                    title: "First Title".to_string(),
                    description: "d".repeat(200),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(project.slug, "first-title");

        let updated = workflow
            .update(
                &project.id,
                UpdateProject {
                    title: "Second Title".to_string(),
                    description: "short now".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "second-title");
        assert_eq!(updated.excerpt, "short now");

        // No notification on update
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_cover_blob() {
        let (db, _temp, media) = setup().await;
        let notifier = LogNotifier;
        let workflow = ProjectWorkflow::new(&db, &media, &notifier, "operator@example.com");

        let project = workflow
            .create(
                NewProject {
                    title: "Covered".to_string(),
                    ..Default::default()
                },
                Some(CoverImage {
                    file_name: "old.png".to_string(),
                    bytes: b"old".to_vec(),
                }),
            )
            .await
            .unwrap();
        let old_path = project.cover_image.clone().unwrap();

        let updated = workflow
            .update(
                &project.id,
                UpdateProject {
                    title: "Covered".to_string(),
                    ..Default::default()
                },
                Some(CoverImage {
                    file_name: "new.jpg".to_string(),
                    bytes: b"new".to_vec(),
                }),
            )
            .await
            .unwrap();
        let new_path = updated.cover_image.unwrap();

        assert_ne!(old_path, new_path);
        assert!(!media.exists(&old_path), "Old blob should be deleted");
        assert_eq!(std::fs::read(media.resolve(&new_path)).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_update_unknown_project() {
        let (db, _temp, media) = setup().await;
        let workflow = ProjectWorkflow::new(&db, &media, &LogNotifier, "operator@example.com");

        let result = workflow
            .update(
                "no-such-id",
                UpdateProject {
                    title: "X".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_destroy_removes_join_rows_and_row() {
        let (db, _temp, media) = setup().await;
        let workflow = ProjectWorkflow::new(&db, &media, &LogNotifier, "operator@example.com");

        let tech = crate::catalog::Technology::new("Rust");
        crate::catalog::TechnologyRepository::new(&db)
            .create(&tech)
            .await
            .unwrap();

        let project = workflow
            .create(
                NewProject {
                    title: "Doomed".to_string(),
                    technologies: Some(vec![tech.id.clone()]),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        workflow.destroy(&project.id).await.unwrap();

        assert!(workflow.get(&project.id).await.unwrap().is_none());
        let join_count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_technology WHERE project_id = ?")
                .bind(&project.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(join_count.0, 0);
    }
}
