//! Project repository
//!
//! Row CRUD for projects plus the join-table operations the workflow uses to
//! attach, detach, and synchronize technology tags.

use super::Project;
use crate::storage::Database;
use crate::Result;
use chrono::Utc;
use sqlx::Row;
use std::collections::HashSet;

/// Project repository for database operations
pub struct ProjectRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new project row
    pub async fn create(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, slug, description, excerpt, cover_image, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.excerpt)
        .bind(&project.cover_image)
        .bind(&project.category_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a project by ID
    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(
            "SELECT id, title, slug, description, excerpt, cover_image, category_id, created_at, updated_at FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(row_to_project))
    }

    /// List all projects.
    ///
    /// The full set, no pagination or explicit ordering: rows come back in
    /// insertion order under SQLite's default rowid scan.
    pub async fn list(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT id, title, slug, description, excerpt, cover_image, category_id, created_at, updated_at FROM projects",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_project).collect())
    }

    /// Apply field updates to a project row
    pub async fn update(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, slug = ?, description = ?, excerpt = ?, cover_image = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.excerpt)
        .bind(&project.cover_image)
        .bind(&project.category_id)
        .bind(Utc::now())
        .bind(&project.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a project row
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a project exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Get the attached technology ids for a project, sorted for determinism
    pub async fn technology_ids(&self, project_id: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT technology_id FROM project_technology WHERE project_id = ? ORDER BY technology_id",
        )
        .bind(project_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Attach the given technology ids to a project.
    ///
    /// No existence check is made; an unknown id surfaces as a foreign-key
    /// failure from the database.
    pub async fn attach_technologies(&self, project_id: &str, ids: &[String]) -> Result<()> {
        for technology_id in ids {
            sqlx::query(
                "INSERT INTO project_technology (project_id, technology_id) VALUES (?, ?)",
            )
            .bind(project_id)
            .bind(technology_id)
            .execute(self.db.pool())
            .await?;
        }

        Ok(())
    }

    /// Detach the given technology ids from a project
    pub async fn detach_technologies(&self, project_id: &str, ids: &[String]) -> Result<()> {
        for technology_id in ids {
            sqlx::query(
                "DELETE FROM project_technology WHERE project_id = ? AND technology_id = ?",
            )
            .bind(project_id)
            .bind(technology_id)
            .execute(self.db.pool())
            .await?;
        }

        Ok(())
    }

    /// Remove all join rows for a project
    pub async fn detach_all(&self, project_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM project_technology WHERE project_id = ?")
            .bind(project_id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Replace the attached technology set with the requested one.
    ///
    /// Works on the symmetric difference: ids no longer requested are
    /// detached, newly requested ids are attached, ids present on both sides
    /// are left untouched.
    pub async fn sync_technologies(&self, project_id: &str, requested: &[String]) -> Result<()> {
        let current: HashSet<String> = self.technology_ids(project_id).await?.into_iter().collect();
        let wanted: HashSet<String> = requested.iter().cloned().collect();

        let to_detach: Vec<String> = current.difference(&wanted).cloned().collect();
        let to_attach: Vec<String> = wanted.difference(&current).cloned().collect();

        tracing::debug!(
            project_id = %project_id,
            detached = to_detach.len(),
            attached = to_attach.len(),
            kept = current.intersection(&wanted).count(),
            "Synchronizing technology set"
        );

        self.detach_technologies(project_id, &to_detach).await?;
        self.attach_technologies(project_id, &to_attach).await?;

        Ok(())
    }
}

/// Convert a database row to a Project
fn row_to_project(row: sqlx::sqlite::SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        excerpt: row.get("excerpt"),
        cover_image: row.get("cover_image"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
