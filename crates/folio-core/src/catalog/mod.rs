//! Catalog of categories and technologies
//!
//! Categories and technologies are lookup data: the back-office lists them to
//! populate forms and the seeder creates them. Projects reference categories
//! by id and technologies through the join table.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

/// A project category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique category identifier
    pub id: String,
    /// Category name
    pub name: String,
    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A technology tag attachable to projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    /// Unique technology identifier
    pub id: String,
    /// Technology name
    pub name: String,
    /// When the technology was created
    pub created_at: DateTime<Utc>,
}

impl Technology {
    /// Create a new technology with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Category repository for database operations
pub struct CategoryRepository<'a> {
    db: &'a Database,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new category in the database
    pub async fn create(&self, category: &Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Get a category by ID
    pub async fn get(&self, id: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_category))
    }

    /// Get a category by name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_category))
    }

    /// List all categories, sorted by name
    pub async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_category).collect())
    }
}

/// Technology repository for database operations
pub struct TechnologyRepository<'a> {
    db: &'a Database,
}

impl<'a> TechnologyRepository<'a> {
    /// Create a new technology repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new technology in the database
    pub async fn create(&self, technology: &Technology) -> Result<()> {
        sqlx::query("INSERT INTO technologies (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&technology.id)
            .bind(&technology.name)
            .bind(technology.created_at)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Get a technology by ID
    pub async fn get(&self, id: &str) -> Result<Option<Technology>> {
        let row = sqlx::query("SELECT id, name, created_at FROM technologies WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_technology))
    }

    /// Get a technology by name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Technology>> {
        let row = sqlx::query("SELECT id, name, created_at FROM technologies WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_technology))
    }

    /// List all technologies, sorted by name
    pub async fn list_all(&self) -> Result<Vec<Technology>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM technologies ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_technology).collect())
    }
}

fn row_to_category(row: sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn row_to_technology(row: sqlx::sqlite::SqliteRow) -> Technology {
    Technology {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}
