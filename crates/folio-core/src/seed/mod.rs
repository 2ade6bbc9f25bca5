//! Sample-data seeding
//!
//! Fills the database with generated projects plus a default catalog, for
//! demos and local development. The seeder writes through the repositories
//! directly and dispatches no notifications.

use crate::catalog::{Category, CategoryRepository, Technology, TechnologyRepository};
use crate::projects::workflow::{excerpt, slugify};
use crate::projects::{Project, ProjectRepository};
use crate::storage::Database;
use crate::Result;
use rand::seq::SliceRandom;
use rand::Rng;

const DEFAULT_CATEGORIES: &[&str] = &["Web", "Mobile", "Data", "Tooling"];

const DEFAULT_TECHNOLOGIES: &[&str] = &[
    "Rust", "Tokio", "SQLite", "PostgreSQL", "Axum", "React", "Vue", "TypeScript",
];

const TITLE_WORDS: &[&str] = &[
    "Aurora", "Compass", "Drift", "Ember", "Falcon", "Granite", "Harbor", "Lumen",
    "Meridian", "Nimbus", "Orbit", "Prairie", "Quartz", "Relay", "Summit", "Tundra",
];

const SENTENCES: &[&str] = &[
    "Built to showcase a clean separation between storage and workflow layers.",
    "A small production system that grew out of a weekend prototype.",
    "Focused on fast iteration with a minimal operational footprint.",
    "Ships with batteries included and a boring, dependable deployment story.",
    "Designed around explicit inputs and a fully synchronous request path.",
    "An exploration of how far a single binary can carry a product.",
];

/// Summary of what a seeding run created
#[derive(Debug, Clone, Copy)]
pub struct SeedReport {
    pub projects: usize,
    pub categories: usize,
    pub technologies: usize,
}

/// Pre-drawn random values for one sample project
struct SeedSample {
    title: String,
    description: String,
    category_id: Option<String>,
    technology_ids: Vec<String>,
}

/// Seed the database with a default catalog and `count` sample projects
pub async fn run(db: &Database, count: usize) -> Result<SeedReport> {
    let category_ids = ensure_categories(db).await?;
    let technology_ids = ensure_technologies(db).await?;

    let repo = ProjectRepository::new(db);

    // Draw all random values up front; the rng does not cross an await
    let samples: Vec<SeedSample> = {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let tag_count = rng.gen_range(1..=3);
                SeedSample {
                    title: random_title(&mut rng),
                    description: random_description(&mut rng),
                    category_id: category_ids.choose(&mut rng).cloned(),
                    technology_ids: technology_ids
                        .choose_multiple(&mut rng, tag_count)
                        .cloned()
                        .collect(),
                }
            })
            .collect()
    };

    for sample in samples {
        let mut project = Project::new(
            sample.title.clone(),
            slugify(&sample.title),
            sample.description.clone(),
            excerpt(&sample.description),
        );
        project.category_id = sample.category_id;
        repo.create(&project).await?;
        repo.attach_technologies(&project.id, &sample.technology_ids)
            .await?;
    }

    tracing::info!(projects = count, "Seeded sample data");

    Ok(SeedReport {
        projects: count,
        categories: category_ids.len(),
        technologies: technology_ids.len(),
    })
}

/// Create the default categories that do not exist yet; return all ids
async fn ensure_categories(db: &Database) -> Result<Vec<String>> {
    let repo = CategoryRepository::new(db);
    let mut ids = Vec::with_capacity(DEFAULT_CATEGORIES.len());

    for name in DEFAULT_CATEGORIES {
        let id = match repo.get_by_name(name).await? {
            Some(existing) => existing.id,
            None => {
                let category = Category::new(*name);
                repo.create(&category).await?;
                category.id
            }
        };
        ids.push(id);
    }

    Ok(ids)
}

/// Create the default technologies that do not exist yet; return all ids
async fn ensure_technologies(db: &Database) -> Result<Vec<String>> {
    let repo = TechnologyRepository::new(db);
    let mut ids = Vec::with_capacity(DEFAULT_TECHNOLOGIES.len());

    for name in DEFAULT_TECHNOLOGIES {
        let id = match repo.get_by_name(name).await? {
            Some(existing) => existing.id,
            None => {
                let technology = Technology::new(*name);
                repo.create(&technology).await?;
                technology.id
            }
        };
        ids.push(id);
    }

    Ok(ids)
}

fn random_title(rng: &mut impl Rng) -> String {
    let words: Vec<&str> = TITLE_WORDS.choose_multiple(rng, 3).cloned().collect();
    words.join(" ")
}

fn random_description(rng: &mut impl Rng) -> String {
    let sentences: Vec<&str> = SENTENCES.choose_multiple(rng, 2).cloned().collect();
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_projects_with_tags() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        let report = run(&db, 5).await.unwrap();
        assert_eq!(report.projects, 5);
        assert_eq!(report.categories, DEFAULT_CATEGORIES.len());
        assert_eq!(report.technologies, DEFAULT_TECHNOLOGIES.len());

        let repo = ProjectRepository::new(&db);
        let projects = repo.list().await.unwrap();
        assert_eq!(projects.len(), 5);

        for project in &projects {
            assert_eq!(project.slug, slugify(&project.title));
            assert!(!repo.technology_ids(&project.id).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_seed_is_rerunnable() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        run(&db, 2).await.unwrap();
        run(&db, 2).await.unwrap();

        // Catalog is reused, projects accumulate
        let projects = ProjectRepository::new(&db).list().await.unwrap();
        assert_eq!(projects.len(), 4);

        let categories = CategoryRepository::new(&db).list_all().await.unwrap();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    }
}
