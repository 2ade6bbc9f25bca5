//! Folio CLI - portfolio back-office administration

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_core::catalog::{Category, CategoryRepository, Technology, TechnologyRepository};
use folio_core::config::Config;
use folio_core::media::MediaStore;
use folio_core::notify::{HttpNotifier, LogNotifier, Notifier};
use folio_core::projects::{CoverImage, NewProject, Project, ProjectWorkflow, UpdateProject};
use folio_core::seed;
use folio_core::storage::{Database, DatabaseConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Portfolio back-office administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage technologies
    Technologies {
        #[command(subcommand)]
        action: TechnologyAction,
    },

    /// Fill the database with sample data
    Seed {
        /// Number of sample projects to create
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List all projects
    List,
    /// Show project details
    Show { id: String },
    /// Create a new project
    Create {
        /// Project title
        title: String,
        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Category id
        #[arg(long)]
        category: Option<String>,
        /// Technology ids to attach (repeatable)
        #[arg(short, long = "tech")]
        technologies: Vec<String>,
        /// Cover image file to upload
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Update a project
    Update {
        id: String,
        /// New title (kept when omitted)
        #[arg(long)]
        title: Option<String>,
        /// New description (kept when omitted)
        #[arg(short, long)]
        description: Option<String>,
        /// New category id
        #[arg(long)]
        category: Option<String>,
        /// Replacement technology ids (repeatable; omit to leave untouched)
        #[arg(short, long = "tech")]
        technologies: Option<Vec<String>>,
        /// Replacement cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Delete a project
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List all categories
    List,
    /// Add a category
    Add { name: String },
}

#[derive(Subcommand)]
enum TechnologyAction {
    /// List all technologies
    List,
    /// Add a technology
    Add { name: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
}

/// Opened collaborators shared by the commands
struct App {
    config: Config,
    db: Database,
    media: MediaStore,
    notifier: Box<dyn Notifier>,
}

impl App {
    async fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;

        let db = Database::new(DatabaseConfig::with_path(config.database_path()))
            .await
            .context("Failed to open database")?;
        let media =
            MediaStore::open(config.media_root()).context("Failed to open media store")?;

        let notifier: Box<dyn Notifier> = match &config.notify.endpoint {
            Some(endpoint) => Box::new(HttpNotifier::new(
                endpoint.clone(),
                Duration::from_secs(config.notify.timeout_secs),
            )?),
            None => Box::new(LogNotifier),
        };

        Ok(Self {
            config,
            db,
            media,
            notifier,
        })
    }

    fn workflow(&self) -> ProjectWorkflow<'_> {
        ProjectWorkflow::new(
            &self.db,
            &self.media,
            self.notifier.as_ref(),
            self.config.notify.operator_email.clone(),
        )
    }
}

fn read_cover(path: Option<PathBuf>) -> anyhow::Result<Option<CoverImage>> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read cover image: {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Some(CoverImage { file_name, bytes }))
        }
        None => Ok(None),
    }
}

fn print_project(project: &Project, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(project)?),
        OutputFormat::Text => {
            println!("{}  {}  [{}]", project.id, project.title, project.slug);
            if !project.excerpt.is_empty() {
                println!("    {}", project.excerpt);
            }
            if let Some(cover) = &project.cover_image {
                println!("    cover: {}", cover);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Projects { action } => run_project_action(action, cli.format).await,
        Commands::Categories { action } => run_category_action(action, cli.format).await,
        Commands::Technologies { action } => run_technology_action(action, cli.format).await,
        Commands::Seed { count } => {
            let app = App::open().await?;
            let count = count.unwrap_or(app.config.seed.count);
            let report = seed::run(&app.db, count).await?;
            println!(
                "Seeded {} projects ({} categories, {} technologies).",
                report.projects, report.categories, report.technologies
            );
            Ok(())
        }
        Commands::Config { action } => run_config_action(action),
        Commands::Doctor => {
            let app = App::open().await?;
            app.db.health_check().await?;
            let status = app.db.migration_status().await?;
            println!("Database: ok ({})", app.db.path().display());
            println!(
                "Schema: v{} (target v{}){}",
                status.current_version,
                status.target_version,
                if status.needs_migration {
                    " - migration needed"
                } else {
                    ""
                }
            );
            println!("Media root: {}", app.media.root().display());
            println!(
                "Notifications: {}",
                app.config
                    .notify
                    .endpoint
                    .as_deref()
                    .unwrap_or("logged only (no endpoint configured)")
            );
            Ok(())
        }
    }
}

async fn run_project_action(action: ProjectAction, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let workflow = app.workflow();

    match action {
        ProjectAction::List => {
            let projects = workflow.list().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                for project in &projects {
                    print_project(project, format)?;
                }
                println!("{} project(s).", projects.len());
            }
        }
        ProjectAction::Show { id } => {
            let project = workflow
                .get(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Project '{}' not found", id))?;
            print_project(&project, format)?;
        }
        ProjectAction::Create {
            title,
            description,
            category,
            technologies,
            cover,
        } => {
            let input = NewProject {
                title,
                description,
                category_id: category,
                technologies: if technologies.is_empty() {
                    None
                } else {
                    Some(technologies)
                },
            };
            let project = workflow.create(input, read_cover(cover)?).await?;
            print_project(&project, format)?;
            println!("Project created.");
        }
        ProjectAction::Update {
            id,
            title,
            description,
            category,
            technologies,
            cover,
        } => {
            let existing = workflow
                .get(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Project '{}' not found", id))?;
            let input = UpdateProject {
                title: title.unwrap_or(existing.title),
                description: description.unwrap_or(existing.description),
                category_id: category.or(existing.category_id),
                technologies,
            };
            let project = workflow.update(&id, input, read_cover(cover)?).await?;
            print_project(&project, format)?;
            println!("Project updated.");
        }
        ProjectAction::Delete { id } => {
            workflow.destroy(&id).await?;
            println!("Project deleted.");
        }
    }

    Ok(())
}

async fn run_category_action(action: CategoryAction, format: OutputFormat) -> anyhow::Result<()> {
    let app = App::open().await?;
    let repo = CategoryRepository::new(&app.db);

    match action {
        CategoryAction::List => {
            let categories = repo.list_all().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                for category in &categories {
                    println!("{}  {}", category.id, category.name);
                }
                println!("{} categor(ies).", categories.len());
            }
        }
        CategoryAction::Add { name } => {
            let category = Category::new(name);
            repo.create(&category).await?;
            println!("{}  {}", category.id, category.name);
        }
    }

    Ok(())
}

async fn run_technology_action(
    action: TechnologyAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::open().await?;
    let repo = TechnologyRepository::new(&app.db);

    match action {
        TechnologyAction::List => {
            let technologies = repo.list_all().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&technologies)?);
            } else {
                for technology in &technologies {
                    println!("{}  {}", technology.id, technology.name);
                }
                println!("{} technolog(ies).", technologies.len());
            }
        }
        TechnologyAction::Add { name } => {
            let technology = Technology::new(name);
            repo.create(&technology).await?;
            println!("{}  {}", technology.id, technology.name);
        }
    }

    Ok(())
}

fn run_config_action(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            println!("Configuration reset to defaults.");
        }
    }

    Ok(())
}
