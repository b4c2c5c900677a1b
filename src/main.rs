//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::content::Collection;
use folio::Site;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A markdown-driven blog and project portfolio generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which collection a command works on
#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Post,
    Project,
}

impl From<Kind> for Collection {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Post => Collection::Posts,
            Kind::Project => Collection::Projects,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or project
    New {
        /// Kind of content to create
        #[arg(short, long, value_enum, default_value = "post")]
        kind: Kind,

        /// Title of the new entry
        title: String,
    },

    /// List site content
    List {
        /// Type of content to list (posts, projects, categories, tags)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Print the table of contents of a post or project
    Toc {
        /// Slug (file name without .md)
        slug: String,

        /// Look the slug up among projects instead of posts
        #[arg(short, long)]
        project: bool,
    },

    /// Fuzzy-search blog posts
    Search {
        /// Search query
        query: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Regenerate and refresh content when files change
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug { "folio=debug,info" } else { "folio=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { kind, title } => {
            let site = Site::new(&base_dir)?;
            folio::commands::new::run(&site, &title, kind.into())?;
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Toc { slug, project } => {
            let site = Site::new(&base_dir)?;
            let collection = if project {
                Collection::Projects
            } else {
                Collection::Posts
            };
            folio::commands::toc::run(&site, &slug, collection)?;
        }

        Commands::Search { query } => {
            let site = Site::new(&base_dir)?;
            folio::commands::search::run(&site, &query)?;
        }

        Commands::Generate { watch } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || folio::commands::generate::watch(&site, || {}))
                    .await??;
            }
        }

        Commands::Server { port, ip, watch } => {
            let site = Site::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&site, &ip, port, watch).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
