//! CLI entry point for mica

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mica")]
#[command(version)]
#[command(about = "A small static site generator for personal sites", long_about = None)]
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

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Create a standalone page instead of a post
        #[arg(short, long)]
        page: bool,

        /// Title of the new post or page
        title: String,
    },

    /// Build static files
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Include draft pages
        #[arg(long)]
        drafts: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mica=debug,info"
    } else {
        "mica=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            mica::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { page, title } => {
            let mica = mica::Mica::new(&base_dir)?;
            mica::commands::new::run(&mica, &title, page)?;
        }

        Commands::Build { watch, drafts } => {
            let mut mica = mica::Mica::new(&base_dir)?;
            if drafts {
                mica.config.render_drafts = true;
            }

            mica::commands::build::run(&mica)?;
            println!("Build complete.");

            if watch {
                mica::commands::build::watch(&mica).await?;
            }
        }

        Commands::Clean => {
            let mica = mica::Mica::new(&base_dir)?;
            mica.clean()?;
            println!("Cleaned.");
        }

        Commands::List { r#type } => {
            let mica = mica::Mica::new(&base_dir)?;
            mica::commands::list::run(&mica, &r#type)?;
        }

        Commands::Version => {
            println!("mica version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
