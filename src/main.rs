//! CLI entry point for spacetraveling-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spacetraveling-rs")]
#[command(version)]
#[command(about = "A statically generated blog front end for a headless content repository", long_about = None)]
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

    /// Generate static files from the content repository
    #[command(alias = "g")]
    Generate,

    /// Start a local server with revalidation
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// List posts from the content repository
    List {
        /// How many extra pages to follow after the first
        #[arg(long, default_value = "0")]
        pages: usize,

        /// Follow the cursor until the repository reports no more pages
        #[arg(long)]
        all: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "spacetraveling_rs=debug,info"
    } else {
        "spacetraveling_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            spacetraveling_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Generate => {
            let app = spacetraveling_rs::Spacetraveling::new(&base_dir)?;
            tracing::info!("Generating static files...");
            app.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let app = spacetraveling_rs::Spacetraveling::new(&base_dir)?;

            // Generate first, then serve with revalidation
            tracing::info!("Generating static files...");
            app.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            spacetraveling_rs::server::start(&app, &ip, port).await?;
        }

        Commands::Clean => {
            let app = spacetraveling_rs::Spacetraveling::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { pages, all } => {
            let app = spacetraveling_rs::Spacetraveling::new(&base_dir)?;
            spacetraveling_rs::commands::list::run(&app, pages, all).await?;
        }

        Commands::Version => {
            println!("spacetraveling-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
