//! CLI entry point for campusify-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campusify_site::commands::fetch::Output;

#[derive(Parser)]
#[command(name = "campusify")]
#[command(version)]
#[command(about = "Front end for the Campusify headless WordPress site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Content API base, e.g. https://example.com/wp-json/wp/v2
    #[arg(long, global = true, env = "CONTENT_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Fetch a page and print its sanitized body
    Fetch {
        /// Slug of the page
        slug: String,

        /// Print the body as returned by the API
        #[arg(long, conflicts_with = "meta")]
        raw: bool,

        /// Print page and SEO metadata as JSON
        #[arg(long)]
        meta: bool,
    },

    /// List pages published upstream
    List,

    /// Print the paths the site serves
    Paths,

    /// Sanitize HTML from a file or stdin
    Sanitize {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "campusify_site=debug,campusify=debug,tower_http=debug,info"
    } else {
        "campusify_site=info,campusify=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let load_site = || -> Result<campusify_site::Site> {
        let mut site = campusify_site::Site::new(&base_dir)?;
        if let Some(api_base) = cli.api_base.as_deref() {
            site.set_api_base(api_base);
        }
        site.config.validate()?;
        Ok(site)
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = load_site()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            site.serve(&ip, port).await?;
        }

        Commands::Fetch { slug, raw, meta } => {
            let site = load_site()?;
            let output = if raw {
                Output::Raw
            } else if meta {
                Output::Meta
            } else {
                Output::Sanitized
            };
            campusify_site::commands::fetch::run(&site, &slug, output).await?;
        }

        Commands::List => {
            let site = load_site()?;
            campusify_site::commands::list::run(&site).await?;
        }

        Commands::Paths => {
            let site = load_site()?;
            campusify_site::commands::paths::run(&site).await?;
        }

        Commands::Sanitize { file } => {
            let site = load_site()?;
            campusify_site::commands::sanitize::run(&site, file.as_deref())?;
        }

        Commands::Version => {
            println!("campusify-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
