//! CLI entry point for mdx-blog-api

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdx_blog_api::config::RenderMode;
use mdx_blog_api::BlogApi;

#[derive(Parser)]
#[command(name = "mdx-blog-api")]
#[command(version)]
#[command(about = "Serve a directory of MDX posts over HTTP", long_about = None)]
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
    /// Start the API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,

        /// Directory holding the .mdx posts
        #[arg(long)]
        posts_dir: Option<String>,

        /// Return raw MDX or compiled code from /posts/:slug
        #[arg(short, long, value_enum)]
        render: Option<RenderMode>,
    },

    /// List posts
    List {
        /// Print the JSON the listing endpoint returns
        #[arg(long)]
        json: bool,
    },

    /// Print a single post as the API would return it
    Show {
        /// Post slug (file name without .mdx)
        slug: String,

        /// Return raw MDX or compiled code
        #[arg(short, long, value_enum)]
        render: Option<RenderMode>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdx_blog_api=debug,info"
    } else {
        "mdx_blog_api=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the working directory")?,
    };
    let mut config = BlogApi::load_config(&base_dir)?;

    match cli.command {
        Commands::Server {
            port,
            ip,
            posts_dir,
            render,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(ip) = ip {
                config.ip = ip;
            }
            if let Some(posts_dir) = posts_dir {
                config.posts_dir = posts_dir;
            }
            if let Some(render) = render {
                config.render = render;
            }

            let api = BlogApi::with_config(&base_dir, config);
            tracing::info!("Starting server at http://{}:{}", api.config.ip, api.config.port);
            mdx_blog_api::server::start(&api, &api.config.ip, api.config.port).await?;
        }

        Commands::List { json } => {
            let api = BlogApi::with_config(&base_dir, config);
            mdx_blog_api::commands::list::run(&api, json)?;
        }

        Commands::Show { slug, render } => {
            if let Some(render) = render {
                config.render = render;
            }
            let api = BlogApi::with_config(&base_dir, config);
            mdx_blog_api::commands::show::run(&api, &slug)?;
        }

        Commands::Version => {
            println!("mdx-blog-api version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
