mod commands;
mod output;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use blog::config::{self, ConfigUpdate};
use blog::{db, run_migrations};
use clap::{Parser, Subcommand};
use output::{OutputConfig, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Administration tool for the blog database
#[derive(Parser, Debug)]
#[clap(name = "blog-admin", about = "Manage users, posts, tags and comments of the blog")]
struct Cli {
    /// Path to a TOML configuration file
    #[clap(long, env = "BLOG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Database URL
    #[clap(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or slugs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(commands::user::UserCommands),
    /// Manage tags
    #[command(subcommand)]
    Tag(commands::tag::TagCommands),
    /// Manage posts, their tags and likes
    #[command(subcommand)]
    Post(commands::post::PostCommands),
    /// Manage comments
    #[command(subcommand)]
    Comment(commands::comment::CommentCommands),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigUpdate {
        database_url: cli.database_url,
        ..Default::default()
    };
    let config = config::load_config(cli.config, overrides);

    let pool = db::init_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }

    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::User(cmd) => commands::user::execute(&pool, cmd, &output_config),
        Commands::Tag(cmd) => commands::tag::execute(&pool, cmd, &output_config),
        Commands::Post(cmd) => commands::post::execute(&pool, cmd, &output_config),
        Commands::Comment(cmd) => commands::comment::execute(&pool, cmd, &output_config),
    }
}

fn main() {
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
