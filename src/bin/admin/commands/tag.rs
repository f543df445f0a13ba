use anyhow::Result;
use blog::db::DbPool;
use blog::repo;
use clap::Subcommand;

use crate::output::{self, OutputConfig};

/// Tag management commands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Create a new tag
    Create {
        /// Unique title of the tag
        #[clap(long)]
        title: String,
    },
    /// List all tags, most used first
    List,
    /// Rename a tag, keeping its posts
    Rename {
        /// The current title
        title: String,
        /// The new title
        new_title: String,
    },
    /// Delete a tag and unlink it from its posts
    Delete {
        /// The tag title
        title: String,
    },
}

/// Executes a tag command
pub fn execute(pool: &DbPool, cmd: TagCommands, config: &OutputConfig) -> Result<()> {
    match cmd {
        TagCommands::Create { title } => {
            let tag = repo::create_tag(pool, title)?;
            output::print_tag(&tag, config);
        }
        TagCommands::List => {
            let tags = repo::popular_tags(pool, i64::MAX)?;
            output::print_tags(&tags, config);
        }
        TagCommands::Rename { title, new_title } => {
            let tag = repo::rename_tag(pool, &title, new_title)?;
            output::print_tag(&tag, config);
        }
        TagCommands::Delete { title } => {
            repo::delete_tag(pool, &title)?;
            output::print_success(&format!("Deleted tag {}", title), config);
        }
    }
    Ok(())
}
