use anyhow::Result;
use blog::db::DbPool;
use blog::repo;
use clap::Subcommand;

use crate::output::{self, OutputConfig};

/// Comment management commands
#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Add a comment to a post
    Create {
        /// Slug of the commented post
        #[clap(long)]
        post: String,
        /// Username of the commenter
        #[clap(long)]
        author: String,
        /// The comment text
        #[clap(long)]
        text: String,
    },
    /// List comments, newest first
    List {
        /// Only show comments on this post
        #[clap(long)]
        post: Option<String>,
    },
    /// Replace the text of a comment
    Edit {
        /// The comment ID
        id: String,
        /// The new text
        #[clap(long)]
        text: String,
    },
    /// Delete a comment
    Delete {
        /// The comment ID
        id: String,
    },
}

/// Executes a comment command
pub fn execute(pool: &DbPool, cmd: CommentCommands, config: &OutputConfig) -> Result<()> {
    match cmd {
        CommentCommands::Create { post, author, text } => {
            let comment = repo::create_comment(pool, &post, &author, text)?;
            output::print_comment(&comment, config);
        }
        CommentCommands::List { post } => {
            let comments = repo::list_comments(pool, post.as_deref())?;
            output::print_comments(&comments, config);
        }
        CommentCommands::Edit { id, text } => {
            let comment = repo::update_comment(pool, &id, text)?;
            output::print_comment(&comment, config);
        }
        CommentCommands::Delete { id } => {
            repo::delete_comment(pool, &id)?;
            output::print_success(&format!("Deleted comment {}", id), config);
        }
    }
    Ok(())
}
