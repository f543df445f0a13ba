use anyhow::Result;
use blog::db::DbPool;
use blog::repo;
use clap::Subcommand;

use crate::output::{self, OutputConfig};

/// User management commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// Unique username
        #[clap(long)]
        username: String,
    },
    /// List all users
    List,
}

/// Executes a user command
pub fn execute(pool: &DbPool, cmd: UserCommands, config: &OutputConfig) -> Result<()> {
    match cmd {
        UserCommands::Create { username } => {
            let user = repo::create_user(pool, username)?;
            output::print_user(&user, config);
        }
        UserCommands::List => {
            let users = repo::list_users(pool)?;
            output::print_users(&users, config);
        }
    }
    Ok(())
}
