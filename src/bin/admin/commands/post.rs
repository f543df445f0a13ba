use anyhow::{anyhow, Result};
use blog::db::DbPool;
use blog::dto::{NewPostDto, PostUpdateDto};
use blog::repo;
use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::output::{self, OutputConfig};

/// Post management commands
#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// Publish a new post
    Create {
        /// Headline of the post
        #[clap(long)]
        title: String,
        /// Body of the post
        #[clap(long)]
        text: String,
        /// Username of the author
        #[clap(long)]
        author: String,
        /// URL slug; derived from the title when omitted
        #[clap(long)]
        slug: Option<String>,
        /// Image path relative to the media root
        #[clap(long)]
        image: Option<String>,
        /// Publication time in RFC 3339; now when omitted
        #[clap(long)]
        published_at: Option<DateTime<Utc>>,
        /// Existing tag to attach (repeatable)
        #[clap(long = "tag")]
        tags: Vec<String>,
    },
    /// List all posts, newest first
    List,
    /// Show a post with its tags, likes and comments
    Show {
        /// The post slug
        slug: String,
    },
    /// Edit the fields of a post
    Edit {
        /// The post slug
        slug: String,
        /// New headline; the slug is kept
        #[clap(long)]
        title: Option<String>,
        /// New body
        #[clap(long)]
        text: Option<String>,
        /// New URL slug
        #[clap(long = "slug")]
        new_slug: Option<String>,
        /// New image path relative to the media root
        #[clap(long, conflicts_with = "clear_image")]
        image: Option<String>,
        /// Remove the post's image
        #[clap(long)]
        clear_image: bool,
        /// New publication time in RFC 3339
        #[clap(long)]
        published_at: Option<DateTime<Utc>>,
    },
    /// Delete a post with its comments and likes
    Delete {
        /// The post slug
        slug: String,
    },
    /// Attach a tag to a post
    Tag {
        /// The post slug
        slug: String,
        /// The tag title
        title: String,
    },
    /// Detach a tag from a post
    Untag {
        /// The post slug
        slug: String,
        /// The tag title
        title: String,
    },
    /// Record that a user likes a post
    Like {
        /// The post slug
        slug: String,
        /// The liking user
        username: String,
    },
    /// Withdraw a like
    Unlike {
        /// The post slug
        slug: String,
        /// The user withdrawing the like
        username: String,
    },
}

/// Executes a post command
pub fn execute(pool: &DbPool, cmd: PostCommands, config: &OutputConfig) -> Result<()> {
    match cmd {
        PostCommands::Create {
            title,
            text,
            author,
            slug,
            image,
            published_at,
            tags,
        } => {
            let dto = NewPostDto {
                title,
                slug,
                text,
                image,
                published_at,
                author,
                tags,
            };
            let post = repo::create_post(pool, dto)?;
            output::print_post(&post, config);
        }
        PostCommands::List => {
            let posts = repo::list_posts(pool)?;
            output::print_posts(&posts, config);
        }
        PostCommands::Show { slug } => {
            let details = repo::get_post_details(pool, &slug)?
                .ok_or_else(|| anyhow!("Post '{}' not found", slug))?;
            output::print_post_details(&details, config);
        }
        PostCommands::Edit {
            slug,
            title,
            text,
            new_slug,
            image,
            clear_image,
            published_at,
        } => {
            let dto = PostUpdateDto {
                title,
                slug: new_slug,
                text,
                image: if clear_image { Some(None) } else { image.map(Some) },
                published_at,
            };
            let post = repo::update_post(pool, &slug, dto)?;
            output::print_post(&post, config);
        }
        PostCommands::Delete { slug } => {
            repo::delete_post(pool, &slug)?;
            output::print_success(&format!("Deleted post {}", slug), config);
        }
        PostCommands::Tag { slug, title } => {
            repo::add_tag_to_post(pool, &slug, &title)?;
            output::print_success(&format!("Tagged post {} with {}", slug, title), config);
        }
        PostCommands::Untag { slug, title } => {
            repo::remove_tag_from_post(pool, &slug, &title)?;
            output::print_success(&format!("Removed tag {} from post {}", title, slug), config);
        }
        PostCommands::Like { slug, username } => {
            repo::like_post(pool, &slug, &username)?;
            output::print_success(&format!("{} likes {}", username, slug), config);
        }
        PostCommands::Unlike { slug, username } => {
            repo::unlike_post(pool, &slug, &username)?;
            output::print_success(&format!("{} no longer likes {}", username, slug), config);
        }
    }
    Ok(())
}
