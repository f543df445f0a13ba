use blog::models::{Comment, CommentWithAuthor, Post, PostDetails, Tag, TagWithCount, User};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or slugs)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode output: {}", e),
    }
}

/// Prints a list of users in the specified format
pub fn print_users(users: &[User], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if users.is_empty() {
                if !config.quiet {
                    println!("No users found.");
                }
                return;
            }
            if config.quiet {
                for user in users {
                    println!("{}", user.get_id());
                }
                return;
            }
            let max_name = users.iter().map(|u| u.get_username().len()).max().unwrap_or(8);
            println!("{:<name_w$}  JOINED", "USERNAME", name_w = max_name.max(8));
            for user in users {
                println!(
                    "{:<name_w$}  {}",
                    user.get_username(),
                    user.get_created_at().format("%Y-%m-%d %H:%M"),
                    name_w = max_name.max(8),
                );
            }
        }
        OutputFormat::Json => print_json(users),
    }
}

/// Prints a single user in the specified format
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:       {}", user.get_id());
            println!("Username: {}", user.get_username());
            println!("Joined:   {}", user.get_created_at());
        }
        OutputFormat::Json => print_json(user),
    }
}

/// Prints tags with their post counts, most used first
pub fn print_tags(tags: &[TagWithCount], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if tags.is_empty() {
                if !config.quiet {
                    println!("No tags found.");
                }
                return;
            }
            if config.quiet {
                for entry in tags {
                    println!("{}", entry.tag.get_title());
                }
                return;
            }
            let max_title = tags.iter().map(|t| t.tag.title().len()).max().unwrap_or(5);
            println!("{:<title_w$}  POSTS", "TITLE", title_w = max_title.max(5));
            for entry in tags {
                println!(
                    "{:<title_w$}  {:>5}",
                    entry.tag.title(),
                    entry.posts_count,
                    title_w = max_title.max(5),
                );
            }
        }
        OutputFormat::Json => print_json(tags),
    }
}

/// Prints a single tag in the specified format
pub fn print_tag(tag: &Tag, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", tag.get_title());
                return;
            }
            println!("ID:    {}", tag.get_id());
            println!("Title: {}", tag.get_title());
        }
        OutputFormat::Json => print_json(tag),
    }
}

/// Prints a list of posts as title and publication time
pub fn print_posts(posts: &[Post], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if posts.is_empty() {
                if !config.quiet {
                    println!("No posts found.");
                }
                return;
            }
            if config.quiet {
                for post in posts {
                    println!("{}", post.get_slug());
                }
                return;
            }
            let max_title = posts.iter().map(|p| p.get_title().len()).max().unwrap_or(5);
            println!(
                "{:<16}  {:<title_w$}  SLUG",
                "PUBLISHED",
                "TITLE",
                title_w = max_title.max(5),
            );
            for post in posts {
                println!(
                    "{:<16}  {:<title_w$}  {}",
                    post.get_published_at().format("%Y-%m-%d %H:%M"),
                    post.get_title(),
                    post.get_slug(),
                    title_w = max_title.max(5),
                );
            }
        }
        OutputFormat::Json => print_json(posts),
    }
}

/// Prints a freshly created post
pub fn print_post(post: &Post, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", post.get_slug());
                return;
            }
            println!("ID:        {}", post.get_id());
            println!("Title:     {}", post.get_title());
            println!("Slug:      {}", post.get_slug());
            println!("Published: {}", post.get_published_at());
            if let Some(image) = post.get_image() {
                println!("Image:     {}", image);
            }
        }
        OutputFormat::Json => print_json(post),
    }
}

/// Prints a post with its tags, likes and comments
pub fn print_post_details(details: &PostDetails, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", details.post.get_slug());
                return;
            }
            let tags: Vec<&str> = details.tags.iter().map(|t| t.tag.title()).collect();
            println!("Title:     {}", details.post.get_title());
            println!("Slug:      {}", details.post.get_slug());
            println!("Author:    {}", details.author.get_username());
            println!("Published: {}", details.post.get_published_at());
            println!("Tags:      {}", tags.join(", "));
            println!("Likes:     {}", details.likes_count);
            println!("Comments:  {}", details.comments_count);
            println!();
            println!("{}", details.post.text());
            for entry in &details.comments {
                println!();
                println!(
                    "[{}] {}: {}",
                    entry.comment.get_published_at().format("%Y-%m-%d %H:%M"),
                    entry.author.get_username(),
                    entry.comment.get_text(),
                );
            }
        }
        OutputFormat::Json => print_json(details),
    }
}

/// Prints a list of comments as text and publication time
pub fn print_comments(comments: &[CommentWithAuthor], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if comments.is_empty() {
                if !config.quiet {
                    println!("No comments found.");
                }
                return;
            }
            if config.quiet {
                for entry in comments {
                    println!("{}", entry.comment.get_id());
                }
                return;
            }
            let max_id = comments.iter().map(|c| c.comment.get_id().len()).max().unwrap_or(2);
            println!("{:<id_w$}  {:<16}  {:<12}  TEXT", "ID", "PUBLISHED", "AUTHOR", id_w = max_id);
            for entry in comments {
                println!(
                    "{:<id_w$}  {:<16}  {:<12}  {}",
                    entry.comment.get_id(),
                    entry.comment.get_published_at().format("%Y-%m-%d %H:%M"),
                    entry.author.get_username(),
                    entry.comment.get_text(),
                    id_w = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(comments),
    }
}

/// Prints a single comment in the specified format
pub fn print_comment(comment: &Comment, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", comment.get_id());
                return;
            }
            println!("ID:        {}", comment.get_id());
            println!("Published: {}", comment.get_published_at());
            println!("Text:      {}", comment.get_text());
        }
        OutputFormat::Json => print_json(comment),
    }
}

/// Prints a simple success message (for operations that don't return data)
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({"status": "ok", "message": message})),
    }
}
