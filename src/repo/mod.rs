/// Repository module
///
/// This module provides the data access layer for the blog. Write
/// functions back the admin tool; read functions assemble the enriched rows
/// each page renders, with a bounded number of queries per page.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod user_repo;
mod tag_repo;
mod post_repo;
mod comment_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use tag_repo::*;
pub use post_repo::*;
pub use comment_repo::*;
