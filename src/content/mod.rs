//! Content module - front-matter, post models and the post repository

mod frontmatter;
mod post;
pub mod repository;

pub use frontmatter::{FrontMatter, FrontMatterError, Metadata};
pub use post::{Post, PostSummary, POST_EXTENSION};
pub use repository::PostRepository;
