//! Post repository - reads posts from the posts directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::{post_stem, POST_EXTENSION};
use super::{FrontMatter, Post, PostSummary};
use crate::error::{BlogError, Result};

/// Reads posts from a flat directory of `.mdx` files.
///
/// Nothing is cached: every call goes back to disk.
#[derive(Debug, Clone)]
pub struct PostRepository {
    posts_dir: PathBuf,
}

impl PostRepository {
    pub fn new<P: Into<PathBuf>>(posts_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    /// Front-matter of every post, in directory enumeration order.
    ///
    /// One unreadable or malformed file fails the whole listing.
    pub fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.posts_dir.clone());
                BlogError::io(path, io::Error::from(e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = post_stem(path) else {
                continue;
            };

            let content = fs::read_to_string(path).map_err(|e| BlogError::io(path, e))?;
            let (fm, _) = FrontMatter::parse(&content)
                .map_err(|e| BlogError::parse(path, e.to_string()))?;
            posts.push(PostSummary::new(fm.into_metadata(), stem));
        }

        tracing::debug!("Listed {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Load `<slug>.mdx`. `Ok(None)` when no such file exists.
    ///
    /// The lookup never consults front-matter `slug` fields.
    pub fn get_post(&self, slug: &str) -> Result<Option<Post>> {
        let Some(path) = self.post_path(slug) else {
            tracing::debug!("Rejected slug {:?}", slug);
            return Ok(None);
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BlogError::io(path, e)),
        };

        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| BlogError::parse(&path, e.to_string()))?;
        let body = body.to_string();

        Ok(Some(Post::new(slug.to_string(), fm.into_metadata(), body, path)))
    }

    /// Path of the file a slug names, if it can name one inside the directory
    fn post_path(&self, slug: &str) -> Option<PathBuf> {
        if slug.is_empty() || slug.contains(['/', '\\', '\0']) {
            return None;
        }
        Some(self.posts_dir.join(format!("{}.{}", slug, POST_EXTENSION)))
    }
}
