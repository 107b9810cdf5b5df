//! mdx-blog-api: a small HTTP API over a directory of MDX posts
//!
//! Posts are `<slug>.mdx` files with a YAML front-matter block. The API lists
//! their front-matter and serves single posts either as raw MDX or compiled to
//! a JavaScript function body, depending on the configured render mode.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{PostRepository, PostSummary};
use error::BlogError;
use render::{PostResponse, Renderer};

/// Name of the optional configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The blog API application
#[derive(Clone)]
pub struct BlogApi {
    /// API configuration
    pub config: config::ApiConfig,
    /// Posts directory, resolved once at startup
    pub posts_dir: PathBuf,
}

impl BlogApi {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = Self::load_config(base_dir.as_ref())?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already-built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::ApiConfig) -> Self {
        let posts_dir = config.posts_path(base_dir.as_ref());
        Self { config, posts_dir }
    }

    /// Load `_config.yml` from the base directory, or defaults
    pub fn load_config(base_dir: &Path) -> Result<config::ApiConfig> {
        let config_path = base_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::ApiConfig::load(&config_path)
        } else {
            Ok(config::ApiConfig::default())
        }
    }

    /// Repository over the posts directory
    pub fn repository(&self) -> PostRepository {
        PostRepository::new(&self.posts_dir)
    }

    /// Renderer for the configured render mode
    pub fn renderer(&self) -> Arc<dyn Renderer> {
        render::renderer_for(self.config.render, &self.config.compile)
    }

    /// List every post's front-matter
    pub fn list_posts(&self) -> error::Result<Vec<PostSummary>> {
        self.repository().list_posts()
    }

    /// Load and render one post
    pub fn get_post(&self, slug: &str) -> error::Result<PostResponse> {
        load_post(&self.repository(), self.renderer().as_ref(), slug)
    }
}

/// Load `<slug>.mdx` and render it; a missing post is `BlogError::NotFound`
pub fn load_post(
    repository: &PostRepository,
    renderer: &dyn Renderer,
    slug: &str,
) -> error::Result<PostResponse> {
    let post = repository
        .get_post(slug)?
        .ok_or_else(|| BlogError::NotFound {
            slug: slug.to_string(),
        })?;
    render::render_post(renderer, post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::RenderMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_file() {
        let dir = TempDir::new().unwrap();
        let api = BlogApi::new(dir.path()).unwrap();
        assert_eq!(api.config.port, 3000);
        assert_eq!(api.posts_dir, dir.path().join("posts"));
    }

    #[test]
    fn test_new_reads_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "posts_dir: content\nrender: compile\n",
        )
        .unwrap();

        let api = BlogApi::new(dir.path()).unwrap();
        assert_eq!(api.posts_dir, dir.path().join("content"));
        assert_eq!(api.config.render, RenderMode::Compile);
    }

    #[test]
    fn test_get_post_not_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("posts")).unwrap();
        let api = BlogApi::new(dir.path()).unwrap();

        let err = api.get_post("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_post_renders_body() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.mdx"), "---\ntitle: Hi\n---\n# Hello\n").unwrap();
        let repository = PostRepository::new(dir.path());
        let renderer = render::renderer_for(RenderMode::Raw, &config::CompileConfig::default());

        let response = load_post(&repository, renderer.as_ref(), "hello").unwrap();
        assert_eq!(response.content.as_deref(), Some("# Hello\n"));
        assert_eq!(response.metadata["title"], "Hi");

        let err = load_post(&repository, renderer.as_ref(), "missing").unwrap_err();
        assert!(err.is_not_found());
    }
}
