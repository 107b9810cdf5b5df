//! Show a single post

use anyhow::{Context, Result};

use crate::BlogApi;

/// Print the JSON body `GET /posts/:slug` would return
pub fn run(api: &BlogApi, slug: &str) -> Result<()> {
    let response = match api.get_post(slug) {
        Ok(response) => response,
        Err(e) if e.is_not_found() => {
            anyhow::bail!("Post not found: {} (looked for {:?})", slug, api.posts_dir)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to load post {}", slug)),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
