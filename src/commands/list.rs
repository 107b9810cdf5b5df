//! List posts

use anyhow::{Context, Result};

use crate::BlogApi;

/// Print every post the listing endpoint would return
pub fn run(api: &BlogApi, json: bool) -> Result<()> {
    let posts = api
        .list_posts()
        .with_context(|| format!("Failed to list posts in {:?}", api.posts_dir))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!("  {} - {}", post.slug(), post.title().unwrap_or("(untitled)"));
    }

    Ok(())
}
