//! Post models

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::Metadata;

/// Extension every post file carries
pub const POST_EXTENSION: &str = "mdx";

/// A post read from disk: front-matter plus the untouched body
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Filename-derived identity used for lookup
    pub slug: String,

    /// Front-matter fields as written
    pub metadata: Metadata,

    /// Body after the front-matter block
    pub content: String,

    /// Full source file path
    pub full_source: PathBuf,
}

impl Post {
    pub fn new(slug: String, metadata: Metadata, content: String, full_source: PathBuf) -> Self {
        Self {
            slug,
            metadata,
            content,
            full_source,
        }
    }

    /// Title from front-matter, if it is a string
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

/// Listing entry: front-matter fields with a guaranteed `slug`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PostSummary {
    fields: Metadata,
}

impl PostSummary {
    /// Build the listing entry for a file.
    ///
    /// An explicit front-matter `slug` is kept for display; it does not make
    /// the post reachable under that name.
    pub fn new(mut metadata: Metadata, file_stem: &str) -> Self {
        let slug = display_slug(&metadata).unwrap_or_else(|| file_stem.to_string());
        // Existing keys keep their position, new ones are appended
        metadata.insert("slug".to_string(), Value::String(slug));
        Self { fields: metadata }
    }

    pub fn slug(&self) -> &str {
        self.fields
            .get("slug")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Metadata {
        &self.fields
    }
}

/// Front-matter `slug` when it is usable as one: a non-empty string or a
/// non-zero number.
fn display_slug(metadata: &Metadata) -> Option<String> {
    match metadata.get("slug")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Filename without the post extension, if the path names a post file
pub fn post_stem(path: &Path) -> Option<&str> {
    let is_post = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e == POST_EXTENSION)
        .unwrap_or(false);
    if !is_post {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_slug_defaults_to_file_stem() {
        let summary = PostSummary::new(metadata(json!({ "title": "Hi" })), "hello-world");
        assert_eq!(summary.slug(), "hello-world");
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({ "title": "Hi", "slug": "hello-world" })
        );
    }

    #[test]
    fn test_explicit_slug_keeps_position() {
        let summary = PostSummary::new(
            metadata(json!({ "slug": "custom", "title": "Hi" })),
            "file-name",
        );
        assert_eq!(summary.slug(), "custom");
        let keys: Vec<&str> = summary.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["slug", "title"]);
    }

    #[test]
    fn test_falsy_slug_falls_back() {
        for value in [json!(""), json!(null), json!(false), json!(0)] {
            let summary = PostSummary::new(metadata(json!({ "slug": value })), "fallback");
            assert_eq!(summary.slug(), "fallback");
        }
    }

    #[test]
    fn test_numeric_slug_is_text() {
        let summary = PostSummary::new(metadata(json!({ "slug": 2024 })), "file");
        assert_eq!(summary.slug(), "2024");
    }

    #[test]
    fn test_post_stem() {
        assert_eq!(post_stem(Path::new("posts/hello.mdx")), Some("hello"));
        assert_eq!(post_stem(Path::new("posts/hello.md")), None);
        assert_eq!(post_stem(Path::new("posts/notes.mdx.bak")), None);
        assert_eq!(post_stem(Path::new("posts/README")), None);
    }
}
