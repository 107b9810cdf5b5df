//! Post rendering strategies
//!
//! A deployment picks one strategy; both sit behind [`Renderer`] so the HTTP
//! layer never knows which one it is talking to.

mod compile;
mod function_body;
mod passthrough;

use serde::Serialize;
use std::sync::Arc;

pub use compile::MdxCompiler;
pub use function_body::into_function_body;
pub use passthrough::RawRenderer;

use crate::config::{CompileConfig, RenderMode};
use crate::content::{Metadata, Post};
use crate::error::Result;

/// A post body as handed back to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    /// Raw MDX after the front-matter block
    Content(String),
    /// Compiled function body
    Code(String),
}

/// Turns a post body into what `GET /posts/:slug` returns
pub trait Renderer: Send + Sync {
    fn render(&self, post: &Post) -> Result<RenderedBody>;
}

/// Build the renderer for a render mode
pub fn renderer_for(mode: RenderMode, compile: &CompileConfig) -> Arc<dyn Renderer> {
    match mode {
        RenderMode::Raw => Arc::new(RawRenderer),
        RenderMode::Compile => Arc::new(MdxCompiler::new(compile.clone())),
    }
}

/// JSON body of `GET /posts/:slug`: `{ metadata, content }` or `{ metadata, code }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostResponse {
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl PostResponse {
    pub fn new(metadata: Metadata, body: RenderedBody) -> Self {
        let (content, code) = match body {
            RenderedBody::Content(content) => (Some(content), None),
            RenderedBody::Code(code) => (None, Some(code)),
        };
        Self {
            metadata,
            content,
            code,
        }
    }
}

/// Render a post and pair the result with its front-matter
pub fn render_post(renderer: &dyn Renderer, post: Post) -> Result<PostResponse> {
    let body = renderer.render(&post)?;
    Ok(PostResponse::new(post.metadata, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn sample() -> Post {
        let metadata = match json!({ "title": "Hi" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Post::new(
            "hello-world".to_string(),
            metadata,
            "# Hello\n".to_string(),
            PathBuf::from("posts/hello-world.mdx"),
        )
    }

    #[test]
    fn test_raw_response_shape() {
        let renderer = renderer_for(RenderMode::Raw, &CompileConfig::default());
        let response = render_post(renderer.as_ref(), sample()).unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "metadata": { "title": "Hi" }, "content": "# Hello\n" })
        );
    }

    #[test]
    fn test_compile_response_shape() {
        let renderer = renderer_for(RenderMode::Compile, &CompileConfig::default());
        let response = render_post(renderer.as_ref(), sample()).unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["metadata"], json!({ "title": "Hi" }));
        assert!(value.get("content").is_none());
        assert!(!value["code"].as_str().unwrap().is_empty());
    }
}
