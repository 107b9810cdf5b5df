//! Pass-through strategy: the body as written

use super::{RenderedBody, Renderer};
use crate::content::Post;
use crate::error::Result;

/// Returns post bodies unchanged for the client to compile
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRenderer;

impl Renderer for RawRenderer {
    fn render(&self, post: &Post) -> Result<RenderedBody> {
        Ok(RenderedBody::Content(post.content.clone()))
    }
}
