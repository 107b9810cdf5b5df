//! Compile strategy: MDX source to an executable function body

use mdxjs::{compile, JsxRuntime, MdxParseOptions, Options};
use std::collections::HashSet;

use super::function_body::into_function_body;
use super::{RenderedBody, Renderer};
use crate::config::{CompileConfig, JsxRuntimeKind};
use crate::content::Post;
use crate::error::{BlogError, CompileStage, Result};

/// Compiles post bodies with mdxjs (markdown-rs + SWC).
///
/// Every call compiles from scratch; nothing is cached between requests.
#[derive(Debug, Clone, Default)]
pub struct MdxCompiler {
    config: CompileConfig,
}

impl MdxCompiler {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    /// Run both stages in order: MDX to ES module, then module to function body
    pub fn compile(&self, source: &str, filepath: &str) -> Result<String> {
        let module = self.compile_module(source, filepath)?;
        into_function_body(&module, &self.runtime_sources())
            .map_err(|e| BlogError::compile(CompileStage::FunctionBody, e))
    }

    /// MDX to a JavaScript module with JSX already lowered to runtime calls
    pub fn compile_module(&self, source: &str, filepath: &str) -> Result<String> {
        let options = Options {
            filepath: Some(filepath.to_string()),
            development: self.config.development,
            provider_import_source: self.config.provider_import_source.clone(),
            jsx: false,
            jsx_runtime: Some(match self.config.jsx_runtime {
                JsxRuntimeKind::Automatic => JsxRuntime::Automatic,
                JsxRuntimeKind::Classic => JsxRuntime::Classic,
            }),
            jsx_import_source: self.config.jsx_import_source.clone(),
            parse: if self.config.gfm {
                MdxParseOptions::gfm()
            } else {
                MdxParseOptions::default()
            },
            ..Default::default()
        };

        compile(source, &options)
            .map_err(|e| BlogError::compile(CompileStage::Mdx, e.to_string()))
    }

    /// Import sources the caller hands in as `arguments[0]`
    fn runtime_sources(&self) -> HashSet<String> {
        let import_source = self
            .config
            .jsx_import_source
            .clone()
            .unwrap_or_else(|| "react".to_string());

        let mut sources = HashSet::new();
        match self.config.jsx_runtime {
            JsxRuntimeKind::Automatic => {
                sources.insert(format!("{}/jsx-runtime", import_source));
                sources.insert(format!("{}/jsx-dev-runtime", import_source));
            }
            JsxRuntimeKind::Classic => {
                sources.insert("react".to_string());
            }
        }
        if let Some(provider) = &self.config.provider_import_source {
            sources.insert(provider.clone());
        }
        sources
    }
}

impl Renderer for MdxCompiler {
    fn render(&self, post: &Post) -> Result<RenderedBody> {
        let filepath = post.full_source.to_string_lossy();
        let code = self.compile(&post.content, &filepath)?;
        tracing::debug!("Compiled {} ({} bytes of code)", post.slug, code.len());
        Ok(RenderedBody::Code(code))
    }
}
