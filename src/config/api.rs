//! API configuration (_config.yml)

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How `GET /posts/:slug` returns the post body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Body returned untouched as `content`
    #[default]
    Raw,
    /// Body compiled to JavaScript and returned as `code`
    Compile,
}

/// JSX runtime targeted by compiled code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntimeKind {
    #[default]
    Automatic,
    Classic,
}

/// Main API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    // Server
    pub ip: String,
    pub port: u16,

    // Content
    pub posts_dir: String,
    pub render: RenderMode,
    #[serde(default)]
    pub compile: CompileConfig,

    /// Include error diagnostics in 5xx bodies
    pub expose_errors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: 3000,
            posts_dir: "posts".to_string(),
            render: RenderMode::Raw,
            compile: CompileConfig::default(),
            expose_errors: false,
        }
    }
}

impl ApiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Posts directory resolved against the base directory
    pub fn posts_path(&self, base_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.posts_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base_dir.join(dir)
        }
    }
}

/// MDX compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    pub jsx_runtime: JsxRuntimeKind,
    pub jsx_import_source: Option<String>,
    pub provider_import_source: Option<String>,
    pub development: bool,
    /// Enable GFM constructs (tables, strikethrough, autolinks...)
    pub gfm: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            jsx_runtime: JsxRuntimeKind::Automatic,
            jsx_import_source: None,
            provider_import_source: None,
            development: false,
            gfm: true,
        }
    }
}
