//! Error taxonomy shared by the repository, the renderers and the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which step of the compile pipeline rejected the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStage {
    /// MDX to JavaScript module (mdxjs)
    Mdx,
    /// ES module reshaped into a function body
    FunctionBody,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileStage::Mdx => f.write_str("mdx"),
            CompileStage::FunctionBody => f.write_str("function-body"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BlogError {
    /// No `<slug>.mdx` in the posts directory
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed front-matter block
    #[error("invalid front-matter in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{stage} compilation failed: {message}")]
    Compile { stage: CompileStage, message: String },

    /// A blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;

impl BlogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlogError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BlogError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn compile(stage: CompileStage, message: impl Into<String>) -> Self {
        BlogError::Compile {
            stage,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound { .. })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BlogError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert into an HTTP response, optionally carrying the diagnostic
    pub fn into_response_with(self, expose: bool) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = if self.is_not_found() {
            tracing::debug!("{}", message);
            ErrorBody {
                error: "Post not found".to_string(),
                detail: None,
            }
        } else {
            tracing::error!("request failed: {}", message);
            ErrorBody {
                error: "Internal Server Error".to_string(),
                detail: expose.then_some(message),
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}
