//! Configuration module

mod api;

pub use api::{ApiConfig, CompileConfig, JsxRuntimeKind, RenderMode};
