//! CLI commands that run the API operations without a server

pub mod list;
pub mod show;
