//! File source port
//!
//! Loads implementation files with their language tag.

use async_trait::async_trait;

use crate::core::error::CheckError;
use crate::core::models::FileContent;

/// Loader for implementation files
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Load a file's text and derive its language tag
    async fn load(&self, path: &str) -> Result<FileContent, CheckError>;
}
