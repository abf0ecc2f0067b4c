//! Port for discovering the configured data sources.

use async_trait::async_trait;
use multisource_domain::ToolError;

/// Read-only view of the structured sources, documents and the shell flag.
///
/// Listing failures (missing root directory, unreadable entries) are logged
/// by the adapter and produce empty lists.
#[async_trait]
pub trait DataSourceCatalog: Send + Sync {
    /// Database file names under the structured-source root, sorted
    async fn list_databases(&self) -> Vec<String>;

    /// Table names of one database
    async fn list_tables(&self, database: &str) -> Result<Vec<String>, ToolError>;

    /// Document file names under the documents root, sorted
    async fn list_documents(&self) -> Vec<String>;

    fn shell_enabled(&self) -> bool;
}
