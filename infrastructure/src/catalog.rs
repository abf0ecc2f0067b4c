//! Local filesystem data-source catalog

use crate::config::FilePathsConfig;
use crate::tools::StructuredQueryTool;
use async_trait::async_trait;
use multisource_application::ports::data_sources::DataSourceCatalog;
use multisource_domain::ToolError;
use std::path::{Path, PathBuf};
use tracing::warn;

const DATABASE_EXTENSIONS: &[&str] = &["db"];
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Lists the database and document files under the configured roots.
pub struct LocalDataSources {
    databases: StructuredQueryTool,
    documents_root: PathBuf,
    shell_enabled: bool,
}

impl LocalDataSources {
    pub fn new(paths: &FilePathsConfig, shell_enabled: bool) -> Self {
        Self {
            databases: StructuredQueryTool::new(&paths.sqlite),
            documents_root: paths.documents.clone(),
            shell_enabled,
        }
    }
}

#[async_trait]
impl DataSourceCatalog for LocalDataSources {
    async fn list_databases(&self) -> Vec<String> {
        list_files(self.databases.root(), DATABASE_EXTENSIONS).await
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, ToolError> {
        self.databases.list_tables(database).await
    }

    async fn list_documents(&self) -> Vec<String> {
        list_files(&self.documents_root, DOCUMENT_EXTENSIONS).await
    }

    fn shell_enabled(&self) -> bool {
        self.shell_enabled
    }
}

/// Sorted names of regular files in `dir` with one of `extensions`.
async fn list_files(dir: &Path, extensions: &[&str]) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Could not read an entry of {}: {}", dir.display(), e);
                break;
            }
        };

        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());

        if matches_extension
            && is_file
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    names
}
