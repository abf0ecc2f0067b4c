//! Data-source statistics and suggested questions.

use crate::ports::data_sources::DataSourceCatalog;
use multisource_domain::Locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteStats {
    pub count: usize,
    pub databases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub count: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellStats {
    pub enabled: bool,
}

/// Snapshot of what the agent can currently reach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceStats {
    pub sqlite: SqliteStats,
    pub documents: DocumentStats,
    pub shell: ShellStats,
}

pub struct DataSourceInsightsUseCase<C: DataSourceCatalog + 'static> {
    catalog: Arc<C>,
    locale: Locale,
}

impl<C: DataSourceCatalog + 'static> DataSourceInsightsUseCase<C> {
    pub fn new(catalog: Arc<C>, locale: Locale) -> Self {
        Self { catalog, locale }
    }

    pub async fn stats(&self) -> DataSourceStats {
        let databases = self.catalog.list_databases().await;
        let files = self.catalog.list_documents().await;

        DataSourceStats {
            sqlite: SqliteStats {
                count: databases.len(),
                databases,
            },
            documents: DocumentStats {
                count: files.len(),
                files,
            },
            shell: ShellStats {
                enabled: self.catalog.shell_enabled(),
            },
        }
    }

    /// Two questions per available kind of source, in the configured locale.
    pub async fn suggested_questions(&self) -> Vec<String> {
        let stats = self.stats().await;
        let mut suggestions = Vec::new();

        if let Some(database) = stats.sqlite.databases.first() {
            suggestions.extend(self.locale.database_suggestions(database));
        }
        if let Some(document) = stats.documents.files.first() {
            suggestions.extend(self.locale.document_suggestions(document));
        }
        if stats.shell.enabled {
            suggestions.extend(self.locale.shell_suggestions());
        }

        suggestions
    }
}
