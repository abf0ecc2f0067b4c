//! Rendering of the history log into the export formats.

use super::entities::HistoryEntry;
use crate::core::error::DomainError;
use crate::core::locale::Locale;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const RULE_WIDTH: usize = 80;

/// Export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Txt,
    Md,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
            ExportFormat::Md => "md",
        }
    }

    /// Render `entries` (most-recent-first) into this format.
    pub fn render(
        &self,
        entries: &[HistoryEntry],
        locale: Locale,
        exported_at: DateTime<Local>,
    ) -> Result<String, serde_json::Error> {
        match self {
            ExportFormat::Json => serde_json::to_string_pretty(entries),
            ExportFormat::Txt => Ok(render_txt(entries, locale)),
            ExportFormat::Md => Ok(render_md(entries, locale, exported_at)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "md" | "markdown" => Ok(ExportFormat::Md),
            _ => Err(DomainError::InvalidExportFormat(s.to_string())),
        }
    }
}

fn render_txt(entries: &[HistoryEntry], locale: Locale) -> String {
    let labels = locale.labels();
    let rule = "=".repeat(RULE_WIDTH);

    entries
        .iter()
        .map(|entry| {
            format!(
                "[{}] {}\n{}: {}\n{}: {}\n{}\n",
                entry.local_timestamp(locale.datetime_format()),
                entry.status_glyph(),
                labels.question,
                entry.query,
                labels.answer,
                entry.response,
                rule
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_md(entries: &[HistoryEntry], locale: Locale, exported_at: DateTime<Local>) -> String {
    let labels = locale.labels();
    let mut sections = vec![
        format!("# {}", labels.title),
        format!(
            "{}: {}",
            labels.exported_at,
            exported_at.format(locale.datetime_format())
        ),
        format!("{}: {}\n", labels.total_entries, entries.len()),
    ];

    sections.extend(entries.iter().map(|entry| {
        format!(
            "## {} {}\n\n**{}:** {}\n\n**{}:** {}\n\n---\n",
            entry.status_glyph(),
            entry.local_timestamp(locale.datetime_format()),
            labels.question,
            entry.query,
            labels.answer,
            entry.response
        )
    }));

    sections.join("\n")
}
