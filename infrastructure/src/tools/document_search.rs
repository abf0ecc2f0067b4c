//! Document search tool: document_search

use super::resolve_under;
use multisource_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Tool name constant
pub const DOCUMENT_SEARCH: &str = "document_search";

/// Lines of context kept on each side of a match
const CONTEXT_LINES: usize = 2;

pub fn document_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        DOCUMENT_SEARCH,
        "Read a text or markdown document, or search it for a term. \
         Without search_term the whole document is returned; with it, every \
         matching line is returned with two lines of context on each side.",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("filename", "Document file name, e.g. \"manual.md\"", true)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new(
            "search_term",
            "Case-insensitive term to look for (optional)",
            false,
        )
        .with_type("string"),
    )
}

/// One matching line and its surrounding window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    /// 1-based line number of the match
    pub line_number: usize,
    pub line: String,
    /// Window lines joined with `\n`
    pub context: String,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentSearchOutput {
    Content {
        filename: String,
        content: String,
        /// Length in characters
        length: usize,
    },
    Matches {
        filename: String,
        search_term: String,
        match_count: usize,
        matches: Vec<LineMatch>,
    },
}

/// Case-insensitive line scan, in line order.
pub fn find_matches(content: &str, term: &str) -> Vec<LineMatch> {
    let lines: Vec<&str> = content.split('\n').collect();
    let needle = term.to_lowercase();
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(i, line)| {
            let start = i.saturating_sub(CONTEXT_LINES);
            let end = (i + CONTEXT_LINES).min(last);
            LineMatch {
                line_number: i + 1,
                line: line.to_string(),
                context: lines[start..=end].join("\n"),
                start_line: start + 1,
                end_line: end + 1,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DocumentSearchTool {
    root: PathBuf,
}

impl DocumentSearchTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let filename = match call.require_string("filename") {
            Ok(f) => f,
            Err(e) => return ToolResult::failure(DOCUMENT_SEARCH, ToolError::InvalidArgument(e)),
        };
        let search_term = call.get_non_empty("search_term");

        let result = self.search(filename, search_term).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let path = self.root.join(filename).display().to_string();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return ToolResult::failure(DOCUMENT_SEARCH, e)
                    .with_duration(duration_ms)
                    .with_path(path);
            }
        };

        let mut metadata = ToolResultMetadata {
            duration_ms: Some(duration_ms),
            path: Some(path),
            ..Default::default()
        };
        match &output {
            DocumentSearchOutput::Content { content, .. } => metadata.bytes = Some(content.len()),
            DocumentSearchOutput::Matches { match_count, .. } => {
                metadata.match_count = Some(*match_count)
            }
        }

        match serde_json::to_string_pretty(&output) {
            Ok(text) => ToolResult::success(DOCUMENT_SEARCH, text).with_metadata(metadata),
            Err(e) => ToolResult::failure(DOCUMENT_SEARCH, ToolError::DocumentRead(e.to_string())),
        }
    }

    /// Full text when `search_term` is `None`, matching lines otherwise.
    pub async fn search(
        &self,
        filename: &str,
        search_term: Option<&str>,
    ) -> Result<DocumentSearchOutput, ToolError> {
        let path = resolve_under(&self.root, filename).ok_or_else(|| {
            ToolError::InvalidArgument(format!(
                "'{}' must be a file name inside the documents directory",
                filename
            ))
        })?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ToolError::DocumentNotFound(filename.to_string()),
                _ => ToolError::DocumentRead(format!("{}: {}", filename, e)),
            })?;

        Ok(match search_term {
            None => DocumentSearchOutput::Content {
                filename: filename.to_string(),
                length: content.chars().count(),
                content,
            },
            Some(term) => {
                let matches = find_matches(&content, term);
                debug!(filename, term, matches = matches.len(), "Searched document");
                DocumentSearchOutput::Matches {
                    filename: filename.to_string(),
                    search_term: term.to_string(),
                    match_count: matches.len(),
                    matches,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn docs() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a\nbx\nc\nd\ne\nf").unwrap();
        std::fs::write(
            dir.path().join("manual.md"),
            "# Manual\nReset the Router\nthen wait\nrouter lights blink",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_match_window() {
        let matches = find_matches("a\nbx\nc\nd\ne\nf", "x");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 2);
        assert_eq!(matches[0].line, "bx");
        assert_eq!(matches[0].start_line, 1);
        assert_eq!(matches[0].end_line, 4);
        assert_eq!(matches[0].context, "a\nbx\nc\nd");
    }

    #[test]
    fn test_window_clamped_at_end() {
        let matches = find_matches("a\nb\nc\nd\nend", "END");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start_line, 3);
        assert_eq!(matches[0].end_line, 5);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_ordered() {
        let dir = docs();
        let tool = DocumentSearchTool::new(dir.path());

        let output = tool.search("manual.md", Some("ROUTER")).await.unwrap();
        let DocumentSearchOutput::Matches {
            match_count,
            matches,
            ..
        } = output
        else {
            panic!("expected matches");
        };
        assert_eq!(match_count, 2);
        assert_eq!(matches[0].line_number, 2);
        assert_eq!(matches[1].line_number, 4);
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let dir = docs();
        let tool = DocumentSearchTool::new(dir.path());

        let output = tool.search("a.txt", Some("zzz")).await.unwrap();
        assert_eq!(
            output,
            DocumentSearchOutput::Matches {
                filename: "a.txt".to_string(),
                search_term: "zzz".to_string(),
                match_count: 0,
                matches: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_full_text_without_term() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "olá mundo").unwrap();
        let tool = DocumentSearchTool::new(dir.path());

        let output = tool.search("notes.txt", None).await.unwrap();
        let DocumentSearchOutput::Content { content, length, .. } = output else {
            panic!("expected content");
        };
        assert_eq!(content, "olá mundo");
        assert_eq!(length, 9);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = docs();
        let tool = DocumentSearchTool::new(dir.path());

        let err = tool.search("missing.txt", None).await.unwrap_err();
        assert_eq!(err, ToolError::DocumentNotFound("missing.txt".to_string()));
    }

    #[tokio::test]
    async fn test_invoke_treats_blank_term_as_absent() {
        let dir = docs();
        let tool = DocumentSearchTool::new(dir.path());
        let call = ToolCall::new(DOCUMENT_SEARCH)
            .with_arg("filename", "a.txt")
            .with_arg("search_term", "  ");

        let result = tool.invoke(&call).await;
        assert!(result.is_success());

        let output: Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(output["length"], 12);
        assert!(output.get("matches").is_none());
    }

    #[tokio::test]
    async fn test_invoke_reports_match_count() {
        let dir = docs();
        let tool = DocumentSearchTool::new(dir.path());
        let call = ToolCall::new(DOCUMENT_SEARCH)
            .with_arg("filename", "a.txt")
            .with_arg("search_term", "x");

        let result = tool.invoke(&call).await;
        assert_eq!(result.metadata.match_count, Some(1));

        let output: Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(output["matches"][0]["context"], "a\nbx\nc\nd");
    }
}
