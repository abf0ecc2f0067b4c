//! Structured query tool: sqlite_query
//!
//! Runs one SQL statement against a database file under the configured
//! root. Every call opens its own read-only connection on a blocking thread;
//! the connection is dropped when the closure returns, on success or error.

use super::resolve_under;
use multisource_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use rusqlite::{Connection, OpenFlags, types::ValueRef};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Tool name constant
pub const SQLITE_QUERY: &str = "sqlite_query";

pub fn sqlite_query_definition() -> ToolDefinition {
    ToolDefinition::new(
        SQLITE_QUERY,
        "Run a read-only SQL query against one of the SQLite databases. \
         Use it for questions about structured data such as customers, orders or sales.",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("source_name", "Database file name, e.g. \"sales.db\"", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("query", "SQL statement to execute (SELECT only)", true)
            .with_type("string"),
    )
}

/// Rows returned by one statement, in the shape fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRows {
    pub source_name: String,
    pub query: String,
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
}

#[derive(Debug, Clone)]
pub struct StructuredQueryTool {
    root: PathBuf,
}

impl StructuredQueryTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let (source_name, query) = match (
            call.require_string("source_name"),
            call.require_string("query"),
        ) {
            (Ok(s), Ok(q)) => (s, q),
            (Err(e), _) | (_, Err(e)) => {
                return ToolResult::failure(SQLITE_QUERY, ToolError::InvalidArgument(e));
            }
        };

        let result = self.query(source_name, query).await.and_then(|rows| {
            let output = serde_json::to_string_pretty(&rows)
                .map_err(|e| ToolError::QueryExecution(e.to_string()))?;
            Ok((rows.row_count, output))
        });
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((row_count, output)) => ToolResult::success(SQLITE_QUERY, output).with_metadata(
                ToolResultMetadata {
                    duration_ms: Some(duration_ms),
                    path: Some(self.root.join(source_name).display().to_string()),
                    match_count: Some(row_count),
                    ..Default::default()
                },
            ),
            Err(e) => ToolResult::failure(SQLITE_QUERY, e).with_duration(duration_ms),
        }
    }

    /// Execute `query` against `source_name` and collect every row.
    pub async fn query(&self, source_name: &str, query: &str) -> Result<QueryRows, ToolError> {
        let path = self.resolve(source_name)?;
        debug!(source = source_name, query, "Running structured query");

        let statement = query.to_string();
        let rows = tokio::task::spawn_blocking(move || run_query(&path, &statement))
            .await
            .map_err(|e| ToolError::QueryExecution(format!("query task failed: {}", e)))??;

        Ok(QueryRows {
            source_name: source_name.to_string(),
            query: query.to_string(),
            row_count: rows.len(),
            rows,
        })
    }

    /// User table names of one database, sorted.
    pub async fn list_tables(&self, source_name: &str) -> Result<Vec<String>, ToolError> {
        let path = self.resolve(source_name)?;
        tokio::task::spawn_blocking(move || {
            let conn = open_read_only(&path)?;
            let mut stmt = conn
                .prepare(
                    "SELECT name FROM sqlite_master \
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                )
                .map_err(query_error)?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(query_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(query_error)?;
            Ok(names)
        })
        .await
        .map_err(|e| ToolError::QueryExecution(format!("query task failed: {}", e)))?
    }

    fn resolve(&self, source_name: &str) -> Result<PathBuf, ToolError> {
        let path = resolve_under(&self.root, source_name).ok_or_else(|| {
            ToolError::InvalidArgument(format!(
                "'{}' must be a file name inside the database directory",
                source_name
            ))
        })?;
        if !path.is_file() {
            return Err(ToolError::SourceNotFound(source_name.to_string()));
        }
        Ok(path)
    }
}

fn query_error(e: rusqlite::Error) -> ToolError {
    ToolError::QueryExecution(e.to_string())
}

fn open_read_only(path: &Path) -> Result<Connection, ToolError> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(query_error)
}

fn run_query(path: &Path, query: &str) -> Result<Vec<Map<String, Value>>, ToolError> {
    let conn = open_read_only(path)?;
    let mut stmt = conn.prepare(query).map_err(query_error)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([]).map_err(query_error)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(query_error)? {
        let mut record = Map::new();
        for (i, name) in columns.iter().enumerate() {
            let value = row.get_ref(i).map_err(query_error)?;
            record.insert(name.clone(), to_json(value));
        }
        records.push(record);
    }
    Ok(records)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sales_db() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("sales.db")).unwrap();
        conn.execute_batch(
            "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT, balance REAL);
             CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER);
             INSERT INTO customers (name, balance) VALUES ('Ana', 10.5), ('Bruno', NULL);",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_query_returns_rows() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());

        let rows = tool
            .query("sales.db", "SELECT name, balance FROM customers ORDER BY id")
            .await
            .unwrap();

        assert_eq!(rows.row_count, 2);
        assert_eq!(rows.rows[0]["name"], "Ana");
        assert_eq!(rows.rows[0]["balance"], 10.5);
        assert_eq!(rows.rows[1]["balance"], Value::Null);
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());

        let err = tool.query("nope.db", "SELECT 1").await.unwrap_err();
        assert_eq!(err, ToolError::SourceNotFound("nope.db".to_string()));
    }

    #[tokio::test]
    async fn test_source_outside_root_is_rejected() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path().join("sub"));

        let err = tool.query("../sales.db", "SELECT 1").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_malformed_statement() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());

        let err = tool.query("sales.db", "SELEC nothing").await.unwrap_err();
        assert!(matches!(err, ToolError::QueryExecution(_)));
    }

    #[tokio::test]
    async fn test_writes_are_refused() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());

        let err = tool
            .query("sales.db", "DELETE FROM customers")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::QueryExecution(_)));

        let rows = tool
            .query("sales.db", "SELECT COUNT(*) AS n FROM customers")
            .await
            .unwrap();
        assert_eq!(rows.rows[0]["n"], 2);
    }

    #[tokio::test]
    async fn test_list_tables() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());

        assert_eq!(
            tool.list_tables("sales.db").await.unwrap(),
            vec!["customers", "orders"]
        );
    }

    #[tokio::test]
    async fn test_invoke_output_and_metadata() {
        let dir = sales_db();
        let tool = StructuredQueryTool::new(dir.path());
        let call = ToolCall::new(SQLITE_QUERY)
            .with_arg("source_name", "sales.db")
            .with_arg("query", "SELECT name FROM customers");

        let result = tool.invoke(&call).await;
        assert!(result.is_success());
        assert_eq!(result.metadata.match_count, Some(2));

        let output: Value = serde_json::from_str(result.output().unwrap()).unwrap();
        assert_eq!(output["source_name"], "sales.db");
        assert_eq!(output["row_count"], 2);
    }

    #[tokio::test]
    async fn test_invoke_requires_query() {
        let tool = StructuredQueryTool::new("/nonexistent");
        let call = ToolCall::new(SQLITE_QUERY).with_arg("source_name", "sales.db");

        let result = tool.invoke(&call).await;
        assert!(!result.is_success());
        assert!(matches!(result.error(), Some(ToolError::InvalidArgument(_))));
    }
}
