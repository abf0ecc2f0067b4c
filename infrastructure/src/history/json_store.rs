//! File-backed conversation history.
//!
//! The whole log lives in memory and is rewritten to a single JSON array
//! after every mutation. Writes go through a temp file and a rename, and
//! are serialized by a writer lock that skips snapshots older than the last
//! one written.

use chrono::{DateTime, Local, Utc};
use multisource_application::ports::history_store::HistoryStorePort;
use multisource_domain::{
    ExportFormat, HistoryEntry, HistoryError, HistoryLog, HistoryStats, KeywordPolicy, Locale,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

struct LogState {
    log: HistoryLog,
    /// Bumped on every mutation
    generation: u64,
}

/// [`HistoryStorePort`] adapter persisting to `conversation_history.json`.
pub struct JsonHistoryStore {
    state: Mutex<LogState>,
    /// Generation of the snapshot currently on disk
    written: Mutex<u64>,
    path: PathBuf,
    export_dir: PathBuf,
    locale: Locale,
    keyword_policy: KeywordPolicy,
}

impl JsonHistoryStore {
    /// Load the log at `path`, starting empty when it is missing or corrupt.
    pub fn open(
        path: impl Into<PathBuf>,
        export_dir: impl Into<PathBuf>,
        max_entries: usize,
        locale: Locale,
        keyword_policy: KeywordPolicy,
    ) -> Self {
        let path = path.into();
        let log = HistoryLog::from_entries(load_entries(&path), max_entries);
        info!(
            path = %path.display(),
            entries = log.len(),
            max_entries = log.max_entries(),
            "History loaded"
        );

        Self {
            state: Mutex::new(LogState { log, generation: 0 }),
            written: Mutex::new(0),
            path,
            export_dir: export_dir.into(),
            locale,
            keyword_policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the log, then persist the resulting snapshot.
    fn mutate<R>(&self, f: impl FnOnce(&mut HistoryLog) -> R) -> R {
        let (result, snapshot, generation) = {
            let mut state = self.state();
            let result = f(&mut state.log);
            state.generation += 1;
            (result, state.log.entries().to_vec(), state.generation)
        };

        if let Err(e) = self.persist(&snapshot, generation) {
            warn!("{}", e);
        }
        result
    }

    fn persist(&self, entries: &[HistoryEntry], generation: u64) -> Result<(), HistoryError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= *written {
            debug!(generation, written = *written, "Skipping stale history snapshot");
            return Ok(());
        }

        let persistence_error = |message: String| HistoryError::Persistence {
            path: self.path.display().to_string(),
            message,
        };
        let json = serde_json::to_string_pretty(entries).map_err(|e| persistence_error(e.to_string()))?;
        write_atomically(&self.path, &json).map_err(|e| persistence_error(e.to_string()))?;

        *written = generation;
        Ok(())
    }
}

impl HistoryStorePort for JsonHistoryStore {
    fn add_entry(
        &self,
        query: &str,
        response: &str,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
        success: bool,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = HistoryEntry::new(id.clone(), timestamp, query, response, success, duration_ms);

        let evicted = self.mutate(|log| log.insert(entry));
        debug!(id = %id, evicted = evicted.len(), "History entry added");
        id
    }

    fn get_history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        self.state().log.get_history(limit)
    }

    fn search(&self, term: &str) -> Vec<HistoryEntry> {
        self.state().log.search(term)
    }

    fn get_by_id(&self, id: &str) -> Option<HistoryEntry> {
        self.state().log.get_by_id(id).cloned()
    }

    fn remove(&self, id: &str) -> Option<HistoryEntry> {
        // A miss leaves the log untouched, so nothing to persist.
        if self.state().log.get_by_id(id).is_none() {
            return None;
        }
        self.mutate(|log| log.remove(id))
    }

    fn clear(&self) {
        self.mutate(HistoryLog::clear);
        info!("History cleared");
    }

    fn stats(&self) -> HistoryStats {
        let today = Local::now().date_naive();
        self.state().log.stats(today, &self.keyword_policy)
    }

    fn export(&self, format: ExportFormat) -> Result<PathBuf, HistoryError> {
        let entries = self.state().log.entries().to_vec();
        let now = Utc::now();
        // Exports within the same millisecond get distinct names
        let suffix = Uuid::new_v4().simple().to_string();
        let path = self.export_dir.join(format!(
            "conversation_history_{}-{}.{}",
            now.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
            &suffix[..8],
            format.extension()
        ));

        let export_error = |message: String| HistoryError::Export {
            path: path.display().to_string(),
            message,
        };
        let result = format
            .render(&entries, self.locale, now.with_timezone(&Local))
            .map_err(|e| export_error(e.to_string()))
            .and_then(|content| {
                std::fs::create_dir_all(&self.export_dir)
                    .and_then(|_| std::fs::write(&path, content))
                    .map_err(|e| export_error(e.to_string()))
            });

        match result {
            Ok(()) => {
                info!(path = %path.display(), entries = entries.len(), %format, "History exported");
                Ok(path)
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }
}

fn load_entries(path: &Path) -> Vec<HistoryEntry> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("Could not read history file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(
            "History file {} is corrupt, starting with an empty log: {}",
            path.display(),
            e
        );
        Vec::new()
    })
}

fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir, max_entries: usize) -> JsonHistoryStore {
        JsonHistoryStore::open(
            dir.path().join("conversation_history.json"),
            dir.path(),
            max_entries,
            Locale::PtBr,
            KeywordPolicy::default(),
        )
    }

    fn add(store: &JsonHistoryStore, query: &str) -> String {
        store.add_entry(query, "resposta", Utc::now(), 12, true)
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);

        assert!(store.get_history(None).is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conversation_history.json"), "{ not json").unwrap();

        let store = open_store(&dir, 50);
        assert!(store.get_history(None).is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let latest = {
            let store = open_store(&dir, 50);
            add(&store, "primeira pergunta");
            add(&store, "segunda pergunta")
        };

        let reopened = open_store(&dir, 50);
        let history = reopened.get_history(None);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, latest);
        assert_eq!(history[0].query, "segunda pergunta");
    }

    #[test]
    fn test_add_trims_and_evicts() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 3);
        let ids: Vec<_> = (0..5).map(|i| add(&store, &format!("  q{}  ", i))).collect();

        let history = store.get_history(None);
        let queries: Vec<_> = history.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["q4", "q3", "q2"]);
        assert!(store.get_by_id(&ids[0]).is_none());
        assert!(store.get_by_id(&ids[1]).is_none());

        let on_disk: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, history);
    }

    #[test]
    fn test_remove_and_clear_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        let id = add(&store, "qual o total de vendas");
        add(&store, "como reiniciar o roteador");

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.query, "qual o total de vendas");
        assert!(store.get_by_id(&id).is_none());
        assert!(store.remove(&id).is_none());
        assert_eq!(open_store(&dir, 50).get_history(None).len(), 1);

        store.clear();
        assert!(store.get_history(None).is_empty());
        assert!(open_store(&dir, 50).get_history(None).is_empty());
    }

    #[test]
    fn test_search_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        add(&store, "Vendas por cliente");
        add(&store, "manual do roteador");
        store.add_entry("vendas de março", "erro", Utc::now(), 5, false);

        let found = store.search("VENDAS");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].query, "vendas de março");

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.success_rate, "66.7");
        assert_eq!(stats.today_count, 3);
        assert_eq!(stats.top_keywords[0].word, "vendas");
        assert_eq!(stats.top_keywords[0].count, 2);
    }

    #[test]
    fn test_json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        add(&store, "primeira");
        add(&store, "segunda");

        let path = store.export(ExportFormat::Json).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("conversation_history_"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains(':'));

        let exported: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(exported, store.get_history(None));
    }

    #[test]
    fn test_markdown_export() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        add(&store, "qual o total");

        let path = store.export(ExportFormat::Md).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Histórico de Conversas"));
        assert!(content.contains("**Pergunta:** qual o total"));
    }

    #[test]
    fn test_export_failure_leaves_log_intact() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = JsonHistoryStore::open(
            dir.path().join("conversation_history.json"),
            &blocker,
            50,
            Locale::En,
            KeywordPolicy::default(),
        );
        add(&store, "question");

        let err = store.export(ExportFormat::Txt).unwrap_err();
        assert!(matches!(err, HistoryError::Export { .. }));
        assert_eq!(store.get_history(None).len(), 1);
    }

    #[test]
    fn test_back_to_back_exports_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        add(&store, "primeira");

        let first = store.export(ExportFormat::Txt).unwrap();
        let second = store.export(ExportFormat::Txt).unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_persist_failure_keeps_log_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = JsonHistoryStore::open(
            blocker.join("conversation_history.json"),
            dir.path(),
            50,
            Locale::En,
            KeywordPolicy::default(),
        );

        let first = add(&store, "first question");
        let second = add(&store, "second question");
        assert_eq!(store.get_history(None).len(), 2);
        assert_eq!(store.get_by_id(&first).unwrap().query, "first question");
        assert_eq!(*store.written.lock().unwrap(), 0);

        assert_eq!(store.remove(&second).unwrap().query, "second question");
        assert_eq!(store.get_history(None).len(), 1);

        store.clear();
        assert!(store.get_history(None).is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_stale_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, 50);
        add(&store, "primeira");
        let stale = store.get_history(None);
        add(&store, "segunda");
        assert_eq!(*store.written.lock().unwrap(), 2);

        // An older snapshot arriving late must not overwrite the newer file
        store.persist(&stale, 1).unwrap();
        let on_disk: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);

        add(&store, "terceira");
        let on_disk: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(*store.written.lock().unwrap(), 3);
        assert_eq!(on_disk, store.get_history(None));
        assert_eq!(on_disk[0].query, "terceira");
    }

    #[test]
    fn test_concurrent_adds_keep_disk_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(open_store(&dir, 100));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..5 {
                        add(&store, &format!("t{} q{}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let on_disk: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 40);
        assert_eq!(on_disk, store.get_history(None));
    }
}
