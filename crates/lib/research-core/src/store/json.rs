use std::{
    error::Error,
    fmt,
    fs,
    io,
    path::{Path, PathBuf},
};

use research_store::models::{PaperIndex, PaperRecord, attach_ids};
use research_store::schema::{INDEX_FILE_NAME, is_valid_topic_key};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Partition file as stored on disk, before per-record decoding.
type RawIndex = Map<String, Value>;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    CorruptIndex { path: PathBuf, source: serde_json::Error },
    Encode(serde_json::Error),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "IO error at {}: {source}", path.display()),
            Self::CorruptIndex { path, source } => {
                write!(f, "Corrupt index {}: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "Failed to encode index: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::CorruptIndex { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Paper metadata store backed by one JSON index file per topic partition.
///
/// Layout: `<root>/<topic_key>/papers_info.json`, each file holding a map of
/// paper id to record. Merges rewrite the whole file; there is no locking, so
/// two processes sharing a root can lose updates.
#[derive(Debug, Clone)]
pub struct JsonPaperStore {
    root: PathBuf,
}

impl JsonPaperStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the index file for a partition.
    #[must_use]
    pub fn index_path(&self, topic_key: &str) -> PathBuf {
        self.root.join(topic_key).join(INDEX_FILE_NAME)
    }

    /// Reads a partition index.
    ///
    /// A missing index yields an empty map. Entries whose body cannot be
    /// decoded as a record are skipped with a warning; the rest are returned.
    ///
    /// # Errors
    /// Returns `StoreError::CorruptIndex` if the file is not a JSON object, or
    /// `StoreError::Io` if it cannot be read.
    pub fn load(&self, topic_key: &str) -> StoreResult<PaperIndex> {
        ensure_topic_key(topic_key)?;
        read_index(&self.index_path(topic_key))
    }

    /// Reads a partition index, treating any failure as an empty partition.
    #[must_use]
    pub fn load_or_empty(&self, topic_key: &str) -> PaperIndex {
        match self.load(topic_key) {
            Ok(index) => index,
            Err(err) => {
                warn!(topic_key, error = %err, "partition unreadable, starting empty");
                PaperIndex::new()
            }
        }
    }

    /// Merges records into a partition and rewrites its index.
    ///
    /// Records overwrite existing entries with the same id; within one call the
    /// last record for an id wins. Existing entries that do not decode as
    /// records are written back untouched. Returns the merged partition
    /// contents.
    ///
    /// # Errors
    /// Returns `StoreError` if the key is invalid or the index cannot be written.
    pub fn merge<I>(&self, topic_key: &str, records: I) -> StoreResult<PaperIndex>
    where
        I: IntoIterator<Item = PaperRecord>,
    {
        ensure_topic_key(topic_key)?;
        let path = self.index_path(topic_key);
        let mut raw = match read_raw(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(topic_key, error = %err, "partition unreadable, starting empty");
                RawIndex::new()
            }
        };
        for record in records {
            if record.paper_id.trim().is_empty() {
                return Err(StoreError::InvalidInput("paper_id is required".to_string()));
            }
            let body = serde_json::to_value(&record).map_err(StoreError::Encode)?;
            raw.insert(record.paper_id, body);
        }

        let dir = self.root.join(topic_key);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        write_index(&path, &raw)?;
        debug!(topic_key, count = raw.len(), "partition written");
        Ok(decode_index(&path, raw))
    }

    /// Finds a paper by id across every partition under the root.
    ///
    /// Partitions are enumerated at call time; unreadable ones are skipped.
    /// When the same id exists in several partitions the first one enumerated
    /// wins, and enumeration order is filesystem-defined.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the root exists but cannot be listed.
    pub fn find(&self, paper_id: &str) -> StoreResult<Option<PaperRecord>> {
        for topic_key in self.partition_keys()? {
            let path = self.index_path(&topic_key);
            if !path.is_file() {
                continue;
            }
            match read_index(&path) {
                Ok(mut index) => {
                    if let Some(record) = index.remove(paper_id) {
                        return Ok(Some(record));
                    }
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable partition");
                }
            }
        }
        Ok(None)
    }

    /// Lists partition keys that hold an index file, sorted.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the root exists but cannot be listed.
    pub fn list_topics(&self) -> StoreResult<Vec<String>> {
        let mut topics: Vec<String> = self
            .partition_keys()?
            .into_iter()
            .filter(|topic_key| self.index_path(topic_key).is_file())
            .collect();
        topics.sort();
        Ok(topics)
    }

    fn partition_keys(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                keys.push(name.to_string());
            }
        }
        Ok(keys)
    }
}

fn ensure_topic_key(topic_key: &str) -> StoreResult<()> {
    if is_valid_topic_key(topic_key) {
        Ok(())
    } else {
        Err(StoreError::InvalidInput(format!("invalid topic key: {topic_key:?}")))
    }
}

fn read_index(path: &Path) -> StoreResult<PaperIndex> {
    Ok(decode_index(path, read_raw(path)?))
}

fn read_raw(path: &Path) -> StoreResult<RawIndex> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(RawIndex::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw).map_err(|source| StoreError::CorruptIndex {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_index(path: &Path, raw: RawIndex) -> PaperIndex {
    let mut index = PaperIndex::new();
    for (paper_id, body) in raw {
        match serde_json::from_value::<PaperRecord>(body) {
            Ok(record) => {
                index.insert(paper_id, record);
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    paper_id = %paper_id,
                    error = %err,
                    "skipping undecodable record"
                );
            }
        }
    }
    attach_ids(&mut index);
    index
}

fn write_index(path: &Path, index: &RawIndex) -> StoreResult<()> {
    let body = serde_json::to_string_pretty(index).map_err(StoreError::Encode)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(paper_id: &str, title: &str) -> PaperRecord {
        PaperRecord {
            paper_id: paper_id.to_string(),
            title: title.to_string(),
            authors: vec!["X".to_string()],
            published: "2021-01-01T00:00:00+00:00".to_string(),
            summary: "s".to_string(),
            pdf_url: "u".to_string(),
        }
    }

    fn temp_store() -> (tempfile::TempDir, JsonPaperStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonPaperStore::new(dir.path().join("papers"));
        (dir, store)
    }

    #[test]
    fn load_missing_partition_is_empty() {
        let (_dir, store) = temp_store();
        let index = store.load("nothing_here").expect("missing partition loads");
        assert!(index.is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let (_dir, store) = temp_store();
        let once = store.merge("ai", [record("1", "A")]).expect("first merge");
        let twice = store.merge("ai", [record("1", "A")]).expect("second merge");
        assert_eq!(once, twice);
        assert_eq!(store.load("ai").expect("reload"), once);
    }

    #[test]
    fn merge_last_write_wins_within_call() {
        let (_dir, store) = temp_store();
        let index = store
            .merge("ai", [record("1", "first"), record("1", "second")])
            .expect("merge");
        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].title, "second");
    }

    #[test]
    fn merge_keeps_prior_entries() {
        let (_dir, store) = temp_store();
        store.merge("ai", [record("1", "A")]).expect("merge");
        let index = store.merge("ai", [record("2", "B")]).expect("merge");
        assert_eq!(index.keys().cloned().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn corrupt_partition_degrades_to_empty() {
        let (_dir, store) = temp_store();
        let path = store.index_path("broken");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(store.load("broken"), Err(StoreError::CorruptIndex { .. })));
        assert!(store.load_or_empty("broken").is_empty());

        let index = store.merge("broken", [record("9", "Z")]).expect("merge over corrupt");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn find_skips_corrupt_partitions() {
        let (_dir, store) = temp_store();
        let path = store.index_path("broken");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "").expect("write");
        store.merge("physics", [record("42", "Answer")]).expect("merge");

        let found = store.find("42").expect("find").expect("record present");
        assert_eq!(found.paper_id, "42");
        assert_eq!(found.title, "Answer");
        assert!(store.find("43").expect("find").is_none());
    }

    #[test]
    fn hand_edited_records_survive_find_and_merge() {
        let (_dir, store) = temp_store();
        let path = store.index_path("ai");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        let body = r#"{
            "1111.0001": {"title": "Complete", "authors": ["X"],
                          "published": "2021-01-01T00:00:00+00:00",
                          "summary": "s", "pdf_url": "u"},
            "1111.0002": {"title": "No date", "authors": ["Y"]},
            "1111.0003": {"title": "Bad date", "published": null}
        }"#;
        fs::write(&path, body).expect("write");

        let found = store.find("1111.0001").expect("find").expect("complete record");
        assert_eq!(found.title, "Complete");
        let partial = store.find("1111.0002").expect("find").expect("partial record");
        assert!(partial.published.is_empty());
        assert!(store.find("1111.0003").expect("find").is_none());

        let index = store.merge("ai", [record("2222.0001", "New")]).expect("merge");
        assert_eq!(
            index.keys().cloned().collect::<Vec<_>>(),
            vec!["1111.0001", "1111.0002", "2222.0001"]
        );

        let raw = fs::read_to_string(&path).expect("read");
        let stored: RawIndex = serde_json::from_str(&raw).expect("valid JSON");
        let mut keys = stored.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, vec!["1111.0001", "1111.0002", "1111.0003", "2222.0001"]);
        assert!(stored["1111.0003"]["published"].is_null());
    }

    #[test]
    fn find_without_root_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(store.find("1").expect("find").is_none());
        assert!(store.list_topics().expect("list").is_empty());
    }

    #[test]
    fn list_topics_ignores_stray_entries() {
        let (_dir, store) = temp_store();
        store.merge("b_topic", [record("1", "A")]).expect("merge");
        store.merge("a_topic", [record("2", "B")]).expect("merge");
        fs::create_dir_all(store.root().join("empty_dir")).expect("mkdir");
        fs::write(store.root().join("stray.txt"), "x").expect("write");

        assert_eq!(store.list_topics().expect("list"), vec!["a_topic", "b_topic"]);
    }

    #[test]
    fn rejects_escaping_topic_keys() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load(".."), Err(StoreError::InvalidInput(_))));
        assert!(matches!(
            store.merge("", [record("1", "A")]),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
