use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{is_safe_stem, EntityRecord, RecordKey};

/// Lookup of entity records by key.
pub trait RecordStore {
    /// Record for `key`, or `None` when the store has no usable entry.
    fn lookup(&self, key: &RecordKey) -> Option<EntityRecord>;

    /// Every key the store can be asked for, in a stable order.
    fn keys(&self) -> Vec<RecordKey>;
}

/// Records stored as PokeAPI JSON documents in a directory.
///
/// `<dex_dir>/<key>.json` holds one record. The key list comes from a JSON
/// object whose values are keys (`{"1": "bulbasaur", ...}`); when that file
/// is missing the stems of the dex directory are listed instead.
pub struct DirRecordStore {
    dex_dir: PathBuf,
    list_path: PathBuf,
    language: String,
}

impl DirRecordStore {
    pub fn new(
        dex_dir: impl Into<PathBuf>,
        list_path: impl Into<PathBuf>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            dex_dir: dex_dir.into(),
            list_path: list_path.into(),
            language: language.into(),
        }
    }

    pub fn dex_dir(&self) -> &Path {
        &self.dex_dir
    }

    fn read_list(&self) -> Option<Vec<RecordKey>> {
        let content = fs::read_to_string(&self.list_path).ok()?;
        match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&content) {
            Ok(map) => Some(
                map.into_values()
                    .filter_map(|v| match v {
                        serde_json::Value::String(s) => Some(RecordKey::parse(&s)),
                        serde_json::Value::Number(n) => {
                            n.as_u64().and_then(|n| u32::try_from(n).ok()).map(RecordKey::Id)
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(path = %self.list_path.display(), %e, "Failed to parse record list");
                None
            }
        }
    }

    fn list_dex_dir(&self) -> Vec<RecordKey> {
        let entries = match fs::read_dir(&self.dex_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.dex_dir.display(), %e, "Failed to read dex directory");
                return Vec::new();
            }
        };
        let mut keys: Vec<RecordKey> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().map(|s| RecordKey::parse(&s.to_string_lossy())))
            .collect();
        keys.sort();
        keys
    }
}

impl RecordStore for DirRecordStore {
    fn lookup(&self, key: &RecordKey) -> Option<EntityRecord> {
        let stem = key.to_string();
        if !is_safe_stem(&stem) {
            tracing::warn!(key = %stem, "Rejected record key that is not a plain file name");
            return None;
        }
        let path = self.dex_dir.join(format!("{stem}.json"));
        let content = fs::read_to_string(&path).ok()?;
        match EntityRecord::from_pokeapi_json(&content, &self.language) {
            Ok(record) => {
                tracing::debug!(
                    key = %key,
                    id = record.id,
                    descriptions = record.description_candidates.len(),
                    "Loaded record"
                );
                Some(record)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to parse record");
                None
            }
        }
    }

    fn keys(&self) -> Vec<RecordKey> {
        self.read_list().unwrap_or_else(|| self.list_dex_dir())
    }
}

/// Records held in memory; a record answers to both its id and its name.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Vec<EntityRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: EntityRecord) -> Self {
        self.insert(record);
        self
    }

    /// Add or replace the record with the same id.
    pub fn insert(&mut self, record: EntityRecord) {
        self.records.retain(|r| r.id != record.id);
        self.records.push(record);
        self.records.sort_by_key(|r| r.id);
    }
}

impl RecordStore for InMemoryRecordStore {
    fn lookup(&self, key: &RecordKey) -> Option<EntityRecord> {
        self.records.iter().find(|r| key.matches(r)).cloned()
    }

    fn keys(&self) -> Vec<RecordKey> {
        self.records.iter().map(|r| RecordKey::Id(r.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "types": [{"slot": 1, "type": {"name": "electric"}}],
        "flavor_text_entries": [
            {"flavor_text": "When several of\nthese gather,", "language": {"name": "en"}},
            {"flavor_text": "Il lui arrive", "language": {"name": "fr"}}
        ]
    }"#;

    fn dex_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("dex")).unwrap();
        fs::write(dir.path().join("dex/25.json"), PIKACHU).unwrap();
        dir
    }

    #[test]
    fn test_dir_lookup_filters_language() {
        let dir = dex_dir();
        let store = DirRecordStore::new(dir.path().join("dex"), dir.path().join("pokemon.json"), "en");

        let record = store.lookup(&RecordKey::Id(25)).unwrap();
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.categories[0].name, "electric");
        assert_eq!(record.description_candidates, vec!["When several of these gather,"]);
    }

    #[test]
    fn test_dir_lookup_missing_and_broken() {
        let dir = dex_dir();
        fs::write(dir.path().join("dex/26.json"), "{ not json").unwrap();
        let store = DirRecordStore::new(dir.path().join("dex"), dir.path().join("pokemon.json"), "en");

        assert!(store.lookup(&RecordKey::Id(1)).is_none());
        assert!(store.lookup(&RecordKey::Id(26)).is_none());
    }

    #[test]
    fn test_dir_lookup_rejects_path_keys() {
        let dir = dex_dir();
        // A record outside the dex directory must stay unreachable
        fs::write(dir.path().join("outside.json"), PIKACHU).unwrap();
        let store = DirRecordStore::new(dir.path().join("dex"), dir.path().join("pokemon.json"), "en");

        assert!(store.lookup(&RecordKey::parse("../outside")).is_none());
        assert!(store.lookup(&RecordKey::Name("..".to_string())).is_none());
        assert!(store.lookup(&RecordKey::Name("sub/25".to_string())).is_none());
        assert!(store.lookup(&RecordKey::Id(25)).is_some());
    }

    #[test]
    fn test_dir_keys_from_list() {
        let dir = dex_dir();
        fs::write(dir.path().join("pokemon.json"), r#"{"1": "25", "2": "pikachu"}"#).unwrap();
        let store = DirRecordStore::new(dir.path().join("dex"), dir.path().join("pokemon.json"), "en");

        assert_eq!(
            store.keys(),
            vec![RecordKey::Id(25), RecordKey::Name("pikachu".to_string())]
        );
    }

    #[test]
    fn test_dir_keys_fall_back_to_dex_listing() {
        let dir = dex_dir();
        fs::write(dir.path().join("dex/7.json"), "{}").unwrap();
        fs::write(dir.path().join("dex/notes.txt"), "").unwrap();
        let store = DirRecordStore::new(dir.path().join("dex"), dir.path().join("pokemon.json"), "en");

        assert_eq!(store.keys(), vec![RecordKey::Id(7), RecordKey::Id(25)]);
    }

    #[test]
    fn test_in_memory_lookup_by_id_and_name() {
        let store = InMemoryRecordStore::new()
            .with_record(EntityRecord::new(25, "pikachu"))
            .with_record(EntityRecord::new(1, "bulbasaur"));

        assert_eq!(store.lookup(&RecordKey::parse("Pikachu")).unwrap().id, 25);
        assert_eq!(store.lookup(&RecordKey::Id(1)).unwrap().name, "bulbasaur");
        assert!(store.lookup(&RecordKey::Id(2)).is_none());
        assert_eq!(store.keys(), vec![RecordKey::Id(1), RecordKey::Id(25)]);
    }

    #[test]
    fn test_in_memory_insert_replaces() {
        let mut store = InMemoryRecordStore::new().with_record(EntityRecord::new(25, "pikachu"));
        store.insert(EntityRecord::new(25, "raichu"));
        assert_eq!(store.keys().len(), 1);
        assert_eq!(store.lookup(&RecordKey::Id(25)).unwrap().name, "raichu");
    }
}
