//! Flat-file persistence for the event document and the volunteer ledger.
//!
//! Each operation reads or writes a whole document. Writes land in a
//! sibling `.tmp` file first and are renamed over the target.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{WorkdayError, WorkdayResult};
use crate::event::{Event, LedgerEntry};

const EVENT_FILE: &str = "events.json";
const LEDGER_FILE: &str = "volunteers.json";

#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Open the store rooted at `data_dir`, seeding any missing document.
    pub fn open(data_dir: impl Into<PathBuf>) -> WorkdayResult<Self> {
        let store = Store {
            data_dir: data_dir.into(),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn event_path(&self) -> PathBuf {
        self.data_dir.join(EVENT_FILE)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }

    /// Create the data directory and write the seed event and an empty
    /// ledger where those files don't exist yet.
    pub fn initialize(&self) -> WorkdayResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| WorkdayError::Storage {
            path: self.data_dir.clone(),
            source,
        })?;

        if !self.event_path().exists() {
            self.write_event(&Event::seed())?;
            tracing::info!(path = %self.event_path().display(), "seeded event document");
        }

        if !self.ledger_path().exists() {
            self.write_volunteers(&[])?;
            tracing::info!(path = %self.ledger_path().display(), "created empty volunteer ledger");
        }

        Ok(())
    }

    pub fn read_event(&self) -> WorkdayResult<Event> {
        read_json(&self.event_path())
    }

    pub fn write_event(&self, event: &Event) -> WorkdayResult<()> {
        write_json(&self.event_path(), event)
    }

    /// Read the ledger. A missing file is an empty ledger; a corrupt one is
    /// an error so it never gets overwritten with an empty list.
    pub fn read_volunteers(&self) -> WorkdayResult<Vec<LedgerEntry>> {
        let path = self.ledger_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    pub fn write_volunteers(&self, entries: &[LedgerEntry]) -> WorkdayResult<()> {
        write_json(&self.ledger_path(), &entries)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> WorkdayResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkdayError::Storage {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content)
        .map_err(|e| WorkdayError::Serialization(format!("{}: {}", path.display(), e)))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> WorkdayResult<()> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| WorkdayError::Serialization(e.to_string()))?;

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    std::fs::write(&temp, content).map_err(|source| WorkdayError::Storage {
        path: temp.clone(),
        source,
    })?;
    std::fs::rename(&temp, path).map_err(|source| WorkdayError::Storage {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Volunteer;
    use tempfile::TempDir;

    fn make_entry(id: &str) -> LedgerEntry {
        let event = Event::seed();
        let volunteer = Volunteer {
            id: id.to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0100".to_string(),
            notes: String::new(),
            signup_time: "2024-04-02T08:30:00.000Z".to_string(),
            extra: Default::default(),
        };
        LedgerEntry::new(volunteer, event.task("maintenance").unwrap())
    }

    #[test]
    fn test_open_seeds_missing_documents() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();

        assert!(store.event_path().exists());
        assert!(store.ledger_path().exists());
        assert_eq!(store.read_event().unwrap(), Event::seed());
        assert!(store.read_volunteers().unwrap().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_documents() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let mut event = store.read_event().unwrap();
        event.name = "Fall Work Day".to_string();
        store.write_event(&event).unwrap();
        store.write_volunteers(&[make_entry("1")]).unwrap();

        let reopened = Store::open(dir.path()).unwrap();
        assert_eq!(reopened.read_event().unwrap().name, "Fall Work Day");
        assert_eq!(reopened.read_volunteers().unwrap().len(), 1);
    }

    #[test]
    fn test_write_of_read_event_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let before = std::fs::read(store.event_path()).unwrap();
        let event = store.read_event().unwrap();
        store.write_event(&event).unwrap();
        let after = std::fs::read(store.event_path()).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_documents_are_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let content = std::fs::read_to_string(store.event_path()).unwrap();
        assert!(content.starts_with("{\n  \"id\": \"spring-cleanup-2024\""));
        assert_eq!(std::fs::read_to_string(store.ledger_path()).unwrap(), "[]");
    }

    #[test]
    fn test_missing_event_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        std::fs::remove_file(store.event_path()).unwrap();

        assert!(matches!(
            store.read_event(),
            Err(WorkdayError::Storage { .. })
        ));
    }

    #[test]
    fn test_corrupt_event_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        std::fs::write(store.event_path(), "{ not json").unwrap();

        assert!(matches!(
            store.read_event(),
            Err(WorkdayError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_ledger_reads_empty_but_corrupt_ledger_fails() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        std::fs::remove_file(store.ledger_path()).unwrap();
        assert!(store.read_volunteers().unwrap().is_empty());

        std::fs::write(store.ledger_path(), "[{").unwrap();
        assert!(store.read_volunteers().is_err());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.write_volunteers(&[make_entry("7")]).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
