//! Named save storage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;

use super::error::{HistoryError, Result};
use super::format::SaveFormat;
use crate::core::GameState;

/// One saved game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameHistoryItem {
    /// `<name>.<extension>`.
    pub filename: String,
    pub format: SaveFormat,
    pub state: GameState,
    /// Last write, in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl GameHistoryItem {
    /// Save name without the extension.
    #[must_use]
    pub fn name(&self) -> &str {
        self.filename
            .strip_suffix(self.format.extension())
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(&self.filename)
    }
}

/// Storage for named saves.
///
/// A save is identified by its name and format, so `"slot1"` may exist as
/// JSON and TXT at the same time.
pub trait HistoryStore {
    /// Write `state` under `name`, replacing any previous save.
    fn save(&mut self, name: &str, format: SaveFormat, state: &GameState) -> Result<GameHistoryItem>;

    /// Read back a save.
    fn load(&self, name: &str, format: SaveFormat) -> Result<GameHistoryItem>;

    /// Every readable save, newest first.
    fn list(&self) -> Result<Vec<GameHistoryItem>>;

    /// Remove a save.
    fn delete(&mut self, name: &str, format: SaveFormat) -> Result<()>;

    /// Distinct save names, sorted.
    fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .list()?
            .iter()
            .map(|item| item.name().to_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Reject names that are empty or could escape the store's directory.
pub fn validate_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if bad {
        return Err(HistoryError::InvalidName(name.to_owned()));
    }
    Ok(())
}

fn filename(name: &str, format: SaveFormat) -> String {
    format!("{}.{}", name, format.extension())
}

fn millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    millis(SystemTime::now())
}

fn newest_first(items: &mut [GameHistoryItem]) {
    items.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

// === In-memory store ===

#[derive(Clone, Debug)]
struct Entry {
    format: SaveFormat,
    text: String,
    timestamp: u64,
    /// Write order, breaks timestamp ties.
    seq: u64,
}

/// Store that keeps encoded saves in memory.
///
/// Saves still go through their format's encoder and decoder, so a
/// `MemoryStore` behaves like a `DirectoryStore` without touching disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, Entry>,
    next_seq: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn item(filename: &str, entry: &Entry) -> Result<GameHistoryItem> {
        Ok(GameHistoryItem {
            filename: filename.to_owned(),
            format: entry.format,
            state: entry.format.decode(&entry.text)?,
            timestamp: entry.timestamp,
        })
    }
}

impl HistoryStore for MemoryStore {
    fn save(&mut self, name: &str, format: SaveFormat, state: &GameState) -> Result<GameHistoryItem> {
        validate_name(name)?;
        state.validate()?;

        let entry = Entry {
            format,
            text: format.encode(state)?,
            timestamp: now_millis(),
            seq: self.next_seq,
        };
        self.next_seq += 1;

        let filename = filename(name, format);
        log::debug!("saved {} in memory", filename);
        let item = GameHistoryItem {
            filename: filename.clone(),
            format,
            state: state.clone(),
            timestamp: entry.timestamp,
        };
        self.entries.insert(filename, entry);
        Ok(item)
    }

    fn load(&self, name: &str, format: SaveFormat) -> Result<GameHistoryItem> {
        validate_name(name)?;
        let filename = filename(name, format);
        let entry = self.entries.get(&filename).ok_or_else(|| HistoryError::NotFound {
            name: name.to_owned(),
            format,
        })?;
        Self::item(&filename, entry)
    }

    fn list(&self) -> Result<Vec<GameHistoryItem>> {
        let mut entries: Vec<(&String, &Entry)> = self.entries.iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.timestamp.cmp(&a.timestamp).then(b.seq.cmp(&a.seq)));
        entries
            .into_iter()
            .map(|(filename, entry)| Self::item(filename, entry))
            .collect()
    }

    fn delete(&mut self, name: &str, format: SaveFormat) -> Result<()> {
        validate_name(name)?;
        match self.entries.remove(&filename(name, format)) {
            Some(_) => Ok(()),
            None => Err(HistoryError::NotFound {
                name: name.to_owned(),
                format,
            }),
        }
    }
}

// === Directory store ===

/// Store that keeps one file per save, named `<name>.<extension>`.
///
/// Timestamps come from the file modification time.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a save lives at.
    pub fn path(&self, name: &str, format: SaveFormat) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(filename(name, format)))
    }

    fn read(&self, path: &Path, format: SaveFormat) -> Result<GameHistoryItem> {
        let text = fs::read_to_string(path)?;
        let timestamp = millis(fs::metadata(path)?.modified()?);
        Ok(GameHistoryItem {
            filename: path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            format,
            state: format.decode(&text)?,
            timestamp,
        })
    }

    /// Saves on disk as `(path, format)`, skipping unrelated files.
    fn entries(&self) -> Result<Vec<(PathBuf, SaveFormat)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let format = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(SaveFormat::from_extension);
            let stem_ok = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| validate_name(s).is_ok());
            if let (Some(format), true) = (format, stem_ok) {
                entries.push((path, format));
            }
        }
        Ok(entries)
    }
}

fn not_found(err: io::Error, name: &str, format: SaveFormat) -> HistoryError {
    if err.kind() == io::ErrorKind::NotFound {
        HistoryError::NotFound {
            name: name.to_owned(),
            format,
        }
    } else {
        HistoryError::Io(err)
    }
}

impl HistoryStore for DirectoryStore {
    fn save(&mut self, name: &str, format: SaveFormat, state: &GameState) -> Result<GameHistoryItem> {
        let path = self.path(name, format)?;
        state.validate()?;

        fs::write(&path, format.encode(state)?)?;
        log::debug!("saved {}", path.display());

        Ok(GameHistoryItem {
            filename: filename(name, format),
            format,
            state: state.clone(),
            timestamp: millis(fs::metadata(&path)?.modified()?),
        })
    }

    fn load(&self, name: &str, format: SaveFormat) -> Result<GameHistoryItem> {
        let path = self.path(name, format)?;
        match self.read(&path, format) {
            Err(HistoryError::Io(err)) => Err(not_found(err, name, format)),
            other => other,
        }
    }

    /// Files that fail to read or decode are logged and skipped.
    fn list(&self) -> Result<Vec<GameHistoryItem>> {
        let mut items = Vec::new();
        for (path, format) in self.entries()? {
            match self.read(&path, format) {
                Ok(item) => items.push(item),
                Err(err) => log::warn!("skipping {}: {}", path.display(), err),
            }
        }
        newest_first(&mut items);
        Ok(items)
    }

    fn delete(&mut self, name: &str, format: SaveFormat) -> Result<()> {
        let path = self.path(name, format)?;
        fs::remove_file(&path).map_err(|err| not_found(err, name, format))?;
        log::debug!("deleted {}", path.display());
        Ok(())
    }

    /// Names of every save file, readable or not.
    fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .entries()?
            .iter()
            .filter_map(|(path, _)| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardId, Difficulty, GameMode};
    use im::Vector;
    use std::time::Duration;

    fn state(elapsed: u64) -> GameState {
        let mut cards = Vector::new();
        for verb in 1..=6 {
            let id = cards.len() as u32;
            cards.push_back(Card::new(CardId::new(id), verb));
            cards.push_back(Card::new(CardId::new(id + 1), -verb));
        }
        let mut state = GameState::new(Difficulty::Easy, cards, GameMode::SinglePlayer);
        state.elapsed_time_in_seconds = elapsed;
        state
    }

    fn touch(store: &DirectoryStore, name: &str, format: SaveFormat, secs: u64) {
        let file = fs::File::options()
            .write(true)
            .open(store.path(name, format).unwrap())
            .unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("slot 1").is_ok());
        for bad in ["", "   ", "a/b", "a\\b", "..", "up..", "nul\0"] {
            assert!(
                matches!(validate_name(bad), Err(HistoryError::InvalidName(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_item_name() {
        let item = GameHistoryItem {
            filename: "slot.1.json".to_string(),
            format: SaveFormat::Json,
            state: state(0),
            timestamp: 0,
        };
        assert_eq!(item.name(), "slot.1");
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let saved = store.save("slot", SaveFormat::Xml, &state(9)).unwrap();
        assert_eq!(saved.filename, "slot.xml");

        let loaded = store.load("slot", SaveFormat::Xml).unwrap();
        assert_eq!(loaded.state, state(9));
        assert_eq!(loaded.timestamp, saved.timestamp);

        assert!(matches!(
            store.load("slot", SaveFormat::Json),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_memory_store_overwrite_and_delete() {
        let mut store = MemoryStore::new();
        store.save("a", SaveFormat::Txt, &state(1)).unwrap();
        store.save("a", SaveFormat::Txt, &state(2)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("a", SaveFormat::Txt).unwrap().state, state(2));

        store.delete("a", SaveFormat::Txt).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.delete("a", SaveFormat::Txt),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_memory_store_lists_newest_first() {
        let mut store = MemoryStore::new();
        store.save("first", SaveFormat::Json, &state(1)).unwrap();
        store.save("second", SaveFormat::Txt, &state(2)).unwrap();
        store.save("third", SaveFormat::Xml, &state(3)).unwrap();

        let order: Vec<String> = store.list().unwrap().into_iter().map(|i| i.filename).collect();
        assert_eq!(order, ["third.xml", "second.txt", "first.json"]);
        assert_eq!(store.names().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_save_rejects_invalid_state() {
        let mut broken = state(0);
        broken.moves = 3;

        let mut store = MemoryStore::new();
        assert!(matches!(
            store.save("x", SaveFormat::Json, &broken),
            Err(HistoryError::Game(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_directory_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path().join("saves")).unwrap();

        for format in SaveFormat::ALL {
            store.save("game", format, &state(4)).unwrap();
        }
        for format in SaveFormat::ALL {
            let item = store.load("game", format).unwrap();
            assert_eq!(item.state, state(4));
            assert_eq!(item.filename, format!("game.{}", format.extension()));
        }
        assert!(store.root().join("game.txt").is_file());
        assert_eq!(store.names().unwrap(), ["game"]);
    }

    #[test]
    fn test_directory_store_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();

        store.save("old", SaveFormat::Json, &state(1)).unwrap();
        store.save("new", SaveFormat::Xml, &state(2)).unwrap();
        store.save("middle", SaveFormat::Txt, &state(3)).unwrap();
        touch(&store, "old", SaveFormat::Json, 1_000);
        touch(&store, "new", SaveFormat::Xml, 3_000);
        touch(&store, "middle", SaveFormat::Txt, 2_000);

        let items = store.list().unwrap();
        let order: Vec<&str> = items.iter().map(|i| i.name()).collect();
        assert_eq!(order, ["new", "middle", "old"]);
        assert_eq!(items[0].timestamp, 3_000_000);
    }

    #[test]
    fn test_directory_store_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();
        store.save("good", SaveFormat::Json, &state(1)).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let items = store.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "good");
        assert_eq!(store.names().unwrap(), ["broken", "good"]);

        assert!(matches!(
            store.load("broken", SaveFormat::Json),
            Err(HistoryError::Json(_))
        ));
    }

    #[test]
    fn test_directory_store_missing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.load("ghost", SaveFormat::Txt),
            Err(HistoryError::NotFound { .. })
        ));

        store.save("gone", SaveFormat::Txt, &state(0)).unwrap();
        store.delete("gone", SaveFormat::Txt).unwrap();
        assert!(!store.root().join("gone.txt").exists());
        assert!(matches!(
            store.delete("gone", SaveFormat::Txt),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_directory_store_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.save("../outside", SaveFormat::Json, &state(0)),
            Err(HistoryError::InvalidName(_))
        ));
    }
}
