//! In-memory collaborators for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{NotedirError, NotedirResult};
use crate::granularity::Granularity;
use crate::settings::{RawPeriodicSettings, SettingsProvider, SettingsResolver};
use crate::store::{DocumentStore, FoldInfo, NoteFile, UserInterface};

/// Document store backed by plain maps.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub files: Mutex<BTreeMap<String, String>>,
    pub folders: Mutex<BTreeSet<String>>,
    pub folds: Mutex<HashMap<String, FoldInfo>>,
    pub fail_listing: Mutex<bool>,
}

impl MemoryStore {
    pub fn with_files(paths: &[&str]) -> Self {
        let store = MemoryStore::default();
        for path in paths {
            store.insert(path, "");
        }
        store
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn list_files(&self, folder: &str) -> NotedirResult<Vec<NoteFile>> {
        if *self.fail_listing.lock().unwrap() {
            return Err(NotedirError::Store("listing failed".to_string()));
        }
        let prefix = if folder.is_empty() { String::new() } else { format!("{folder}/") };
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|path| path.starts_with(&prefix))
            .map(|path| NoteFile::new(path.as_str()))
            .collect())
    }

    fn folder_exists(&self, path: &str) -> bool {
        self.folders.lock().unwrap().contains(path)
    }

    async fn create_folder(&self, path: &str) -> NotedirResult<()> {
        if !self.folders.lock().unwrap().insert(path.to_string()) {
            return Err(NotedirError::Store(format!("folder '{path}' already exists")));
        }
        Ok(())
    }

    async fn read(&self, path: &str) -> NotedirResult<String> {
        self.contents(path)
            .ok_or_else(|| NotedirError::Store(format!("no such file '{path}'")))
    }

    async fn create(&self, path: &str, content: &str) -> NotedirResult<NoteFile> {
        if let Some((parent, _)) = path.rsplit_once('/') {
            if !self.folder_exists(parent) {
                return Err(NotedirError::Store(format!("missing folder '{parent}'")));
            }
        }
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(NotedirError::Store(format!("'{path}' already exists")));
        }
        files.insert(path.to_string(), content.to_string());
        Ok(NoteFile::new(path))
    }

    fn load_folds(&self, path: &str) -> Option<FoldInfo> {
        self.folds.lock().unwrap().get(path).cloned()
    }

    fn save_folds(&self, file: &NoteFile, folds: &FoldInfo) -> NotedirResult<()> {
        self.folds.lock().unwrap().insert(file.path().to_string(), folds.clone());
        Ok(())
    }
}

/// Settings provider backed by a fixed map.
#[derive(Default)]
pub(crate) struct StaticSettings {
    pub map: HashMap<Granularity, RawPeriodicSettings>,
    pub fail: bool,
}

impl StaticSettings {
    pub fn with(mut self, granularity: Granularity, raw: RawPeriodicSettings) -> Self {
        self.map.insert(granularity, raw);
        self
    }
}

impl SettingsProvider for StaticSettings {
    fn periodic_settings(
        &self,
        granularity: Granularity,
    ) -> NotedirResult<Option<RawPeriodicSettings>> {
        if self.fail {
            return Err(NotedirError::Settings("provider unavailable".to_string()));
        }
        Ok(self.map.get(&granularity).cloned())
    }
}

/// A resolver whose external provider enables `granularities` with default
/// settings (default format, root folder, no template).
pub(crate) fn enabled_resolver(granularities: &[Granularity]) -> SettingsResolver {
    let settings: Vec<_> = granularities
        .iter()
        .map(|&granularity| {
            (granularity, RawPeriodicSettings { enabled: true, ..Default::default() })
        })
        .collect();
    resolver_with(&settings)
}

/// A resolver whose external provider reports exactly `settings`.
pub(crate) fn resolver_with(settings: &[(Granularity, RawPeriodicSettings)]) -> SettingsResolver {
    let mut provider = StaticSettings::default();
    for (granularity, raw) in settings {
        provider = provider.with(*granularity, raw.clone());
    }
    SettingsResolver::new(Some(std::sync::Arc::new(provider)), None)
}

/// User interface that records everything and answers confirmations from a
/// fixed script.
pub(crate) struct ScriptedUi {
    pub accept: bool,
    pub opened: Mutex<Vec<(String, bool)>>,
    pub notices: Mutex<Vec<String>>,
    pub confirmations: Mutex<Vec<String>>,
}

impl Default for ScriptedUi {
    fn default() -> Self {
        ScriptedUi {
            accept: true,
            opened: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserInterface for ScriptedUi {
    async fn open(&self, file: &NoteFile, in_new_split: bool) -> NotedirResult<()> {
        self.opened.lock().unwrap().push((file.path().to_string(), in_new_split));
        Ok(())
    }

    async fn confirm(&self, _title: &str, text: &str) -> bool {
        self.confirmations.lock().unwrap().push(text.to_string());
        self.accept
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
