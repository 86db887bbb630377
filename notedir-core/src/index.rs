//! Live date-to-note index.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::NotedirResult;
use crate::granularity::Granularity;
use crate::parse;
use crate::settings::SettingsResolver;
use crate::store::{DocumentStore, FileEvent, NOTE_EXTENSION, NoteFile};
use crate::uid::DateUid;

/// Mapping from period UID to the note file for that period.
///
/// Populated by a full scan of each supported granularity's folder and kept
/// current by the host feeding change notifications into [`apply`]. The
/// mapping lives for the session only; it is rebuilt, never persisted.
///
/// [`apply`]: PeriodicNoteIndex::apply
pub struct PeriodicNoteIndex {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<SettingsResolver>,
    notes: HashMap<DateUid, NoteFile>,
}

impl PeriodicNoteIndex {
    pub fn new(store: Arc<dyn DocumentStore>, resolver: Arc<SettingsResolver>) -> Self {
        PeriodicNoteIndex { store, resolver, notes: HashMap::new() }
    }

    /// Rebuild the mapping from a full scan.
    ///
    /// Also the re-entry point when settings change: a format or folder
    /// change invalidates every prior parse, so the whole mapping is replaced.
    /// A failed scan is logged and keeps the previous mapping intact.
    pub fn initialize(&mut self) {
        match self.scan_all() {
            Ok(notes) => self.notes = notes,
            Err(err) => log::error!("Failed to initialize periodic note index: {err}"),
        }
    }

    fn scan_all(&self) -> NotedirResult<HashMap<DateUid, NoteFile>> {
        let mut merged = HashMap::new();
        for granularity in Granularity::INDEXED {
            if !self.resolver.has_support(granularity) {
                continue;
            }
            for (uid, file) in self.scan(granularity)? {
                let previous = merged.insert(uid, file);
                debug_assert!(
                    previous.is_none(),
                    "granularity-tagged UIDs cannot collide across granularities"
                );
            }
        }
        Ok(merged)
    }

    fn scan(&self, granularity: Granularity) -> NotedirResult<HashMap<DateUid, NoteFile>> {
        let folder = self.resolver.resolve(granularity).folder;
        let mut notes = HashMap::new();
        for file in self.store.list_files(&folder)? {
            if file.extension() != NOTE_EXTENSION {
                continue;
            }
            if let Some(date) = parse::date_from_file(&self.resolver, &file, granularity) {
                notes.insert(DateUid::new(date, granularity), file);
            }
        }
        Ok(notes)
    }

    pub fn on_created(&mut self, file: &NoteFile) {
        if file.extension() != NOTE_EXTENSION {
            return;
        }
        if let Some(uid) = parse::first_matching_uid(&self.resolver, file) {
            self.notes.insert(uid, file.clone());
        }
    }

    pub fn on_modified(&mut self, file: &NoteFile) {
        self.on_created(file);
    }

    pub fn on_deleted(&mut self, file: &NoteFile) {
        if file.extension() != NOTE_EXTENSION {
            return;
        }
        if let Some(uid) = parse::first_matching_uid(&self.resolver, file) {
            self.notes.remove(&uid);
        }
    }

    /// Delete-then-create, in that order: the old UID comes from `old_path`
    /// (the file handle already reflects the new path), and the insert must
    /// run second so an entry survives when old and new UID coincide.
    pub fn on_renamed(&mut self, file: &NoteFile, old_path: &str) {
        if let Some(uid) = parse::first_matching_uid_for_path(&self.resolver, old_path) {
            self.notes.remove(&uid);
        }
        self.on_created(file);
    }

    /// Dispatch one change notification. The only mutation path once
    /// populated; there is no periodic rescan.
    pub fn apply(&mut self, event: &FileEvent) {
        match event {
            FileEvent::Created(file) => self.on_created(file),
            FileEvent::Deleted(file) => self.on_deleted(file),
            FileEvent::Modified(file) => self.on_modified(file),
            FileEvent::Renamed { file, old_path } => self.on_renamed(file, old_path),
        }
    }

    pub fn lookup(&self, uid: &DateUid) -> Option<&NoteFile> {
        self.notes.get(uid)
    }

    pub fn lookup_by_date(&self, date: NaiveDate, granularity: Granularity) -> Option<&NoteFile> {
        self.lookup(&DateUid::new(date, granularity))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
