//! Root object embedding shells construct.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::create::NoteCreator;
use crate::error::NotedirResult;
use crate::granularity::Granularity;
use crate::index::PeriodicNoteIndex;
use crate::open;
use crate::settings::SettingsResolver;
use crate::store::{DocumentStore, FileEvent, NoteFile, UserInterface};
use crate::uid::DateUid;

/// The periodic-note core, wired to one document store, one settings
/// resolver and one user interface.
///
/// The embedding shell constructs this once per session, calls
/// [`initialize`] when the store is ready (and again whenever settings or
/// calendar metadata change), and forwards every store change notification
/// into [`handle_event`]. Lookups and [`open_or_create`] are the read
/// surface the UI renders from.
///
/// [`initialize`]: Notedir::initialize
/// [`handle_event`]: Notedir::handle_event
/// [`open_or_create`]: Notedir::open_or_create
pub struct Notedir {
    resolver: Arc<SettingsResolver>,
    ui: Arc<dyn UserInterface>,
    creator: NoteCreator,
    index: PeriodicNoteIndex,
}

impl Notedir {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<SettingsResolver>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        let creator = NoteCreator::new(store.clone(), resolver.clone(), ui.clone());
        let index = PeriodicNoteIndex::new(store, resolver.clone());
        Notedir { resolver, ui, creator, index }
    }

    /// Build (or rebuild) the index from a full scan.
    pub fn initialize(&mut self) {
        self.index.initialize();
    }

    /// Feed one store change notification into the index.
    pub fn handle_event(&mut self, event: &FileEvent) {
        self.index.apply(event);
    }

    pub fn lookup_by_uid(&self, uid: &DateUid) -> Option<&NoteFile> {
        self.index.lookup(uid)
    }

    pub fn lookup_by_date(&self, date: NaiveDate, granularity: Granularity) -> Option<&NoteFile> {
        self.index.lookup_by_date(date, granularity)
    }

    pub fn index(&self) -> &PeriodicNoteIndex {
        &self.index
    }

    pub fn resolver(&self) -> &SettingsResolver {
        &self.resolver
    }

    /// Materialize the note for `date` without opening it.
    pub async fn create_note(
        &self,
        granularity: Granularity,
        date: NaiveDate,
    ) -> NotedirResult<NoteFile> {
        self.creator.create_note(granularity, date).await
    }

    /// Open `existing` or materialize the note for `date`; see the crate docs
    /// for the confirmation and callback contract.
    pub async fn open_or_create(
        &self,
        granularity: Granularity,
        date: NaiveDate,
        existing: Option<NoteFile>,
        in_new_split: bool,
        require_confirmation: bool,
        on_created: impl FnOnce(&NoteFile),
    ) -> NotedirResult<()> {
        open::open_or_create(
            &self.creator,
            &self.resolver,
            &self.ui,
            granularity,
            date,
            existing,
            in_new_split,
            require_confirmation,
            on_created,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryStore, ScriptedUi, enabled_resolver};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_full_session_flow() {
        let store = Arc::new(MemoryStore::with_files(&["2024-03-15.md"]));
        let resolver = Arc::new(enabled_resolver(&Granularity::INDEXED));
        let ui = Arc::new(ScriptedUi::default());
        let mut notedir = Notedir::new(store.clone(), resolver, ui);

        notedir.initialize();
        let existing = notedir.lookup_by_date(date(2024, 3, 15), Granularity::Day).cloned();
        assert!(existing.is_some());

        // A date with no note: open_or_create materializes it, the store's
        // create notification then brings it into the index.
        assert!(notedir.lookup_by_date(date(2024, 3, 16), Granularity::Day).is_none());
        notedir
            .open_or_create(Granularity::Day, date(2024, 3, 16), None, false, false, |_| {})
            .await
            .unwrap();

        let created = NoteFile::new("2024-03-16.md");
        notedir.handle_event(&FileEvent::Created(created.clone()));
        assert_eq!(
            notedir.lookup_by_date(date(2024, 3, 16), Granularity::Day),
            Some(&created)
        );

        let uid = DateUid::from_raw("day-2024-03-16T00:00:00");
        assert_eq!(notedir.lookup_by_uid(&uid), Some(&created));
    }
}
