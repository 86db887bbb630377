//! Note materialization.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::{NotedirError, NotedirResult};
use crate::granularity::Granularity;
use crate::pattern;
use crate::settings::SettingsResolver;
use crate::store::{self, DocumentStore, FoldInfo, NOTE_EXTENSION, NoteFile, UserInterface};
use crate::template::{self, TemplateContext};

/// Creates note files for dates, expanding the configured template against
/// the target date and the creation instant.
pub struct NoteCreator {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<SettingsResolver>,
    ui: Arc<dyn UserInterface>,
}

impl NoteCreator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<SettingsResolver>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        NoteCreator { store, resolver, ui }
    }

    /// Create the note for `date` at `granularity` and return its handle.
    ///
    /// Missing intermediate folders are created first. A configured template
    /// that cannot be read downgrades to an empty one (with a user-visible
    /// warning); a store that rejects the write fails the whole creation.
    pub async fn create_note(
        &self,
        granularity: Granularity,
        date: NaiveDate,
    ) -> NotedirResult<NoteFile> {
        self.create_note_at(granularity, date, Local::now().naive_local()).await
    }

    pub(crate) async fn create_note_at(
        &self,
        granularity: Granularity,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> NotedirResult<NoteFile> {
        let settings = self.resolver.resolve(granularity);
        let filename = pattern::format_date(date, &settings.format);
        let path = note_path(&settings.folder, &filename);
        self.ensure_parent_folders(&path).await?;

        let (template_contents, folds) = match self.template_info(&settings.template).await {
            Ok(info) => info,
            Err(err) => {
                log::error!("{err}");
                self.ui.notify("Failed to read the note template");
                (String::new(), None)
            }
        };

        let context = TemplateContext {
            date,
            now: now.time(),
            filename: &filename,
            format: &settings.format,
            granularity,
        };
        let content = template::expand(&template_contents, &context);

        let file = match self.store.create(&path, &content).await {
            Ok(file) => file,
            Err(err) => {
                log::error!("Failed to create file '{path}': {err}");
                self.ui.notify("Unable to create new file.");
                return Err(NotedirError::Creation(path, err.to_string()));
            }
        };

        if let Some(folds) = folds {
            // Cosmetic state; the note itself is already on disk.
            if let Err(err) = self.store.save_folds(&file, &folds) {
                log::warn!("Failed to persist fold state for '{}': {err}", file.path());
            }
        }
        Ok(file)
    }

    /// Template content and fold state. The caller downgrades a read failure
    /// to an empty template so note creation still succeeds.
    async fn template_info(&self, template: &str) -> NotedirResult<(String, Option<FoldInfo>)> {
        let template_path = store::normalize_path(template);
        if template_path.is_empty() {
            return Ok((String::new(), None));
        }
        match self.store.read(&template_path).await {
            Ok(contents) => {
                let folds = self.store.load_folds(&template_path);
                Ok((contents, folds))
            }
            Err(err) => Err(NotedirError::TemplateRead(template_path, err.to_string())),
        }
    }

    /// Create every missing folder above `path`; existing folders are left
    /// untouched.
    async fn ensure_parent_folders(&self, path: &str) -> NotedirResult<()> {
        let Some((folders, _)) = path.rsplit_once('/') else {
            return Ok(());
        };
        let mut built = String::new();
        for segment in folders.split('/') {
            if !built.is_empty() {
                built.push('/');
            }
            built.push_str(segment);
            if !self.store.folder_exists(&built) {
                self.store.create_folder(&built).await?;
            }
        }
        Ok(())
    }
}

/// Store path for a note: folder, then the formatted filename, with the note
/// extension appended when missing. Formats may contain `/`, so the filename
/// itself can introduce subfolders.
fn note_path(folder: &str, filename: &str) -> String {
    let mut name = filename.to_string();
    if !name.ends_with(&format!(".{NOTE_EXTENSION}")) {
        name.push('.');
        name.push_str(NOTE_EXTENSION);
    }
    store::normalize_path(&store::join_path(&[folder, &name]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryStore, ScriptedUi, enabled_resolver, resolver_with};
    use crate::settings::RawPeriodicSettings;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon() -> NaiveDateTime {
        date(2024, 3, 15).and_hms_opt(12, 45, 0).unwrap()
    }

    fn creator(
        store: Arc<MemoryStore>,
        resolver: SettingsResolver,
        ui: Arc<ScriptedUi>,
    ) -> NoteCreator {
        NoteCreator::new(store, Arc::new(resolver), ui)
    }

    fn day_settings(folder: &str, template: &str) -> RawPeriodicSettings {
        RawPeriodicSettings {
            enabled: true,
            format: None,
            folder: Some(folder.to_string()),
            template: Some(template.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_without_template_writes_empty_file() {
        let store = Arc::new(MemoryStore::default());
        let resolver = resolver_with(&[(Granularity::Day, day_settings("journal", ""))]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        let file = creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .expect("creation should succeed");

        assert_eq!(file.path(), "journal/2024-03-15.md");
        assert_eq!(store.contents("journal/2024-03-15.md").as_deref(), Some(""));
        assert!(store.folders.lock().unwrap().contains("journal"));
    }

    #[tokio::test]
    async fn test_create_at_store_root() {
        let store = Arc::new(MemoryStore::default());
        let resolver = enabled_resolver(&[Granularity::Day]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        let file = creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .unwrap();
        assert_eq!(file.path(), "2024-03-15.md");
    }

    #[tokio::test]
    async fn test_format_with_slashes_creates_subfolders() {
        let store = Arc::new(MemoryStore::default());
        let resolver = resolver_with(&[(
            Granularity::Day,
            RawPeriodicSettings {
                enabled: true,
                format: Some("YYYY/MM/YYYY-MM-DD".to_string()),
                folder: Some("journal".to_string()),
                template: None,
            },
        )]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        let file = creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .unwrap();

        assert_eq!(file.path(), "journal/2024/03/2024-03-15.md");
        let folders = store.folders.lock().unwrap();
        assert!(folders.contains("journal"));
        assert!(folders.contains("journal/2024"));
        assert!(folders.contains("journal/2024/03"));
    }

    #[tokio::test]
    async fn test_existing_folders_are_not_recreated() {
        let store = Arc::new(MemoryStore::default());
        store.folders.lock().unwrap().insert("journal".to_string());
        let resolver = resolver_with(&[(Granularity::Day, day_settings("journal", ""))]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        // A pre-existing folder must not make creation fail, even though the
        // store rejects duplicate folder creation.
        creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .expect("pre-existing folder is fine");
    }

    #[tokio::test]
    async fn test_template_is_expanded() {
        let store = Arc::new(MemoryStore::default());
        store.insert("templates/daily.md", "# {{title}}\n\nNext: {{date+1d:MM/DD}}\n");
        let resolver =
            resolver_with(&[(Granularity::Day, day_settings("", "templates/daily.md"))]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .unwrap();

        assert_eq!(
            store.contents("2024-03-15.md").as_deref(),
            Some("# 2024-03-15\n\nNext: 03/16\n")
        );
    }

    #[tokio::test]
    async fn test_template_read_failure_downgrades_to_empty() {
        let store = Arc::new(MemoryStore::default());
        let resolver =
            resolver_with(&[(Granularity::Day, day_settings("", "templates/missing.md"))]);
        let ui = Arc::new(ScriptedUi::default());
        let creator = creator(store.clone(), resolver, ui.clone());

        let file = creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .expect("creation should survive a template failure");

        assert_eq!(store.contents(file.path()).as_deref(), Some(""));
        let notices = ui.notices.lock().unwrap();
        assert_eq!(notices.as_slice(), ["Failed to read the note template"]);
    }

    #[tokio::test]
    async fn test_fold_state_is_copied_to_the_new_note() {
        let store = Arc::new(MemoryStore::default());
        store.insert("templates/daily.md", "");
        let folds = FoldInfo(serde_json::json!({ "folds": [{ "from": 4, "to": 9 }] }));
        store.folds.lock().unwrap().insert("templates/daily.md".to_string(), folds.clone());
        let resolver =
            resolver_with(&[(Granularity::Day, day_settings("", "templates/daily.md"))]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .unwrap();

        assert_eq!(store.folds.lock().unwrap().get("2024-03-15.md"), Some(&folds));
    }

    #[tokio::test]
    async fn test_occupied_path_fails_with_creation_error() {
        let store = Arc::new(MemoryStore::default());
        store.insert("2024-03-15.md", "already here");
        let resolver = enabled_resolver(&[Granularity::Day]);
        let ui = Arc::new(ScriptedUi::default());
        let creator = creator(store.clone(), resolver, ui.clone());

        let err = creator
            .create_note_at(Granularity::Day, date(2024, 3, 15), noon())
            .await
            .expect_err("occupied path must fail");

        assert!(matches!(err, NotedirError::Creation(..)));
        assert_eq!(store.contents("2024-03-15.md").as_deref(), Some("already here"));
        assert_eq!(ui.notices.lock().unwrap().as_slice(), ["Unable to create new file."]);
    }

    #[tokio::test]
    async fn test_weekly_note_uses_week_format_and_weekday_placeholders() {
        let store = Arc::new(MemoryStore::default());
        store.insert("templates/weekly.md", "{{monday:MM/DD}} - {{sunday:MM/DD}}");
        let resolver = resolver_with(&[(
            Granularity::Week,
            RawPeriodicSettings {
                enabled: true,
                format: None,
                folder: None,
                template: Some("templates/weekly.md".to_string()),
            },
        )]);
        let creator = creator(store.clone(), resolver, Arc::new(ScriptedUi::default()));

        let file = creator
            .create_note_at(Granularity::Week, date(2024, 3, 15), noon())
            .await
            .unwrap();

        assert_eq!(file.path(), "2024-W11.md");
        assert_eq!(store.contents("2024-W11.md").as_deref(), Some("03/11 - 03/17"));
    }
}
