//! Open-or-create orchestration.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::create::NoteCreator;
use crate::error::NotedirResult;
use crate::granularity::Granularity;
use crate::pattern;
use crate::settings::SettingsResolver;
use crate::store::{NoteFile, UserInterface};

/// Open `existing` when there is one; otherwise materialize the note for
/// `date`, optionally gated behind a confirmation naming the would-be
/// filename. `on_created` runs exactly once after a successful create-and-
/// open, and never otherwise (declining the confirmation is not an error).
#[allow(clippy::too_many_arguments)]
pub(crate) async fn open_or_create(
    creator: &NoteCreator,
    resolver: &SettingsResolver,
    ui: &Arc<dyn UserInterface>,
    granularity: Granularity,
    date: NaiveDate,
    existing: Option<NoteFile>,
    in_new_split: bool,
    require_confirmation: bool,
    on_created: impl FnOnce(&NoteFile),
) -> NotedirResult<()> {
    if let Some(file) = existing {
        return ui.open(&file, in_new_split).await;
    }

    if require_confirmation {
        let filename = pattern::format_date(date, &resolver.resolve(granularity).format);
        let title = format!("New {} Note", granularity.label());
        let text = format!("File {filename} does not exist. Would you like to create it?");
        if !ui.confirm(&title, &text).await {
            return Ok(());
        }
    }

    let note = creator.create_note(granularity, date).await?;
    ui.open(&note, in_new_split).await?;
    on_created(&note);
    Ok(())
}
