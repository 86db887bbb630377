//! Periodic-note core for the notedir ecosystem.
//!
//! Maintains a live, bidirectional mapping between calendar dates (day, week,
//! month, quarter, year) and note files in a hierarchical document store:
//! filenames are parsed into dates against per-granularity format patterns,
//! dates key an in-memory index that change notifications keep current, and
//! missing notes are materialized from templates on demand.
//!
//! The crate is an embedded library: it owns no storage and no UI. An
//! embedding shell injects a [`DocumentStore`], optional [`SettingsProvider`]s
//! and a [`UserInterface`] into a [`Notedir`], pushes [`FileEvent`]s as the
//! store changes, and renders from the index.

pub mod config;
pub mod create;
pub mod error;
pub mod granularity;
pub mod index;
pub mod notedir;
pub mod parse;
pub mod pattern;
pub mod settings;
pub mod store;
pub mod uid;

mod open;
mod template;

#[cfg(test)]
mod testutil;

pub use self::config::NotedirConfig;
pub use create::NoteCreator;
pub use error::{NotedirError, NotedirResult};
pub use granularity::Granularity;
pub use index::PeriodicNoteIndex;
pub use notedir::Notedir;
pub use settings::{
    PeriodicNoteSettings, RawPeriodicSettings, SettingsProvider, SettingsResolver,
};
pub use store::{
    DocumentStore, FileEvent, FoldInfo, NOTE_EXTENSION, NoteFile, UserInterface,
};
pub use uid::DateUid;
