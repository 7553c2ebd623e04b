//! Draft persistence
//!
//! A generic key-value `Store` plus the auto-save / confirm-before-restore
//! policy the editors use for in-progress work.

mod autosave;
mod store;

pub use autosave::{
    format_saved_at, AutoSave, AutoSaveEntry, AutoSaveKey, SummaryDraft, SummaryDraftKeeper,
    SUMMARY_DRAFT_KEY,
};
pub use store::{FileStore, MemoryStore, Store};
