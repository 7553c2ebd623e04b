pub mod api;
pub mod auth;
pub mod config;
pub mod drafts;
pub mod history;
pub mod http;
pub mod rehearsal;

pub use api::{ApiConfig, ApiError, PrepNoteClient};
pub use config::Config;
pub use drafts::{AutoSave, FileStore, MemoryStore, Store, SummaryDraft, SummaryDraftKeeper};
pub use history::{HistoryItem, HistoryKind, HistoryQuery, KindFilter};
pub use http::{create_router, AppState};
pub use rehearsal::{
    MockScoringService, NotificationSink, RehearsalConfig, RehearsalResult, RehearsalRunner,
    RehearsalSession, ScoringService, Script, SessionState, ThresholdEvent, TracingSink,
};
