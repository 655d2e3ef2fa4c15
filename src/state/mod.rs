// State management module.
// Handles per-tab UI state for analysis, structure, cache admin, and console.

pub mod analyze;
pub mod cache_admin;
pub mod console;
pub mod structure;

pub use analyze::{AnalysisPhase, AnalyzeTabState};
pub use cache_admin::CacheAdminTabState;
pub use console::{ConsoleLevel, ConsoleMessage, ConsoleState};
pub use structure::StructureTabState;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}
