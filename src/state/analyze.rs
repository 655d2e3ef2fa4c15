// Analyze tab state management.
// Handles the repository input field, pipeline progress, and report view.

use crate::history::SearchHistory;
use crate::report::{AnalysisReport, RepoRef};

use super::LoadingState;

/// Phase of the analysis pipeline, for the progress indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    FetchingStats,
    FetchingTree,
    FetchingSnippets,
    GeneratingAnalysis,
    GeneratingGuidelines,
}

impl AnalysisPhase {
    pub fn display(&self) -> &'static str {
        match self {
            AnalysisPhase::Idle => "Idle",
            AnalysisPhase::FetchingStats => "Fetching repository stats",
            AnalysisPhase::FetchingTree => "Fetching file tree",
            AnalysisPhase::FetchingSnippets => "Fetching key files",
            AnalysisPhase::GeneratingAnalysis => "Generating analysis",
            AnalysisPhase::GeneratingGuidelines => "Deriving guidelines",
        }
    }
}

/// State for the Analyze tab.
#[derive(Debug)]
pub struct AnalyzeTabState {
    /// Repository input field contents.
    pub input: String,
    /// Whether the input field has focus (vs. the report view).
    pub input_focused: bool,
    /// Repository currently analyzed (set when a run starts). The cache
    /// admin tab scopes "clear this repo" to this value.
    pub current_repo: Option<RepoRef>,
    /// Current pipeline phase.
    pub phase: AnalysisPhase,
    /// The report, once generated.
    pub report: LoadingState<AnalysisReport>,
    /// Vertical scroll offset for the report view.
    pub scroll_y: u16,
    /// Persisted recent inputs.
    pub history: SearchHistory,
    /// Selection index into history when cycling with Up/Down.
    pub history_index: Option<usize>,
}

impl Default for AnalyzeTabState {
    fn default() -> Self {
        Self {
            input: String::new(),
            input_focused: true,
            current_repo: None,
            phase: AnalysisPhase::Idle,
            report: LoadingState::Idle,
            scroll_y: 0,
            history: SearchHistory::default(),
            history_index: None,
        }
    }
}

impl AnalyzeTabState {
    pub fn new() -> Self {
        Self {
            history: SearchHistory::load_default(),
            ..Self::default()
        }
    }

    /// Append a typed character to the input.
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.history_index = None;
    }

    /// Remove the last character from the input.
    pub fn pop_char(&mut self) {
        self.input.pop();
        self.history_index = None;
    }

    /// Cycle to an older history entry (Up in the input field).
    pub fn history_prev(&mut self) {
        if self.history.entries.is_empty() {
            return;
        }
        let next = match self.history_index {
            Some(i) if i + 1 < self.history.entries.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.history_index = Some(next);
        self.input = self.history.entries[next].clone();
    }

    /// Cycle to a newer history entry (Down in the input field); past the
    /// newest entry the input clears.
    pub fn history_next(&mut self) {
        match self.history_index {
            Some(0) | None => {
                self.history_index = None;
                self.input.clear();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.input = self.history.entries[i - 1].clone();
            }
        }
    }

    /// Mark the start of a pipeline run for `repo`. The caller persists
    /// the updated history.
    pub fn start_run(&mut self, repo: RepoRef) {
        self.history.record(&repo.full_name());
        self.history_index = None;
        self.current_repo = Some(repo);
        self.phase = AnalysisPhase::FetchingStats;
        self.report = LoadingState::Loading;
        self.scroll_y = 0;
    }

    /// Record the finished report.
    pub fn finish_run(&mut self, report: AnalysisReport) {
        self.phase = AnalysisPhase::Idle;
        self.report = LoadingState::Loaded(report);
        self.input_focused = false;
        self.scroll_y = 0;
    }

    /// Record a failed run.
    pub fn fail_run(&mut self, error: String) {
        self.phase = AnalysisPhase::Idle;
        self.report = LoadingState::Error(error);
    }

    pub fn is_running(&self) -> bool {
        self.report.is_loading()
    }

    /// Scroll the report view.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_y = self.scroll_y.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_y = self.scroll_y.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_cycling() {
        let mut state = AnalyzeTabState::default();
        state.history.record("first/repo");
        state.history.record("second/repo");

        state.history_prev();
        assert_eq!(state.input, "second/repo");
        state.history_prev();
        assert_eq!(state.input, "first/repo");
        // Stays at oldest.
        state.history_prev();
        assert_eq!(state.input, "first/repo");

        state.history_next();
        assert_eq!(state.input, "second/repo");
        state.history_next();
        assert_eq!(state.input, "");
        assert!(state.history_index.is_none());
    }

    #[test]
    fn test_typing_resets_history_cursor() {
        let mut state = AnalyzeTabState::default();
        state.history.record("acme/widgets");
        state.history_prev();
        assert!(state.history_index.is_some());

        state.push_char('x');
        assert!(state.history_index.is_none());
    }

    #[test]
    fn test_start_run_records_history_and_state() {
        let mut state = AnalyzeTabState::default();
        state.start_run(RepoRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
        });

        assert!(state.is_running());
        assert_eq!(state.phase, AnalysisPhase::FetchingStats);
        assert_eq!(state.history.entries[0], "acme/widgets");
    }

    #[test]
    fn test_fail_run_surfaces_error() {
        let mut state = AnalyzeTabState::default();
        state.start_run(RepoRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
        });
        state.fail_run("boom".to_string());

        assert!(!state.is_running());
        assert!(matches!(state.report, LoadingState::Error(ref e) if e == "boom"));
    }
}
