// App state and main event loop.
// Manages tabs, keyboard input, and the background analysis pipeline.

use std::io;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cache::ResponseCache;
use crate::github::{RateLimit, RepoFetcher};
use crate::llm::{LlmClient, prompts};
use crate::report::{AnalysisReport, RepoRef};
use crate::state::{
    AnalysisPhase, AnalyzeTabState, CacheAdminTabState, ConsoleState, StructureTabState,
};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analyze,
    Structure,
    Cache,
    Console,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Analyze => "Analyze",
            Tab::Structure => "Structure",
            Tab::Cache => "Cache",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Analyze => Tab::Structure,
            Tab::Structure => Tab::Cache,
            Tab::Cache => Tab::Console,
            Tab::Console => Tab::Analyze,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Analyze => Tab::Console,
            Tab::Structure => Tab::Analyze,
            Tab::Cache => Tab::Structure,
            Tab::Console => Tab::Cache,
        }
    }
}

/// Messages sent from the background pipeline task to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Phase(AnalysisPhase),
    TreeLoaded {
        branch: String,
        tree: crate::github::FileTree,
    },
    RunCompleted(Box<AnalysisReport>),
    RunFailed(String),
    Info(String),
    RateLimit(RateLimit),
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,

    /// Shared response cache (one instance for the whole process).
    pub cache: Arc<ResponseCache>,
    /// Cached GitHub fetcher, shared with the pipeline task.
    fetcher: Arc<Mutex<RepoFetcher>>,
    /// LLM client, absent when no API key is configured.
    llm: Option<Arc<LlmClient>>,
    /// Rate limit from the most recent GitHub response.
    pub rate_limit: RateLimit,

    /// Per-tab state.
    pub analyze: AnalyzeTabState,
    pub structure: StructureTabState,
    pub cache_admin: CacheAdminTabState,
    pub console: ConsoleState,

    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        fetcher: RepoFetcher,
        llm: Option<LlmClient>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut console = ConsoleState::new();
        if llm.is_none() {
            console.log_warn(
                "No LLM API key found; analysis runs will fail until one is configured",
            );
        }

        Self {
            active_tab: Tab::default(),
            show_help: false,
            should_quit: false,
            cache,
            fetcher: Arc::new(Mutex::new(fetcher)),
            llm: llm.map(Arc::new),
            rate_limit: RateLimit::default(),
            analyze: AnalyzeTabState::new(),
            structure: StructureTabState::new(),
            cache_admin: CacheAdminTabState::new(),
            console,
            events_tx,
            events_rx,
        }
    }

    /// Main event loop: draw, drain pipeline events, handle keys.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.drain_events();
            self.handle_input()?;
        }
        Ok(())
    }

    /// Apply any pending events from the pipeline task.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Phase(phase) => {
                    self.console.log_info(phase.display());
                    self.analyze.phase = phase;
                }
                AppEvent::TreeLoaded { branch, tree } => {
                    self.structure.set_loaded(branch, tree);
                }
                AppEvent::RunCompleted(report) => {
                    self.console
                        .log_info(format!("Analysis of {} complete", report.repo.full_name()));
                    self.analyze.finish_run(*report);
                    self.cache_admin.refresh(&self.cache);
                }
                AppEvent::RunFailed(error) => {
                    self.console.log_error(error.clone());
                    self.analyze.fail_run(error);
                    if self.structure.tree.is_loading() {
                        self.structure.set_error("analysis failed".to_string());
                    }
                }
                AppEvent::Info(message) => self.console.log_info(message),
                AppEvent::RateLimit(rate) => self.rate_limit = rate,
            }
        }
    }

    /// Handle keyboard events, with a short poll so pipeline events keep
    /// flowing while idle.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any dismissal key closes help; everything else is ignored.
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        let editing = self.active_tab == Tab::Analyze && self.analyze.input_focused;

        // Keys that apply regardless of tab (suppressed while typing).
        if !editing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.switch_tab(self.active_tab.next());
                return;
            }
            KeyCode::BackTab => {
                self.switch_tab(self.active_tab.prev());
                return;
            }
            _ => {}
        }

        match self.active_tab {
            Tab::Analyze => self.handle_analyze_key(key),
            Tab::Structure => self.handle_structure_key(key),
            Tab::Cache => self.handle_cache_key(key),
            Tab::Console => self.handle_console_key(key),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        match tab {
            Tab::Console => self.console.mark_read(),
            Tab::Cache => self.cache_admin.refresh(&self.cache),
            _ => {}
        }
    }

    fn handle_analyze_key(&mut self, key: KeyEvent) {
        if self.analyze.input_focused {
            match key.code {
                KeyCode::Enter => self.start_analysis(),
                KeyCode::Backspace => self.analyze.pop_char(),
                KeyCode::Up => self.analyze.history_prev(),
                KeyCode::Down => self.analyze.history_next(),
                KeyCode::Esc => {
                    if self.analyze.report.is_loaded() {
                        self.analyze.input_focused = false;
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.analyze.push_char(c);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('e') | KeyCode::Char('i') | KeyCode::Char('/') => {
                self.analyze.input_focused = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.analyze.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.analyze.scroll_down(1),
            KeyCode::PageUp => self.analyze.scroll_up(20),
            KeyCode::PageDown => self.analyze.scroll_down(20),
            KeyCode::Home => self.analyze.scroll_y = 0,
            KeyCode::Char('s') => self.export_report(),
            KeyCode::Char('r') => self.start_analysis(),
            _ => {}
        }
    }

    fn handle_structure_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.structure.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.structure.scroll_down(1),
            KeyCode::Left | KeyCode::Char('h') => self.structure.scroll_left(),
            KeyCode::Right | KeyCode::Char('l') => self.structure.scroll_right(),
            KeyCode::PageUp => self.structure.scroll_up(20),
            KeyCode::PageDown => self.structure.scroll_down(20),
            KeyCode::Home => self.structure.scroll_y = 0,
            _ => {}
        }
    }

    fn handle_cache_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cache_admin.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.cache_admin.select_next(),
            KeyCode::Char('r') => {
                self.cache_admin.refresh(&self.cache);
            }
            KeyCode::Char('d') => {
                self.cache_admin.clear_selected(&self.cache);
                if let Some(message) = &self.cache_admin.last_action {
                    self.console.log_info(message.clone());
                }
            }
            KeyCode::Char('c') => {
                if let Some(repo) = self.analyze.current_repo.clone() {
                    self.cache_admin.clear_repo(&self.cache, &repo);
                    if let Some(message) = &self.cache_admin.last_action {
                        self.console.log_info(message.clone());
                    }
                } else {
                    self.console
                        .log_warn("No repository analyzed yet; nothing to clear");
                }
            }
            KeyCode::Char('C') => {
                self.cache_admin.clear_all(&self.cache);
                if let Some(message) = &self.cache_admin.last_action {
                    self.console.log_info(message.clone());
                }
            }
            _ => {}
        }
    }

    fn handle_console_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.console.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.console.select_next(),
            _ => {}
        }
    }

    /// Kick off the analysis pipeline for the repository in the input
    /// field (or re-run the current one when invoked from the report view).
    fn start_analysis(&mut self) {
        if self.analyze.is_running() {
            return;
        }

        let input = if self.analyze.input_focused {
            self.analyze.input.clone()
        } else {
            match &self.analyze.current_repo {
                Some(repo) => repo.full_name(),
                None => return,
            }
        };

        let repo = match RepoRef::parse(&input) {
            Ok(repo) => repo,
            Err(e) => {
                self.console.log_error(e.to_string());
                return;
            }
        };

        let Some(llm) = self.llm.clone() else {
            self.analyze.fail_run(
                "No LLM API key configured (set LLM_API_KEY, OPENROUTER_API_KEY, or OPENAI_API_KEY)"
                    .to_string(),
            );
            self.console.log_error("Analysis aborted: no LLM API key");
            return;
        };

        self.console
            .log_info(format!("Analyzing {}", repo.full_name()));
        self.analyze.start_run(repo.clone());
        self.analyze.history.save_default();
        self.structure.set_loading();

        let fetcher = self.fetcher.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = run_pipeline(fetcher, llm, repo, &tx).await {
                let _ = tx.send(AppEvent::RunFailed(e.to_string()));
            }
        });
    }

    /// Export the loaded report to a markdown file in the working directory.
    fn export_report(&mut self) {
        if let Some(report) = self.analyze.report.data() {
            match report.export() {
                Ok(path) => self
                    .console
                    .log_info(format!("Report exported to {}", path.display())),
                Err(e) => self.console.log_error(format!("Export failed: {}", e)),
            }
        }
    }
}

/// The analysis pipeline: stats → tree → snippets → analysis → guidelines.
/// Each fetch goes through the response cache; a repeated run within the
/// TTL window only pays for the LLM calls.
async fn run_pipeline(
    fetcher: Arc<Mutex<RepoFetcher>>,
    llm: Arc<LlmClient>,
    repo: RepoRef,
    tx: &UnboundedSender<AppEvent>,
) -> crate::error::Result<()> {
    let send = |event: AppEvent| {
        let _ = tx.send(event);
    };

    let (stats, branch, tree, snippets) = {
        let mut fetcher = fetcher.lock().await;

        send(AppEvent::Phase(AnalysisPhase::FetchingStats));
        let stats = fetcher.repo_stats(&repo.owner, &repo.repo).await?;
        send(AppEvent::RateLimit(fetcher.rate_limit()));

        let branch = stats.default_branch.clone();

        send(AppEvent::Phase(AnalysisPhase::FetchingTree));
        let tree = fetcher.file_tree(&repo.owner, &repo.repo, &branch).await?;
        send(AppEvent::TreeLoaded {
            branch: branch.clone(),
            tree: tree.clone(),
        });
        send(AppEvent::RateLimit(fetcher.rate_limit()));

        send(AppEvent::Phase(AnalysisPhase::FetchingSnippets));
        let snippets = fetcher
            .file_snippets(&repo.owner, &repo.repo, &branch, &tree)
            .await?;
        send(AppEvent::RateLimit(fetcher.rate_limit()));

        (stats, branch, tree, snippets)
    };

    send(AppEvent::Phase(AnalysisPhase::GeneratingAnalysis));
    let analysis = llm
        .complete(&prompts::analysis_messages(
            &repo.owner,
            &repo.repo,
            &stats,
            &tree,
            &snippets,
        ))
        .await?;

    send(AppEvent::Phase(AnalysisPhase::GeneratingGuidelines));
    let guidelines = llm
        .complete(&prompts::guidelines_messages(
            &repo.owner,
            &repo.repo,
            &analysis,
        ))
        .await?;

    send(AppEvent::RunCompleted(Box::new(AnalysisReport {
        repo,
        branch,
        stats,
        analysis,
        guidelines,
        model: llm.model().to_string(),
        generated_at: chrono::Utc::now(),
    })));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_is_closed() {
        let mut tab = Tab::default();
        for _ in 0..4 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::default());

        for _ in 0..4 {
            tab = tab.prev();
        }
        assert_eq!(tab, Tab::default());
    }
}
