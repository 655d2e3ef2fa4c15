// repolens: terminal UI for analyzing GitHub repository architecture.
// Fetches repository data through a TTL response cache and generates an
// analysis report via an OpenAI-compatible LLM endpoint.

mod app;
mod cache;
mod error;
mod github;
mod history;
mod llm;
mod report;
mod state;
mod ui;

use std::sync::Arc;

use app::App;
use cache::ResponseCache;
use github::{GitHubClient, RepoFetcher};
use llm::LlmClient;

#[tokio::main]
async fn main() -> error::Result<()> {
    // One process-lifetime cache instance, shared by every collaborator.
    let cache = Arc::new(ResponseCache::new());

    let client = GitHubClient::from_env()?;
    let fetcher = RepoFetcher::new(client, cache.clone());

    // The app starts without an LLM key; runs fail with a clear message
    // until one is configured.
    let llm = LlmClient::from_env().ok();

    let mut terminal = ratatui::init();
    let result = App::new(fetcher, llm, cache).run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}
