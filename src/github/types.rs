// GitHub API response types.
// Defines wire structs for deserializing GitHub REST API responses and the
// domain records derived from them for caching and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw repository response from `GET /repos/{owner}/{repo}`.
/// Only the fields the analyzer consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryResponse {
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub default_branch: String,
    pub open_issues_count: u64,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository statistics record derived from the raw response.
/// This is what gets cached and shown in the analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub default_branch: String,
    pub open_issues: u64,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RepositoryResponse> for RepoStats {
    fn from(raw: RepositoryResponse) -> Self {
        Self {
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            watchers: raw.watchers_count,
            default_branch: raw.default_branch,
            open_issues: raw.open_issues_count,
            language: raw.language,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Kind of node in a git tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    Commit,
    #[serde(other)]
    Unknown,
}

/// One node in a recursive git tree listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

/// Response from `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub tree: Vec<TreeEntry>,
    /// True when GitHub truncated the listing (very large repositories).
    #[serde(default)]
    pub truncated: bool,
}

/// File tree listing for a branch, as cached and displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTree {
    pub entries: Vec<TreeEntry>,
    pub truncated: bool,
}

impl From<TreeResponse> for FileTree {
    fn from(raw: TreeResponse) -> Self {
        Self {
            entries: raw.tree,
            truncated: raw.truncated,
        }
    }
}

impl FileTree {
    /// Paths of regular files only (directories and submodules skipped).
    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.kind == TreeEntryKind::Blob)
            .map(|e| e.path.as_str())
    }
}

/// Response from `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    pub content: String,
    pub encoding: String,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
