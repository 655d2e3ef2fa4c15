// Cached repository data fetcher.
// Consults the response cache before every GitHub call and populates it
// after a miss; on a hit the network is skipped entirely.

use std::sync::Arc;

use crate::cache::{CacheKey, CachedValue, Category, ResponseCache};
use crate::error::Result;

use super::client::GitHubClient;
use super::types::{FileTree, RepoStats};

/// Maximum number of key files concatenated into the snippets blob.
const MAX_SNIPPET_FILES: usize = 8;

/// Per-file excerpt limit in characters.
const MAX_SNIPPET_CHARS: usize = 4000;

/// Root-level manifest and documentation files, in priority order.
const ROOT_CANDIDATES: &[&str] = &[
    "README.md",
    "readme.md",
    "README.rst",
    "Cargo.toml",
    "package.json",
    "pyproject.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "requirements.txt",
];

/// Common program entry points, in priority order.
const ENTRY_CANDIDATES: &[&str] = &[
    "src/main.rs",
    "src/lib.rs",
    "src/index.ts",
    "src/index.tsx",
    "src/index.js",
    "src/main.ts",
    "src/main.py",
    "src/App.tsx",
    "main.py",
    "main.go",
    "index.js",
    "app.py",
];

/// Fetches repository material through the response cache.
///
/// Call pattern for every lookup: build the key, `read`; on a miss perform
/// the remote call, `write` the parsed result, return it. A hit is served
/// as-is within the TTL window without revalidation.
pub struct RepoFetcher {
    client: GitHubClient,
    cache: Arc<ResponseCache>,
}

impl RepoFetcher {
    pub fn new(client: GitHubClient, cache: Arc<ResponseCache>) -> Self {
        Self { client, cache }
    }

    /// Rate limit info from the most recent GitHub response.
    pub fn rate_limit(&self) -> crate::github::RateLimit {
        self.client.rate_limit().clone()
    }

    /// Repository statistics, cached under the `stats` category.
    pub async fn repo_stats(&mut self, owner: &str, repo: &str) -> Result<RepoStats> {
        let key = CacheKey::new(owner, repo, Category::Stats);

        if let Some(CachedValue::Stats(stats)) = self.cache.read(&key) {
            return Ok(stats);
        }

        let stats = self.client.get_repo_stats(owner, repo).await?;
        self.cache.write(key, CachedValue::Stats(stats.clone()));
        Ok(stats)
    }

    /// Recursive file tree for a branch, cached under `structure-<branch>`.
    pub async fn file_tree(&mut self, owner: &str, repo: &str, branch: &str) -> Result<FileTree> {
        let key = CacheKey::new(
            owner,
            repo,
            Category::Structure {
                branch: branch.to_string(),
            },
        );

        if let Some(CachedValue::Tree(tree)) = self.cache.read(&key) {
            return Ok(tree);
        }

        let tree = self.client.get_file_tree(owner, repo, branch).await?;
        self.cache.write(key, CachedValue::Tree(tree.clone()));
        Ok(tree)
    }

    /// Concatenated key-file excerpts for a branch, cached under
    /// `snippets-<branch>`. Individual file fetches that fail (deleted
    /// between tree and content calls, binary content) are skipped rather
    /// than failing the whole blob.
    pub async fn file_snippets(
        &mut self,
        owner: &str,
        repo: &str,
        branch: &str,
        tree: &FileTree,
    ) -> Result<String> {
        let key = CacheKey::new(
            owner,
            repo,
            Category::Snippets {
                branch: branch.to_string(),
            },
        );

        if let Some(CachedValue::Text(text)) = self.cache.read(&key) {
            return Ok(text);
        }

        let mut blob = String::new();
        for path in pick_snippet_sources(tree) {
            match self.client.get_file_content(owner, repo, &path, branch).await {
                Ok(content) => {
                    blob.push_str(&format!("===== {} =====\n", path));
                    blob.push_str(truncate_chars(&content, MAX_SNIPPET_CHARS));
                    if !blob.ends_with('\n') {
                        blob.push('\n');
                    }
                    blob.push('\n');
                }
                Err(_) => continue,
            }
        }

        self.cache.write(key, CachedValue::Text(blob.clone()));
        Ok(blob)
    }
}

/// Choose which files to excerpt for the LLM: root manifests and readme
/// first, then entry points, capped at `MAX_SNIPPET_FILES`.
pub fn pick_snippet_sources(tree: &FileTree) -> Vec<String> {
    let mut picked = Vec::new();

    for candidate in ROOT_CANDIDATES.iter().chain(ENTRY_CANDIDATES) {
        if picked.len() >= MAX_SNIPPET_FILES {
            break;
        }
        if tree.file_paths().any(|p| p == *candidate) {
            picked.push(candidate.to_string());
        }
    }

    picked
}

/// Truncate at a character boundary without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{TreeEntry, TreeEntryKind};

    fn tree_of(paths: &[&str]) -> FileTree {
        FileTree {
            entries: paths
                .iter()
                .map(|p| TreeEntry {
                    path: p.to_string(),
                    kind: TreeEntryKind::Blob,
                })
                .collect(),
            truncated: false,
        }
    }

    #[test]
    fn test_pick_prefers_readme_and_manifest() {
        let tree = tree_of(&["src/main.rs", "Cargo.toml", "README.md", "LICENSE"]);
        let picked = pick_snippet_sources(&tree);
        assert_eq!(picked, vec!["README.md", "Cargo.toml", "src/main.rs"]);
    }

    #[test]
    fn test_pick_ignores_directories() {
        let tree = FileTree {
            entries: vec![
                TreeEntry {
                    path: "README.md".to_string(),
                    kind: TreeEntryKind::Tree,
                },
                TreeEntry {
                    path: "Cargo.toml".to_string(),
                    kind: TreeEntryKind::Blob,
                },
            ],
            truncated: false,
        };
        assert_eq!(pick_snippet_sources(&tree), vec!["Cargo.toml"]);
    }

    #[test]
    fn test_pick_caps_file_count() {
        let tree = tree_of(&[
            "README.md",
            "Cargo.toml",
            "package.json",
            "pyproject.toml",
            "go.mod",
            "pom.xml",
            "build.gradle",
            "Gemfile",
            "requirements.txt",
            "src/main.rs",
        ]);
        assert_eq!(pick_snippet_sources(&tree).len(), MAX_SNIPPET_FILES);
    }

    #[test]
    fn test_pick_empty_tree_yields_nothing() {
        assert!(pick_snippet_sources(&tree_of(&[])).is_empty());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
