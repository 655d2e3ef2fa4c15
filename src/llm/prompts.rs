// Prompt assembly for repository analysis.
// Builds the chat messages sent to the LLM from fetched repository data.

use crate::github::{FileTree, RepoStats};

use super::client::ChatMessage;

/// How many tree paths to include before eliding the rest.
const MAX_TREE_LINES: usize = 300;

const ANALYST_ROLE: &str = "You are a senior software architect. You are given metadata, \
the file tree, and key source files of a GitHub repository. Write a concise architecture \
analysis: purpose, main components, how they interact, notable design decisions, and \
potential weak points. Use markdown headings.";

const GUIDELINES_ROLE: &str = "You are a senior software architect. Given an architecture \
analysis of a repository, derive practical development guidelines for contributors: \
conventions to follow, areas needing care, and suggested improvements. Use a markdown list.";

/// Messages for the architecture-analysis generation.
pub fn analysis_messages(
    owner: &str,
    repo: &str,
    stats: &RepoStats,
    tree: &FileTree,
    snippets: &str,
) -> Vec<ChatMessage> {
    let context = format!(
        "Repository: {}/{}\n\n{}\n\nFile tree:\n{}\n\nKey files:\n{}",
        owner,
        repo,
        format_stats(stats),
        format_tree(tree),
        snippets
    );

    vec![ChatMessage::system(ANALYST_ROLE), ChatMessage::user(context)]
}

/// Messages for deriving development guidelines from a finished analysis.
pub fn guidelines_messages(owner: &str, repo: &str, analysis: &str) -> Vec<ChatMessage> {
    let context = format!(
        "Architecture analysis of {}/{}:\n\n{}",
        owner, repo, analysis
    );

    vec![
        ChatMessage::system(GUIDELINES_ROLE),
        ChatMessage::user(context),
    ]
}

/// Render stats as a compact block for the prompt.
fn format_stats(stats: &RepoStats) -> String {
    format!(
        "Stars: {}  Forks: {}  Watchers: {}  Open issues: {}\n\
         Primary language: {}\n\
         Default branch: {}\n\
         Created: {}  Updated: {}",
        stats.stars,
        stats.forks,
        stats.watchers,
        stats.open_issues,
        stats.language.as_deref().unwrap_or("unknown"),
        stats.default_branch,
        stats.created_at.format("%Y-%m-%d"),
        stats.updated_at.format("%Y-%m-%d"),
    )
}

/// Render the tree as one path per line, elided past `MAX_TREE_LINES`.
fn format_tree(tree: &FileTree) -> String {
    let lines: Vec<&str> = tree.file_paths().take(MAX_TREE_LINES).collect();
    let total = tree.file_paths().count();

    let mut out = lines.join("\n");
    if total > lines.len() {
        out.push_str(&format!("\n... and {} more files", total - lines.len()));
    }
    if tree.truncated {
        out.push_str("\n(listing truncated by GitHub)");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{TreeEntry, TreeEntryKind};
    use chrono::Utc;

    fn sample_stats() -> RepoStats {
        RepoStats {
            stars: 42,
            forks: 7,
            watchers: 40,
            default_branch: "main".to_string(),
            open_issues: 3,
            language: Some("Rust".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_tree() -> FileTree {
        FileTree {
            entries: vec![
                TreeEntry {
                    path: "Cargo.toml".to_string(),
                    kind: TreeEntryKind::Blob,
                },
                TreeEntry {
                    path: "src/main.rs".to_string(),
                    kind: TreeEntryKind::Blob,
                },
            ],
            truncated: false,
        }
    }

    #[test]
    fn test_analysis_messages_carry_context() {
        let messages = analysis_messages(
            "acme",
            "widgets",
            &sample_stats(),
            &sample_tree(),
            "===== Cargo.toml =====\n[package]\n",
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        let user = &messages[1].content;
        assert!(user.contains("acme/widgets"));
        assert!(user.contains("Stars: 42"));
        assert!(user.contains("src/main.rs"));
        assert!(user.contains("===== Cargo.toml ====="));
    }

    #[test]
    fn test_guidelines_messages_embed_analysis() {
        let messages = guidelines_messages("acme", "widgets", "## Overview\nA widget factory.");
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("A widget factory."));
    }

    #[test]
    fn test_format_tree_elides_long_listings() {
        let entries = (0..400)
            .map(|i| TreeEntry {
                path: format!("src/file_{}.rs", i),
                kind: TreeEntryKind::Blob,
            })
            .collect();
        let tree = FileTree {
            entries,
            truncated: false,
        };

        let rendered = format_tree(&tree);
        assert!(rendered.contains("... and 100 more files"));
    }
}
