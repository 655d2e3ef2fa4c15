// Analysis report assembly and export.
// Holds the finished analysis for a repository and renders it to markdown.

use chrono::{DateTime, Utc};

use crate::error::{AnalyzerError, Result};
use crate::github::RepoStats;

/// A parsed repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse user input: `owner/repo`, or a github.com URL in any of the
    /// common forms (https, trailing `.git`, extra path segments).
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || AnalyzerError::InvalidRepo(trimmed.to_string());

        let path = if let Some(rest) = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .or_else(|| trimmed.strip_prefix("github.com/"))
            .or_else(|| trimmed.strip_prefix("git@github.com:"))
        {
            rest
        } else if trimmed.contains("://") || trimmed.contains('@') {
            return Err(invalid());
        } else {
            trimmed
        };

        let mut parts = path.trim_matches('/').splitn(3, '/');
        let owner = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let repo = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if repo.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// A completed repository analysis.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub repo: RepoRef,
    pub branch: String,
    pub stats: RepoStats,
    pub analysis: String,
    pub guidelines: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Render the full report as a markdown document.
    pub fn to_markdown(&self) -> String {
        format!(
            "# Architecture Analysis: {}\n\n\
             > Branch `{}` · {} stars · {} forks · {} open issues · {}\n\
             > Generated {} by {}\n\n\
             {}\n\n\
             # Development Guidelines\n\n\
             {}\n",
            self.repo.full_name(),
            self.branch,
            self.stats.stars,
            self.stats.forks,
            self.stats.open_issues,
            self.stats.language.as_deref().unwrap_or("unknown language"),
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
            self.model,
            self.analysis.trim(),
            self.guidelines.trim(),
        )
    }

    /// Default export filename, safe for any owner/repo characters.
    pub fn export_filename(&self) -> String {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                })
                .collect()
        };
        format!(
            "analysis-{}-{}.md",
            sanitize(&self.repo.owner),
            sanitize(&self.repo.repo)
        )
    }

    /// Write the markdown report to the current directory, returning the
    /// path written.
    pub fn export(&self) -> Result<std::path::PathBuf> {
        let path = std::path::PathBuf::from(self.export_filename());
        std::fs::write(&path, self.to_markdown())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_plain_owner_repo() {
        let r = RepoRef::parse("acme/widgets").unwrap();
        assert_eq!(r.owner, "acme");
        assert_eq!(r.repo, "widgets");
    }

    #[test]
    fn test_parse_https_url() {
        let r = RepoRef::parse("https://github.com/acme/widgets").unwrap();
        assert_eq!(r.full_name(), "acme/widgets");
    }

    #[test]
    fn test_parse_url_with_extra_segments_and_git_suffix() {
        let r = RepoRef::parse("https://github.com/acme/widgets/tree/main/src").unwrap();
        assert_eq!(r.full_name(), "acme/widgets");

        let r = RepoRef::parse("git@github.com:acme/widgets.git").unwrap();
        assert_eq!(r.full_name(), "acme/widgets");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RepoRef::parse("").is_err());
        assert!(RepoRef::parse("just-an-owner").is_err());
        assert!(RepoRef::parse("https://gitlab.com/acme/widgets").is_err());
        assert!(RepoRef::parse("acme/").is_err());
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            repo: RepoRef {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
            },
            branch: "main".to_string(),
            stats: RepoStats {
                stars: 10,
                forks: 2,
                watchers: 9,
                default_branch: "main".to_string(),
                open_issues: 1,
                language: Some("Rust".to_string()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            analysis: "## Overview\nA widget factory.".to_string(),
            guidelines: "- Keep widgets small.".to_string(),
            model: "test-model".to_string(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_markdown_contains_both_sections() {
        let md = sample_report().to_markdown();
        assert!(md.contains("# Architecture Analysis: acme/widgets"));
        assert!(md.contains("A widget factory."));
        assert!(md.contains("# Development Guidelines"));
        assert!(md.contains("Keep widgets small."));
    }

    #[test]
    fn test_export_filename_is_sanitized() {
        let mut report = sample_report();
        report.repo.owner = "we ird".to_string();
        assert_eq!(report.export_filename(), "analysis-we_ird-widgets.md");
    }
}
