// Structured cache keys for GitHub API responses.
// A key is the (owner, repo, category) triple rather than a concatenated
// string, so repositories with overlapping names can never collide.

use std::fmt;

/// Logical endpoint category for a cached response.
///
/// Branch-scoped categories carry the branch name so that analyses of
/// different branches of the same repository are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Repository statistics (stars, forks, default branch, ...).
    Stats,
    /// Recursive file tree for a branch.
    Structure { branch: String },
    /// Concatenated key-file snippets for a branch.
    Snippets { branch: String },
}

impl Category {
    /// Short tag used in the display form of a key.
    pub fn tag(&self) -> String {
        match self {
            Category::Stats => "stats".to_string(),
            Category::Structure { branch } => format!("structure-{}", branch),
            Category::Snippets { branch } => format!("snippets-{}", branch),
        }
    }
}

/// Composite cache key: repository owner, repository name, and endpoint
/// category. Construction is pure and deterministic; equal inputs always
/// produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub category: Category,
}

impl CacheKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, category: Category) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            category,
        }
    }

    /// Whether this key belongs to the given repository, matched on the
    /// structured fields (never on a display-string prefix).
    pub fn is_for_repo(&self, owner: &str, repo: &str) -> bool {
        self.owner == owner && self.repo == repo
    }
}

/// Escape a key segment so the display form stays unambiguous even when
/// a name contains the `/` separator.
fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            escape_segment(&self.owner),
            escape_segment(&self.repo),
            self.category.tag()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let a = CacheKey::new("acme", "widgets", Category::Stats);
        let b = CacheKey::new("acme", "widgets", Category::Stats);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_varying_any_part_changes_key() {
        let base = CacheKey::new("acme", "widgets", Category::Stats);
        assert_ne!(base, CacheKey::new("acmex", "widgets", Category::Stats));
        assert_ne!(base, CacheKey::new("acme", "widgetsx", Category::Stats));
        assert_ne!(
            base,
            CacheKey::new(
                "acme",
                "widgets",
                Category::Structure {
                    branch: "main".to_string()
                }
            )
        );
    }

    #[test]
    fn test_categories_never_collide_for_same_repo() {
        let stats = CacheKey::new("acme", "widgets", Category::Stats);
        let structure = CacheKey::new(
            "acme",
            "widgets",
            Category::Structure {
                branch: "main".to_string(),
            },
        );
        let snippets = CacheKey::new(
            "acme",
            "widgets",
            Category::Snippets {
                branch: "main".to_string(),
            },
        );
        assert_ne!(stats.to_string(), structure.to_string());
        assert_ne!(structure.to_string(), snippets.to_string());
    }

    #[test]
    fn test_branch_distinguishes_structure_keys() {
        let main = Category::Structure {
            branch: "main".to_string(),
        };
        let dev = Category::Structure {
            branch: "develop".to_string(),
        };
        assert_ne!(main.tag(), dev.tag());
    }

    #[test]
    fn test_display_escapes_separator() {
        // A repo name containing '/' must not produce the same display
        // string as a legitimately nested owner/repo split.
        let tricky = CacheKey::new("acme", "widgets/stats", Category::Stats);
        let plain = CacheKey::new("acme/widgets", "stats", Category::Stats);
        assert_ne!(tricky.to_string(), plain.to_string());
        assert!(tricky.to_string().contains("%2F"));
    }

    #[test]
    fn test_repo_match_is_structural() {
        let key = CacheKey::new("foo", "bar", Category::Stats);
        assert!(key.is_for_repo("foo", "bar"));
        assert!(!key.is_for_repo("foo", "barbaz"));
        assert!(!key.is_for_repo("fo", "obar"));
    }
}
