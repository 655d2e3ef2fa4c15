// Cache tab state management.
// The administration surface over the response cache: statistics display,
// key enumeration, and targeted or global invalidation.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::cache::{CacheStats, ResponseCache};
use crate::report::RepoRef;

/// State for the Cache tab.
#[derive(Debug)]
pub struct CacheAdminTabState {
    /// Last snapshot taken from the store. Raw counts: logically expired
    /// entries are included until physically removed.
    pub stats: CacheStats,
    /// When the snapshot was taken.
    pub last_updated: DateTime<Utc>,
    /// Selection state for the key list.
    pub list_state: ListState,
    /// Confirmation message from the last clear action.
    pub last_action: Option<String>,
}

impl Default for CacheAdminTabState {
    fn default() -> Self {
        Self {
            stats: CacheStats {
                size: 0,
                keys: Vec::new(),
            },
            last_updated: Utc::now(),
            list_state: ListState::default(),
            last_action: None,
        }
    }
}

impl CacheAdminTabState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-snapshot the store.
    pub fn refresh(&mut self, cache: &ResponseCache) {
        self.stats = cache.stats();
        self.last_updated = Utc::now();
        if let Some(selected) = self.list_state.selected() {
            if selected >= self.stats.keys.len() {
                self.reset_selection();
            }
        }
    }

    /// Clear every entry for the given repository, reporting the count
    /// in the confirmation message.
    pub fn clear_repo(&mut self, cache: &ResponseCache, repo: &RepoRef) {
        let removed = cache.invalidate_repository(&repo.owner, &repo.repo);
        self.last_action = Some(format!(
            "Cleared {} cache {} for {}",
            removed,
            plural_entries(removed),
            repo.full_name()
        ));
        self.refresh(cache);
    }

    /// Remove the entry selected in the key list, if any.
    pub fn clear_selected(&mut self, cache: &ResponseCache) {
        let Some(key) = self
            .list_state
            .selected()
            .and_then(|i| self.stats.keys.get(i))
            .cloned()
        else {
            return;
        };

        if cache.invalidate(&key) {
            self.last_action = Some(format!("Removed {}", key));
        }
        self.refresh(cache);
    }

    /// Clear the whole store, reporting the prior count.
    pub fn clear_all(&mut self, cache: &ResponseCache) {
        let removed = cache.invalidate_all();
        self.last_action = Some(format!(
            "Cleared all {} cache {}",
            removed,
            plural_entries(removed)
        ));
        self.refresh(cache);
    }

    /// Select the next key in the list.
    pub fn select_next(&mut self) {
        if self.stats.keys.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.stats.keys.len() - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous key in the list.
    pub fn select_prev(&mut self) {
        if self.stats.keys.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn reset_selection(&mut self) {
        if self.stats.keys.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}

fn plural_entries(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CachedValue, Category};

    fn populate(cache: &ResponseCache) {
        cache.write(
            CacheKey::new("acme", "widgets", Category::Stats),
            CachedValue::Text("x".to_string()),
        );
        cache.write(
            CacheKey::new(
                "acme",
                "widgets",
                Category::Structure {
                    branch: "main".to_string(),
                },
            ),
            CachedValue::Text("x".to_string()),
        );
        cache.write(
            CacheKey::new("other", "repo", Category::Stats),
            CachedValue::Text("x".to_string()),
        );
    }

    #[test]
    fn test_refresh_snapshots_store() {
        let cache = ResponseCache::new();
        populate(&cache);

        let mut state = CacheAdminTabState::new();
        state.refresh(&cache);

        assert_eq!(state.stats.size, 3);
        assert_eq!(state.stats.keys.len(), 3);
    }

    #[test]
    fn test_clear_repo_reports_count_and_scopes() {
        let cache = ResponseCache::new();
        populate(&cache);

        let mut state = CacheAdminTabState::new();
        state.clear_repo(
            &cache,
            &RepoRef {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
            },
        );

        assert_eq!(state.stats.size, 1);
        let message = state.last_action.unwrap();
        assert!(message.contains("2 cache entries"));
        assert!(message.contains("acme/widgets"));
    }

    #[test]
    fn test_clear_all_reports_prior_count() {
        let cache = ResponseCache::new();
        populate(&cache);

        let mut state = CacheAdminTabState::new();
        state.clear_all(&cache);

        assert_eq!(state.stats.size, 0);
        assert!(state.last_action.unwrap().contains("all 3 cache entries"));
    }

    #[test]
    fn test_clear_selected_removes_one_entry() {
        let cache = ResponseCache::new();
        populate(&cache);

        let mut state = CacheAdminTabState::new();
        state.refresh(&cache);
        state.select_next();

        state.clear_selected(&cache);
        assert_eq!(state.stats.size, 2);
        assert!(state.last_action.unwrap().starts_with("Removed "));

        // No selection, no removal.
        let mut idle = CacheAdminTabState::new();
        idle.refresh(&cache);
        idle.clear_selected(&cache);
        assert_eq!(idle.stats.size, 2);
        assert!(idle.last_action.is_none());
    }

    #[test]
    fn test_selection_stays_in_bounds_after_clear() {
        let cache = ResponseCache::new();
        populate(&cache);

        let mut state = CacheAdminTabState::new();
        state.refresh(&cache);
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.list_state.selected(), Some(2));

        state.clear_all(&cache);
        assert_eq!(state.list_state.selected(), None);
    }
}
