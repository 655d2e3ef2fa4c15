// Cache module for in-memory response memoization.
// Stores GitHub API responses with time-based expiry so repeated analyses
// of the same repository avoid redundant network calls.

pub mod key;
pub mod store;

pub use key::{CacheKey, Category};
pub use store::{CacheStats, CachedValue, DEFAULT_TTL, ResponseCache};
