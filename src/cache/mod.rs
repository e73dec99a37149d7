// Cache module for local filesystem caching.
// Stores the GitHub project feed so the page renders without the network.

#![allow(dead_code, unused_imports)]

pub mod paths;
pub mod store;

pub use paths::*;
pub use store::{CACHE_TTL, CacheStore, CachedProjects};
