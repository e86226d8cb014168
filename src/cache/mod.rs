// Response cache module.
// Keeps recent API responses in memory so repeated lookups skip the network.

pub mod store;

pub use store::{CacheEntry, DEFAULT_CAPACITY, DEFAULT_TTL, ResponseCache};
