//! Bounded, identity-keyed collections backing recent views and favorites.

pub mod dedup_queue;
pub mod identity_set;

pub use dedup_queue::{BoundedDedupQueue, KeyFn};
pub use identity_set::IdentitySet;
