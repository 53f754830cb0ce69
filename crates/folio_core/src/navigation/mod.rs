//! Viewer navigation state.
//!
//! # Responsibility
//! - Track the currently viewed post for one page session.
//! - Derive previous/next neighbors from catalog order.
//! - Persist and restore the last viewed slug through the key-value store.
//!
//! # Invariants
//! - `current_slug`, when set, always names a post in the bound catalog.
//! - Neighbors are derived on demand, never stored.

mod state;

pub use state::{Adjacent, NavigationPhase, NavigationState};
