//! Post domain model.
//!
//! # Responsibility
//! - Define the untrusted entry shape consumed from post indexes.
//! - Define the normalized record owned by the catalog.
//!
//! # Invariants
//! - Every catalog record is identified by a stable, non-empty slug.
//! - Raw entries never fail to decode because of one bad field.

pub mod post;
