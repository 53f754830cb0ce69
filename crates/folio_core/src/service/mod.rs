//! Site-level use-case services.
//!
//! # Responsibility
//! - Wire source, catalog, navigation and store into one explicit context.
//! - Keep presentation layers decoupled from collaborator details.

pub mod preview;
pub mod site_service;
pub mod theme;
