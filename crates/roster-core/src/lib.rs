//! Roster Core Library
//!
//! Record store, filters and the relationship maintainer that keeps users,
//! profiles and posts consistent.

// Re-export pure types from roster-types
pub use roster_types::*;

pub mod db;
pub mod error;
pub mod filter;
pub mod memory;
pub mod ports;
pub mod record;
pub mod relations;

pub use db::Database;
pub use error::{Result, RosterError};
pub use filter::{Filter, Value};
pub use memory::MemoryCollection;
pub use ports::Collection;
pub use record::{FieldRef, PostField, ProfileField, Record, UserField};
pub use relations::{RelationshipMaintainer, UnsubscribeGuard};
