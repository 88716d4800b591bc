//! Roster Types - Pure entity definitions
//!
//! Users, profiles and posts as they travel over the wire, plus the drafts
//! used to create them and the patches used to change them.

pub mod post;
pub mod profile;
pub mod user;

pub use post::*;
pub use profile::*;
pub use user::*;
