//! Data-access client bundling the three collections

use crate::memory::MemoryCollection;
use crate::ports::Collection;
use roster_types::{Post, Profile, User};
use std::sync::Arc;

/// The `db.<entity>` handle passed to handlers and the maintainer.
///
/// Cloning shares the same underlying collections.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn Collection<User>>,
    pub profiles: Arc<dyn Collection<Profile>>,
    pub posts: Arc<dyn Collection<Post>>,
}

impl Database {
    pub fn new(
        users: Arc<dyn Collection<User>>,
        profiles: Arc<dyn Collection<Profile>>,
        posts: Arc<dyn Collection<Post>>,
    ) -> Self {
        Self {
            users,
            profiles,
            posts,
        }
    }

    /// Empty collections held in process memory
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCollection::<User>::new()),
            Arc::new(MemoryCollection::<Profile>::new()),
            Arc::new(MemoryCollection::<Post>::new()),
        )
    }
}
