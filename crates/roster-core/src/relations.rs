//! Relationship maintenance across users, profiles and posts
//!
//! Compound operations are plain sequences of store calls. They are
//! serialized against each other, but there is no rollback: a failure part
//! way through leaves the earlier steps applied.

use crate::db::Database;
use crate::filter::Filter;
use crate::record::{PostField, ProfileField, UserField};
use crate::{Result, RosterError};
use futures::future::try_join_all;
use roster_types::{Post, PostDraft, Profile, ProfileDraft, User, UserPatch};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Precondition checked before an unsubscribe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsubscribeGuard {
    /// Passes when some subscription differs from the target. Fails for an
    /// empty list or a list holding only the target, passes for a list that
    /// never held the target.
    #[default]
    Legacy,
    /// Passes only when the target is actually subscribed to
    Strict,
}

impl UnsubscribeGuard {
    pub fn permits(self, subscriptions: &[Uuid], target: Uuid) -> bool {
        match self {
            UnsubscribeGuard::Legacy => subscriptions.iter().any(|id| *id != target),
            UnsubscribeGuard::Strict => subscriptions.contains(&target),
        }
    }
}

impl std::fmt::Display for UnsubscribeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsubscribeGuard::Legacy => write!(f, "legacy"),
            UnsubscribeGuard::Strict => write!(f, "strict"),
        }
    }
}

pub struct RelationshipMaintainer {
    db: Database,
    guard: UnsubscribeGuard,
    /// Held for the whole of each compound operation
    write_lock: Mutex<()>,
}

impl RelationshipMaintainer {
    pub fn new(db: Database, guard: UnsubscribeGuard) -> Self {
        Self {
            db,
            guard,
            write_lock: Mutex::new(()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Delete a user together with its profile, its posts and every
    /// subscription pointing at it.
    pub async fn remove_user(&self, user_id: Uuid) -> Result<User> {
        let _lock = self.write_lock.lock().await;
        info!("Removing user {} and dependents", user_id);

        self.cascade_remove(user_id).await.map_err(|e| {
            warn!("Removing user {} failed: {}", user_id, e);
            e.into_bad_request()
        })
    }

    async fn cascade_remove(&self, user_id: Uuid) -> Result<User> {
        let profile = self
            .db
            .profiles
            .find_one(&Filter::equals(ProfileField::UserId, user_id))
            .await?;
        if let Some(profile) = profile {
            self.db.profiles.delete(profile.id).await?;
        }

        let posts = self
            .db
            .posts
            .find_many(Some(&Filter::equals(PostField::UserId, user_id)))
            .await?;
        try_join_all(posts.iter().map(|post| self.db.posts.delete(post.id))).await?;

        let followers = self
            .db
            .users
            .find_many(Some(&Filter::contains(UserField::SubscribedToUserIds, user_id)))
            .await?;
        for follower in followers {
            let remaining = without(follower.subscribed_to_user_ids, user_id);
            self.db
                .users
                .change(follower.id, UserPatch::subscriptions(remaining))
                .await?;
        }

        self.db.users.delete(user_id).await
    }

    /// Append `target_id` to the follower's subscriptions.
    ///
    /// Subscribing twice appends twice. The target is not required to exist.
    pub async fn subscribe(&self, follower_id: Uuid, target_id: Uuid) -> Result<User> {
        let _lock = self.write_lock.lock().await;
        info!("User {} subscribing to {}", follower_id, target_id);

        let follower = self.existing_user(follower_id).await?;
        let mut subscriptions = follower.subscribed_to_user_ids;
        subscriptions.push(target_id);

        self.db
            .users
            .change(follower_id, UserPatch::subscriptions(subscriptions))
            .await
            .map_err(RosterError::into_bad_request)
    }

    /// Remove every occurrence of `target_id` from the follower's
    /// subscriptions, after the configured guard lets it through.
    pub async fn unsubscribe(&self, follower_id: Uuid, target_id: Uuid) -> Result<User> {
        let _lock = self.write_lock.lock().await;
        info!("User {} unsubscribing from {}", follower_id, target_id);

        let follower = self.existing_user(follower_id).await?;
        if !self.guard.permits(&follower.subscribed_to_user_ids, target_id) {
            warn!(
                "Unsubscribe rejected by {} guard: user {} -> {}",
                self.guard, follower_id, target_id
            );
            return Err(RosterError::BadRequest(format!(
                "user {follower_id} is not subscribed to {target_id}"
            )));
        }

        let remaining = without(follower.subscribed_to_user_ids, target_id);
        self.db
            .users
            .change(follower_id, UserPatch::subscriptions(remaining))
            .await
            .map_err(RosterError::into_bad_request)
    }

    pub async fn patch_user(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let _lock = self.write_lock.lock().await;

        self.db
            .users
            .change(id, patch)
            .await
            .map_err(RosterError::into_bad_request)
    }

    /// Create a profile for a user that exists and has none yet
    pub async fn create_profile(&self, draft: ProfileDraft) -> Result<Profile> {
        let _lock = self.write_lock.lock().await;

        let owner = self.existing_user(draft.user_id).await?;
        let existing = self
            .db
            .profiles
            .find_one(&Filter::equals(ProfileField::UserId, owner.id))
            .await
            .map_err(RosterError::into_bad_request)?;
        if existing.is_some() {
            return Err(RosterError::BadRequest(format!(
                "user {} already has a profile",
                owner.id
            )));
        }

        self.db
            .profiles
            .create(draft)
            .await
            .map_err(RosterError::into_bad_request)
    }

    /// Create a post owned by an existing user
    pub async fn create_post(&self, draft: PostDraft) -> Result<Post> {
        let _lock = self.write_lock.lock().await;

        self.existing_user(draft.user_id).await?;
        self.db
            .posts
            .create(draft)
            .await
            .map_err(RosterError::into_bad_request)
    }

    async fn existing_user(&self, id: Uuid) -> Result<User> {
        self.db
            .users
            .find_one(&Filter::equals(UserField::Id, id))
            .await
            .map_err(RosterError::into_bad_request)?
            .ok_or_else(|| RosterError::BadRequest(format!("user {id} does not exist")))
    }
}

fn without(ids: Vec<Uuid>, removed: Uuid) -> Vec<Uuid> {
    ids.into_iter().filter(|id| *id != removed).collect()
}
