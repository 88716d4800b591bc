//! User types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Users this user follows, in the order they were followed
    pub subscribed_to_user_ids: Vec<Uuid>,
}

/// User creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial user update. Absent fields are left untouched.
///
/// The subscription list is only written through subscribe / unsubscribe;
/// clients send a [`UserUpdate`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subscribed_to_user_ids: Option<Vec<Uuid>>,
}

impl UserPatch {
    /// Patch that replaces only the subscription list
    pub fn subscriptions(ids: Vec<Uuid>) -> Self {
        Self {
            subscribed_to_user_ids: Some(ids),
            ..Self::default()
        }
    }
}

/// Body of `PATCH /users/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<UserUpdate> for UserPatch {
    fn from(update: UserUpdate) -> Self {
        Self {
            first_name: update.first_name,
            last_name: update.last_name,
            email: update.email,
            subscribed_to_user_ids: None,
        }
    }
}

/// Body of the subscribe / unsubscribe requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubscriptionRequest {
    /// The user whose subscription list is edited
    pub user_id: Uuid,
}
