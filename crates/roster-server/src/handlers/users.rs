//! User handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use roster_core::{
    Filter, RosterError, SubscriptionRequest, User, UserDraft, UserField, UserUpdate,
};
use tracing::info;
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.users.find_many(None).await?;
    Ok(Json(users))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .db
        .users
        .find_one(&Filter::equals(UserField::Id, id))
        .await?
        .ok_or(RosterError::NotFound {
            collection: "users",
            id,
        })?;
    Ok(Json(user))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<User>, ApiError> {
    let user = state.db.users.create(draft).await?;
    info!("Created user {}", user.id);
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state.maintainer.remove_user(id).await?;
    Ok(Json(user))
}

/// `POST /users/:id/subscribeTo`: the body's user starts following `:id`
pub async fn subscribe_to(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.maintainer.subscribe(req.user_id, id).await?;
    Ok(Json(user))
}

/// `POST /users/:id/unsubscribeFrom`: the body's user stops following `:id`
pub async fn unsubscribe_from(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.maintainer.unsubscribe(req.user_id, id).await?;
    Ok(Json(user))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let user = state.maintainer.patch_user(id, update.into()).await?;
    Ok(Json(user))
}
