//! Post handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use roster_core::{Filter, Post, PostDraft, PostField, PostPatch, RosterError};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.db.posts.find_many(None).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .db
        .posts
        .find_one(&Filter::equals(PostField::Id, id))
        .await?
        .ok_or(RosterError::NotFound {
            collection: "posts",
            id,
        })?;
    Ok(Json(post))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.maintainer.create_post(draft).await?))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .db
        .posts
        .change(id, patch)
        .await
        .map_err(RosterError::into_bad_request)?;
    Ok(Json(post))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .db
        .posts
        .delete(id)
        .await
        .map_err(RosterError::into_bad_request)?;
    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, send};
    use axum::http::{Method, StatusCode};
    use roster_core::UnsubscribeGuard;
    use serde_json::json;

    #[tokio::test]
    async fn test_post_lifecycle() {
        let app = app(UnsubscribeGuard::Legacy);
        let (_, user) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "firstName": "Jo", "lastName": "Doe", "email": "jo@example.com" })),
        )
        .await;

        let (status, post) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "hi", "content": "first", "userId": user["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let id = post["id"].as_str().unwrap();
        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/posts/{id}"),
            Some(json!({ "content": "edited" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["content"], "edited");
        assert_eq!(patched["title"], "hi");

        let (status, body) = send(&app, Method::GET, "/posts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &format!("/posts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, &format!("/posts/{id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_for_unknown_user_is_400() {
        let app = app(UnsubscribeGuard::Legacy);

        let (status, _) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({
                "title": "hi",
                "content": "first",
                "userId": "6f1c0a36-0b5e-4a43-9d53-2f1f0c1b7a11",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
