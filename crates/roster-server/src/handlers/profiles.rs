//! Profile handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use roster_core::{Filter, Profile, ProfileDraft, ProfileField, ProfilePatch, RosterError};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, ApiError> {
    Ok(Json(state.db.profiles.find_many(None).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .db
        .profiles
        .find_one(&Filter::equals(ProfileField::Id, id))
        .await?
        .ok_or(RosterError::NotFound {
            collection: "profiles",
            id,
        })?;
    Ok(Json(profile))
}

/// One profile per user; the owner must exist
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.maintainer.create_profile(draft).await?))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .db
        .profiles
        .change(id, patch)
        .await
        .map_err(RosterError::into_bad_request)?;
    Ok(Json(profile))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .db
        .profiles
        .delete(id)
        .await
        .map_err(RosterError::into_bad_request)?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, send};
    use axum::http::{Method, StatusCode};
    use roster_core::UnsubscribeGuard;
    use serde_json::{json, Value};

    fn profile_body(user_id: &Value) -> Value {
        json!({
            "avatar": "avatar.png",
            "sex": "m",
            "birthday": 946684800000i64,
            "country": "NL",
            "street": "Main 1",
            "city": "Utrecht",
            "memberTypeId": "basic",
            "userId": user_id,
        })
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let app = app(UnsubscribeGuard::Legacy);
        let (_, user) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "firstName": "Jo", "lastName": "Doe", "email": "jo@example.com" })),
        )
        .await;

        let (status, profile) =
            send(&app, Method::POST, "/profiles", Some(profile_body(&user["id"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["userId"], user["id"]);

        // A second profile for the same user is refused
        let (status, _) =
            send(&app, Method::POST, "/profiles", Some(profile_body(&user["id"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = profile["id"].as_str().unwrap();
        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/profiles/{id}"),
            Some(json!({ "city": "Leiden" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["city"], "Leiden");
        assert_eq!(patched["country"], "NL");

        let user_id = user["id"].as_str().unwrap();
        let (status, _) = send(&app, Method::DELETE, &format!("/users/{user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, &format!("/profiles/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_for_unknown_user_is_400() {
        let app = app(UnsubscribeGuard::Legacy);

        let (status, _) = send(
            &app,
            Method::POST,
            "/profiles",
            Some(profile_body(&json!("6f1c0a36-0b5e-4a43-9d53-2f1f0c1b7a11"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
