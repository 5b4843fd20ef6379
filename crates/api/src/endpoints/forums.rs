//! Forum endpoints.

use axum::{
    Router,
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::Value;
use traversee_common::{AppError, AppResult, ImageUpload};
use traversee_core::{CommentView, CreateForumInput, ForumItem, ForumView};

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::{ApiResponse, MessageResponse},
};

/// Page query.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// JSON form of a new forum.
#[derive(Debug, Default, Deserialize)]
pub struct CreateForumRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub campaign_id: Option<Value>,
}

impl From<CreateForumRequest> for CreateForumInput {
    fn from(req: CreateForumRequest) -> Self {
        Self {
            title: req.title,
            text: req.text,
            // Only integral ids link a campaign.
            campaign_id: req
                .campaign_id
                .and_then(|v| v.as_i64())
                .and_then(|id| i32::try_from(id).ok()),
            image: None,
        }
    }
}

/// Comment request.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: Option<String>,
}

fn bad_multipart(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// Read a multipart forum form.
async fn read_forum_form(mut multipart: Multipart) -> AppResult<CreateForumInput> {
    let mut input = CreateForumInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => input.title = Some(field.text().await.map_err(bad_multipart)?),
            "text" => input.text = Some(field.text().await.map_err(bad_multipart)?),
            "campaign_id" => {
                let text = field.text().await.map_err(bad_multipart)?;
                input.campaign_id = text.trim().parse().ok();
            }
            "image" => {
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !data.is_empty() {
                    input.image = Some(ImageUpload {
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(input)
}

/// List forums.
async fn list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<ForumItem>>> {
    let forums = state
        .forum_service
        .list(&user_id, query.page.as_deref())
        .await?;
    Ok(ApiResponse::ok(forums))
}

/// Create a forum from a JSON or multipart body.
async fn create(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    request: Request,
) -> AppResult<ApiResponse<ForumItem>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let input = if is_multipart {
        let multipart = Multipart::from_request(request, &state).await?;
        read_forum_form(multipart).await?
    } else {
        let ApiJson(req) = ApiJson::<CreateForumRequest>::from_request(request, &state).await?;
        req.into()
    };

    let forum = state.forum_service.create(&user_id, input).await?;
    Ok(ApiResponse::ok(forum))
}

/// Get a forum.
async fn show(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<ForumItem>> {
    let forum = state.forum_service.get(&user_id, id).await?;
    Ok(ApiResponse::ok(forum))
}

/// Delete a forum.
async fn destroy(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<MessageResponse> {
    state.forum_service.delete(&user_id, id).await?;
    Ok(MessageResponse::new(format!("Forum with id {id} deleted")))
}

/// Like a forum.
async fn like(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<ForumView>> {
    let forum = state.forum_service.like(&user_id, id).await?;
    Ok(ApiResponse::ok(forum))
}

/// Unlike a forum.
async fn unlike(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<ForumView>> {
    let forum = state.forum_service.unlike(&user_id, id).await?;
    Ok(ApiResponse::ok(forum))
}

/// List comments of a forum.
async fn comments(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    let comments = state
        .forum_service
        .comments(id, query.page.as_deref())
        .await?;
    Ok(ApiResponse::ok(comments))
}

/// Comment on a forum.
async fn create_comment(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .forum_service
        .add_comment(&user_id, id, req.text.as_deref())
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Delete a comment.
async fn destroy_comment(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath((id, comment_id)): ApiPath<(i32, i32)>,
) -> AppResult<MessageResponse> {
    state
        .forum_service
        .delete_comment(&user_id, id, comment_id)
        .await?;
    Ok(MessageResponse::new(format!(
        "Comment with id {comment_id} deleted"
    )))
}

/// List forums written by a user.
async fn user_forums(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(author_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<ForumItem>>> {
    let forums = state
        .forum_service
        .list_by_author(&user_id, &author_id, query.page.as_deref())
        .await?;
    Ok(ApiResponse::ok(forums))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forums", get(list).post(create))
        .route("/forums/{id}", get(show).delete(destroy))
        .route("/forums/{id}/likes", post(like).delete(unlike))
        .route("/forums/{id}/comments", get(comments).post(create_comment))
        .route("/forums/{id}/comments/{comment_id}", delete(destroy_comment))
        .route("/users/{id}/forums", get(user_forums))
}
