use crate::transport::http::auth::RequireAdmin;
use crate::transport::http::handlers::common::{message_failure, parse_id};
use crate::transport::http::types::{
    AppState, CategoryListResponse, CategoryRequest, CategoryResponse, MessageResponse,
};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

/// Reads a category body. An empty body carries no name, so it fails name validation
/// like `{}` does; a non-empty body must be a JSON object.
fn category_request(body: &Bytes) -> Result<CategoryRequest, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CategoryRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(MessageResponse::failed(format!("Invalid JSON body: {}", e))),
        )
            .into_response()
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/category/get-category",
    responses(
        (status = 200, description = "All categories", body = CategoryListResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn list_categories_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.categories.list_all().await {
        Ok(category) => Json(CategoryListResponse {
            success: true,
            message: "All Categories List".to_string(),
            category,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while getting all categories"),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/category/create-category",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name missing (also for an empty body)", body = MessageResponse),
        (status = 422, description = "Body is not a JSON object", body = MessageResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 409, description = "Name already taken", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    body: Bytes,
) -> impl IntoResponse {
    let request = match category_request(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let name = request.name.unwrap_or_default();

    match state.categories.create(&name).await {
        Ok(category) => (
            StatusCode::CREATED,
            Json(CategoryResponse {
                success: true,
                message: "New category created".to_string(),
                category: Some(category),
            }),
        )
            .into_response(),
        Err(e) => message_failure(e, "Error in category"),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/category/update-category/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated (null when the id is unknown)", body = CategoryResponse),
        (status = 400, description = "Name missing (also for an empty body)", body = MessageResponse),
        (status = 422, description = "Body is not a JSON object", body = MessageResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn update_category_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let request = match category_request(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let name = request.name.unwrap_or_default();

    // A malformed id matches nothing; the nil id is never assigned to a category.
    let id = parse_id(&id).unwrap_or(Uuid::nil());
    match state.categories.update(id, &name).await {
        Ok(category) => Json(CategoryResponse {
            success: true,
            message: "Category Updated Successfully".to_string(),
            category,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while updating category"),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/category/single-category/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category, or null when the slug is unknown", body = CategoryResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn single_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.categories.get_by_slug(&slug).await {
        Ok(category) => Json(CategoryResponse {
            success: true,
            message: "Get Single Category Successfully".to_string(),
            category,
        })
        .into_response(),
        Err(e) => message_failure(e, "Error while getting single category"),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/category/delete-category/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted (also when the id is unknown)", body = MessageResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Some(id) = parse_id(&id) {
        if let Err(e) = state.categories.delete_by_id(id).await {
            return message_failure(e, "Error while deleting category");
        }
    }
    Json(MessageResponse::ok("Category Deleted Successfully")).into_response()
}
